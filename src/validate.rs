//! Quality predicates over a puzzle state.

use crate::model::PuzzleState;

/// Share of the non-empty vessels, in tenths, that must hold more than one color.
const MIXED_TENTHS: usize = 3;

/// Lower bound on mixed vessels regardless of puzzle size.
const MIN_MIXED: usize = 2;

/// Every non-empty vessel is full and holds a single color.
pub fn is_solved(state: &PuzzleState) -> bool {
    let capacity = state.capacity();
    state
        .vessels()
        .iter()
        .filter(|v| !v.is_empty())
        .all(|v| v.len() == capacity && v.is_monochrome())
}

/// Number of vessels holding at least two tokens of at least two different colors.
pub fn mixed_vessels(state: &PuzzleState) -> usize {
    state
        .vessels()
        .iter()
        .filter(|v| v.len() > 1 && v.distinct_colors() > 1)
        .count()
}

/// Mixed vessels needed for a state with `filled` non-empty vessels to count as a puzzle.
pub fn required_mixed(filled: usize) -> usize {
    MIN_MIXED.max((filled * MIXED_TENTHS).div_ceil(10))
}

/// Whether enough vessels are mixed for the state to be an interesting puzzle.
pub fn sufficiently_mixed(state: &PuzzleState) -> bool {
    let filled = state.vessels().iter().filter(|v| !v.is_empty()).count();
    mixed_vessels(state) >= required_mixed(filled)
}

/// The state a scramble must reach: not solved and sufficiently mixed.
pub fn is_good_puzzle(state: &PuzzleState) -> bool {
    !is_solved(state) && sufficiently_mixed(state)
}
