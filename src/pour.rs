//! The pour primitive: the only move a player can make.
//!
//! [`pour`] is the sole player-facing mutator of a [`PuzzleState`]. The generator also has
//! access to [`unpour`], the exact inverse of a pour, which is never a legal move in the game.

use crate::model::PuzzleState;

/// A pour from one vessel onto another, by vessel index.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    pub source: usize,
    pub dest: usize,
}

/// Whether pouring `source` onto `dest` is a legal move.
pub fn can_pour(state: &PuzzleState, source: usize, dest: usize) -> bool {
    if source == dest {
        return false;
    }
    let (Some(src), Some(dst)) = (state.vessel(source), state.vessel(dest)) else {
        return false;
    };
    if src.is_empty() || dst.is_full() {
        return false;
    }
    dst.is_empty() || dst.top() == src.top()
}

/// Number of tokens a pour from `source` onto `dest` would move. Zero when illegal.
pub fn pourable_amount(state: &PuzzleState, source: usize, dest: usize) -> usize {
    if !can_pour(state, source, dest) {
        return 0;
    }
    let run = state.vessels()[source].top_run();
    let space = state.vessels()[dest].free_space();
    run.min(space)
}

/// Pour the top run of `source` onto `dest`, as far as `dest` has room.
///
/// Returns `false` and leaves the state untouched when the move is illegal.
pub fn pour(state: &mut PuzzleState, source: usize, dest: usize) -> bool {
    let amount = pourable_amount(state, source, dest);
    if amount == 0 {
        return false;
    }
    transfer(state, source, dest, amount);
    true
}

/// Largest amount [`unpour`] accepts for this pair. Zero when no inverse pour is possible.
///
/// The moved tokens must land on an empty vessel or on a different color, and the source
/// must either be drained or keep the moved color on top. Under those rules the unpour is
/// undone by a single legal [`pour`] from `dest` back onto `source`.
pub(crate) fn unpourable_amount(state: &PuzzleState, source: usize, dest: usize) -> usize {
    if source == dest {
        return 0;
    }
    let (Some(src), Some(dst)) = (state.vessel(source), state.vessel(dest)) else {
        return 0;
    };
    if src.is_empty() || dst.is_full() {
        return 0;
    }
    if !dst.is_empty() && dst.top() == src.top() {
        return 0;
    }
    let run = src.top_run();
    let movable = if run == src.len() { run } else { run - 1 };
    movable.min(dst.free_space())
}

/// Generation-only inverse pour: move `amount` tokens of the source's top run onto `dest`.
///
/// This is not a game move and must never be offered to a player.
pub(crate) fn unpour(state: &mut PuzzleState, source: usize, dest: usize, amount: usize) -> bool {
    if amount == 0 || amount > unpourable_amount(state, source, dest) {
        return false;
    }
    transfer(state, source, dest, amount);
    true
}

fn transfer(state: &mut PuzzleState, source: usize, dest: usize, amount: usize) {
    let vessels = state.vessels_mut();
    for _ in 0..amount {
        if let Some(color) = vessels[source].pop() {
            vessels[dest].push(color);
        }
    }
}
