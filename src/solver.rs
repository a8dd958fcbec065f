use std::collections::HashSet;

use log::debug;

use crate::model::PuzzleState;
use crate::palette::Color;
use crate::pour::{Move, pour, pourable_amount};
use crate::validate::is_solved;

/// States expanded before the search gives up.
pub const DEFAULT_BUDGET: usize = 200_000;

/// Outcome of a search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// A sequence of pours leading to a solved state.
    Solved(Vec<Move>),

    /// Every reachable state was visited and none is solved.
    Unsolvable,

    /// The budget ran out first.
    Inconclusive,
}

#[derive(Clone)]
struct StateWithHistory {
    state: PuzzleState,
    history: Vec<Move>,
}

/// Depth-first search over legal pours.
///
/// States are deduplicated up to vessel order, which is sound because every vessel of a
/// [`PuzzleState`] shares one capacity. The search does not look for the shortest solution.
pub struct Solver {
    starting_state: PuzzleState,
    considering_states: Vec<StateWithHistory>,
    visited_states: HashSet<Vec<Vec<Color>>>,
    budget: usize,
    expanded: usize,
}

impl Solver {
    pub fn new(starting_state: PuzzleState) -> Solver {
        Solver {
            starting_state,
            considering_states: Vec::new(),
            visited_states: HashSet::new(),
            budget: DEFAULT_BUDGET,
            expanded: 0,
        }
    }

    pub fn with_budget(mut self, budget: usize) -> Solver {
        self.budget = budget;
        self
    }

    /// States expanded by the last call to [`Solver::solve`].
    pub fn expanded(&self) -> usize {
        self.expanded
    }

    fn consider_state(&mut self, state_with_history: StateWithHistory) {
        if self.visited_states.insert(state_with_history.state.canonical()) {
            self.considering_states.push(state_with_history);
        }
    }

    pub fn solve(&mut self) -> Verdict {
        self.considering_states.clear();
        self.visited_states.clear();
        self.expanded = 0;
        self.consider_state(StateWithHistory {
            state: self.starting_state.clone(),
            history: vec![],
        });

        while let Some(current) = self.considering_states.pop() {
            if is_solved(&current.state) {
                debug!(
                    "Solved in {} moves after expanding {} states",
                    current.history.len(),
                    self.expanded
                );
                return Verdict::Solved(current.history);
            }
            self.expanded += 1;
            if self.expanded > self.budget {
                debug!("Search budget of {} states exhausted", self.budget);
                return Verdict::Inconclusive;
            }
            // Pushed last, popped first: pours onto a matching color before pours into an
            // empty vessel.
            let mut moves = useful_moves(&current.state);
            moves.sort_by_key(|m| !current.state.vessels()[m.dest].is_empty());
            for m in moves {
                let mut next = current.clone();
                pour(&mut next.state, m.source, m.dest);
                next.history.push(m);
                self.consider_state(next);
            }
        }
        debug!("No solution after expanding {} states", self.expanded);
        Verdict::Unsolvable
    }
}

/// Legal pours, minus those that only move a whole single-colored vessel into an empty one.
fn useful_moves(state: &PuzzleState) -> Vec<Move> {
    let vessels = state.vessels();
    let mut moves = Vec::new();
    for source in 0..vessels.len() {
        for dest in 0..vessels.len() {
            if pourable_amount(state, source, dest) == 0 {
                continue;
            }
            if vessels[dest].is_empty() && vessels[source].is_monochrome() {
                continue;
            }
            moves.push(Move { source, dest });
        }
    }
    moves
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::LevelBuilder;
    use crate::scramble::WalkStrategy;

    fn state(repr: &str) -> PuzzleState {
        PuzzleState::new_from_repr(repr).unwrap()
    }

    fn replay(start: &PuzzleState, moves: &[Move]) -> PuzzleState {
        let mut s = start.clone();
        for m in moves {
            assert!(pour(&mut s, m.source, m.dest), "illegal {m:?} on {s}");
        }
        s
    }

    #[test]
    fn solved_state_needs_no_moves() {
        let s = state("AA BB ..");
        assert_eq!(Solver::new(s).solve(), Verdict::Solved(vec![]));
    }

    #[test]
    fn finds_a_replayable_solution() {
        let s = state("AB BA ..");
        let Verdict::Solved(moves) = Solver::new(s.clone()).solve() else {
            panic!("expected a solution");
        };
        assert!(is_solved(&replay(&s, &moves)));
    }

    #[test]
    fn stuck_state_is_unsolvable() {
        assert_eq!(Solver::new(state("AB BA")).solve(), Verdict::Unsolvable);
    }

    #[test]
    fn zero_budget_is_inconclusive() {
        let mut solver = Solver::new(state("AB BA ..")).with_budget(0);
        assert_eq!(solver.solve(), Verdict::Inconclusive);
        assert_eq!(solver.expanded(), 1);
    }

    #[test]
    fn useful_moves_skip_moving_sorted_vessels_around() {
        let s = state("AA BA ..");
        assert_eq!(useful_moves(&s), vec![Move { source: 1, dest: 2 }]);
    }

    #[test]
    fn unpour_levels_are_solvable() {
        let builder = LevelBuilder::new().with_strategy(WalkStrategy::Unpour);
        for level in [1, 2, 3] {
            let record = builder.build(level).unwrap();
            let start = record.state().unwrap();
            let Verdict::Solved(moves) = Solver::new(start.clone()).solve() else {
                panic!("level {level} not solved: {start}");
            };
            assert!(is_solved(&replay(&start, &moves)));
        }
    }
}
