//! Turn a sorted arrangement into a puzzle.
//!
//! A scramble is a random walk over the vessels, followed by a quality gate that re-walks the
//! state a bounded number of times, and a last-resort forced mix. Whatever comes out of those
//! steps is used: the generator never fails on a poorly mixed state, it only reports it.
//!
//! The walk comes in two flavours, see [`WalkStrategy`].

use log::{debug, warn};
use rand::Rng;
use rand::seq::SliceRandom;
use rand::seq::index;

use crate::model::PuzzleState;
use crate::pour::{pour, unpour, unpourable_amount};
use crate::validate::is_good_puzzle;

/// Attempts allowed per requested move before a walk gives up.
const ATTEMPTS_PER_MOVE: usize = 6;

/// Re-walks allowed when the first walk does not produce a good puzzle.
const QUALITY_RETRIES: usize = 12;

/// How the random walk moves tokens around.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum WalkStrategy {
    /// Legal player pours.
    ///
    /// A pour only ever lands on an empty vessel or on its own color, so a walk starting from
    /// the sorted state keeps every vessel monochromatic. The quality gate then relies on the
    /// forced mix to leave the solved state.
    #[default]
    Pour,

    /// Inverse pours, each undone by one legal pour.
    ///
    /// Produces mixed vessels while keeping the sorted state reachable.
    Unpour,
}

/// What happened during one scramble.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScrambleReport {
    /// Moves requested from the first walk.
    pub target_moves: usize,

    /// Moves applied across every walk.
    pub applied_moves: usize,

    /// Quality gate re-walks used.
    pub retries: usize,

    /// Whether the forced mix ran.
    pub forced_mix: bool,

    /// Whether the final state is unsolved and sufficiently mixed.
    pub converged: bool,
}

/// Scrambles puzzle states with a borrowed random generator.
pub struct Scrambler<'a, R: Rng> {
    rng: &'a mut R,
    strategy: WalkStrategy,
}

impl<'a, R: Rng> Scrambler<'a, R> {
    pub fn new(rng: &'a mut R, strategy: WalkStrategy) -> Self {
        Self { rng, strategy }
    }

    /// Scramble `state` in place.
    ///
    /// The first walk targets `colors × capacity × intensity` moves, `colors` being the number of
    /// distinct colors in `state`.
    pub fn scramble(&mut self, state: &mut PuzzleState, shuffle_intensity: usize) -> ScrambleReport {
        let capacity = state.capacity();
        let color_count = state.color_counts().len();
        let moves = color_count * capacity * shuffle_intensity;
        let mut report = ScrambleReport {
            target_moves: moves,
            ..Default::default()
        };

        report.applied_moves += self.random_walk(state, moves);
        while !is_good_puzzle(state) && report.retries < QUALITY_RETRIES {
            report.applied_moves += self.random_walk(state, moves / 2 + capacity);
            report.retries += 1;
        }

        if !is_good_puzzle(state) {
            report.forced_mix = self.force_mix(state);
        }
        report.converged = is_good_puzzle(state);

        state.vessels_mut().shuffle(&mut *self.rng);

        debug!(
            "Scrambled {} vessels: {} moves applied of {} targeted, {} retries, forced mix: {}",
            state.len(),
            report.applied_moves,
            report.target_moves,
            report.retries,
            report.forced_mix
        );
        if !report.converged {
            warn!("Scramble did not converge, keeping {state}");
        }
        report
    }

    /// Apply up to `moves` random moves, giving up after `ATTEMPTS_PER_MOVE × moves` tries.
    ///
    /// Returns the number of moves applied.
    pub fn random_walk(&mut self, state: &mut PuzzleState, moves: usize) -> usize {
        let vessel_count = state.len();
        if vessel_count < 2 {
            return 0;
        }
        let limit = moves * ATTEMPTS_PER_MOVE;
        let mut attempts = 0;
        let mut applied = 0;
        while applied < moves && attempts < limit {
            attempts += 1;
            let source = self.rng.random_range(0..vessel_count);
            let dest = self.rng.random_range(0..vessel_count);
            if self.step(state, source, dest) {
                applied += 1;
            }
        }
        if applied < moves {
            debug!("Walk stalled after {attempts} attempts: {applied} of {moves} moves applied");
        }
        applied
    }

    fn step(&mut self, state: &mut PuzzleState, source: usize, dest: usize) -> bool {
        match self.strategy {
            WalkStrategy::Pour => pour(state, source, dest),
            WalkStrategy::Unpour => {
                let max = unpourable_amount(state, source, dest);
                if max == 0 {
                    return false;
                }
                let amount = self.rng.random_range(1..=max);
                unpour(state, source, dest, amount)
            }
        }
    }

    /// Move single top tokens between vessels, ignoring color rules.
    ///
    /// Two distinct vessels holding at least two tokens each give their top token to two
    /// distinct vessels with room. This is a generation-only rearrangement and not a move a
    /// player could make. Returns `false`, leaving the state untouched, when fewer than two
    /// vessels of either kind exist.
    fn force_mix(&mut self, state: &mut PuzzleState) -> bool {
        let capacity = state.capacity();
        let filled: Vec<usize> = (0..state.len())
            .filter(|i| state.vessels()[*i].len() >= 2)
            .collect();
        let rooms: Vec<usize> = (0..state.len())
            .filter(|i| state.vessels()[*i].len() < capacity)
            .collect();
        if filled.len() < 2 || rooms.len() < 2 {
            debug!(
                "Cannot force a mix: {} filled vessels, {} vessels with room",
                filled.len(),
                rooms.len()
            );
            return false;
        }

        let sources = index::sample(&mut *self.rng, filled.len(), 2);
        let targets = index::sample(&mut *self.rng, rooms.len(), 2);
        let vessels = state.vessels_mut();
        for (s, t) in sources.iter().zip(targets.iter()) {
            let (source, target) = (filled[s], rooms[t]);
            if let Some(color) = vessels[source].pop() {
                vessels[target].push(color);
            }
        }
        true
    }
}
