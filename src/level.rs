//! Build finished level records from a level index.

use log::debug;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use crate::difficulty::LevelParams;
use crate::error::{GeneratorError, GeneratorResult};
use crate::model::PuzzleState;
use crate::palette::Color;
use crate::scramble::{ScrambleReport, Scrambler, WalkStrategy};

/// Multiplier turning a level index into its random seed.
const SEED_PRIME: u64 = 7919;

/// A generated level, as persisted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelRecord {
    /// Zero-padded level number.
    pub id: String,
    pub title: String,
    pub tube_capacity: usize,
    /// Vessel contents, bottom first.
    pub tubes: Vec<Vec<Color>>,
    /// Reserved. Always `None`.
    pub moves_limit: Option<u32>,
    pub hints: u32,
}

impl LevelRecord {
    /// The puzzle state described by the record.
    pub fn state(&self) -> GeneratorResult<PuzzleState> {
        PuzzleState::new(self.tube_capacity, self.tubes.clone()).ok_or_else(|| {
            GeneratorError::InvalidRecord(format!(
                "level {} has a tube over capacity {}",
                self.id, self.tube_capacity
            ))
        })
    }
}

/// Stable identifier of a level: its index padded to three digits.
pub fn level_id(level: u32) -> String {
    format!("{level:03}")
}

/// Random generator for `level`. Each level gets its own, so levels can be generated in any
/// order and in parallel.
pub fn level_rng(level: u32) -> StdRng {
    StdRng::seed_from_u64(u64::from(level) * SEED_PRIME)
}

/// Builds levels with a fixed set of options.
#[derive(Clone, Debug, Default)]
pub struct LevelBuilder {
    strategy: WalkStrategy,
}

impl LevelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_strategy(mut self, strategy: WalkStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Build the level record for `level`.
    ///
    /// # Errors
    ///
    /// [`GeneratorError::Configuration`] when no stage covers `level`.
    pub fn build(&self, level: u32) -> GeneratorResult<LevelRecord> {
        self.build_with_report(level).map(|(record, _)| record)
    }

    /// Build the level record for `level` and report how the scramble went.
    pub fn build_with_report(&self, level: u32) -> GeneratorResult<(LevelRecord, ScrambleReport)> {
        let params = LevelParams::for_level(level)?;
        debug!("Level {level}: {params:?}");

        let mut rng = level_rng(level);
        let palette: Vec<Color> = Color::all().collect();
        let colors: Vec<Color> = palette
            .choose_multiple(&mut rng, params.color_count)
            .copied()
            .collect();

        let mut state = PuzzleState::sorted(params.capacity, &colors, params.extra_empty);
        let report =
            Scrambler::new(&mut rng, self.strategy).scramble(&mut state, params.shuffle_intensity);
        debug!("Level {level}: {state}");

        let record = LevelRecord {
            id: level_id(level),
            title: params.title,
            tube_capacity: params.capacity,
            tubes: state.tubes(),
            moves_limit: None,
            hints: params.hints,
        };
        Ok((record, report))
    }
}

/// Generate `level` with the default options.
pub fn generate_level(level: u32) -> GeneratorResult<LevelRecord> {
    LevelBuilder::new().build(level)
}
