//! Difficulty curve: puzzle parameters as a pure function of the level index.
//!
//! The catalogue is split into [`STAGES`], contiguous ranges of levels that share a title list,
//! a shuffle intensity and a hint budget. Vessel capacity, color count and the number of spare
//! empty vessels grow in steps inside and across stages, and never decrease as the level index
//! goes up.

use log::debug;

use crate::error::{GeneratorError, GeneratorResult};
use crate::palette::PALETTE;

/// First level of the catalogue.
pub const FIRST_LEVEL: u32 = 1;

/// Last level of the catalogue.
pub const LAST_LEVEL: u32 = 300;

/// A step of a piecewise-constant rule: `value` applies from level `from` onward.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Step {
    pub from: u32,
    pub value: usize,
}

/// Look up the value of the last step starting at or before `level`.
fn step_value(steps: &[Step], level: u32) -> Option<usize> {
    steps
        .iter()
        .take_while(|step| step.from <= level)
        .last()
        .map(|step| step.value)
}

/// Color count ramp: `base` colors at the stage start, one more every `every` levels, at most
/// `max`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ColorRamp {
    pub base: usize,
    pub every: u32,
    pub max: usize,
}

impl ColorRamp {
    fn value(&self, offset: u32) -> usize {
        let grown = self.base + (offset / self.every.max(1)) as usize;
        grown.min(self.max)
    }
}

/// Parameters for a contiguous range of levels.
#[derive(Debug)]
pub struct StageConfig {
    /// First level of the stage.
    pub start: u32,

    /// Last level of the stage, inclusive.
    pub end: u32,

    /// Vessel capacity steps.
    pub capacity: &'static [Step],

    /// Number of colors.
    pub colors: ColorRamp,

    /// Number of empty vessels added to the sorted arrangement.
    pub extra_empty: &'static [Step],

    /// Multiplier sizing the random walk.
    pub shuffle_intensity: usize,

    /// Hints granted to the player.
    pub hints: u32,

    /// Title tokens, used in turn.
    pub title_tokens: &'static [&'static str],
}

impl StageConfig {
    pub fn contains(&self, level: u32) -> bool {
        (self.start..=self.end).contains(&level)
    }

    pub fn title_for(&self, level: u32) -> String {
        let offset = (level - self.start) as usize;
        let len = self.title_tokens.len();
        let token = self.title_tokens[offset % len];
        let wave = offset / len + 1;
        format!("{token} {wave}")
    }
}

pub static STAGES: [StageConfig; 4] = [
    StageConfig {
        start: 1,
        end: 50,
        capacity: &[Step { from: 1, value: 4 }],
        colors: ColorRamp { base: 3, every: 10, max: 6 },
        extra_empty: &[Step { from: 1, value: 2 }],
        shuffle_intensity: 6,
        hints: 5,
        title_tokens: &[
            "Easy Flow",
            "Gentle Pour",
            "Calm Cascade",
            "Soft Splash",
            "Bright Breeze",
        ],
    },
    StageConfig {
        start: 51,
        end: 120,
        capacity: &[Step { from: 51, value: 4 }, Step { from: 91, value: 5 }],
        colors: ColorRamp { base: 6, every: 12, max: 9 },
        extra_empty: &[Step { from: 51, value: 2 }, Step { from: 91, value: 3 }],
        shuffle_intensity: 8,
        hints: 4,
        title_tokens: &[
            "Vivid Stream",
            "Tricky Twist",
            "Color Sprint",
            "Neon Ripple",
            "Tempo Pour",
        ],
    },
    StageConfig {
        start: 121,
        end: 200,
        capacity: &[Step { from: 121, value: 5 }, Step { from: 151, value: 6 }],
        colors: ColorRamp { base: 9, every: 20, max: 11 },
        extra_empty: &[Step { from: 121, value: 3 }],
        shuffle_intensity: 10,
        hints: 3,
        title_tokens: &[
            "Brain Brew",
            "Puzzle Pulse",
            "Focus Flow",
            "Mind Mixer",
            "Prism Dash",
        ],
    },
    StageConfig {
        start: 201,
        end: 300,
        capacity: &[Step { from: 201, value: 6 }],
        colors: ColorRamp { base: 11, every: 30, max: 13 },
        extra_empty: &[Step { from: 201, value: 3 }],
        shuffle_intensity: 12,
        hints: 2,
        title_tokens: &[
            "Legendary Pour",
            "Mythic Mix",
            "Grand Gradient",
            "Elite Elixir",
            "Master Cascade",
        ],
    },
];

/// The stage whose range contains `level`.
pub fn stage_for(level: u32) -> GeneratorResult<&'static StageConfig> {
    STAGES
        .iter()
        .find(|stage| stage.contains(level))
        .ok_or_else(|| GeneratorError::configuration(level))
}

pub fn capacity(level: u32) -> GeneratorResult<usize> {
    let stage = stage_for(level)?;
    step_value(stage.capacity, level).ok_or_else(|| GeneratorError::configuration(level))
}

/// Cap a color count at the palette size.
pub fn clamp_to_palette(nominal: usize) -> usize {
    if nominal > PALETTE.len() {
        debug!(
            "{nominal} colors requested, clamping to the {} palette colors",
            PALETTE.len()
        );
    }
    nominal.min(PALETTE.len())
}

/// Number of colors for `level`, never more than the palette holds.
pub fn color_count(level: u32) -> GeneratorResult<usize> {
    let stage = stage_for(level)?;
    Ok(clamp_to_palette(stage.colors.value(level - stage.start)))
}

pub fn extra_empty_vessels(level: u32) -> GeneratorResult<usize> {
    let stage = stage_for(level)?;
    step_value(stage.extra_empty, level).ok_or_else(|| GeneratorError::configuration(level))
}

pub fn shuffle_intensity(level: u32) -> GeneratorResult<usize> {
    Ok(stage_for(level)?.shuffle_intensity)
}

pub fn hints(level: u32) -> GeneratorResult<u32> {
    Ok(stage_for(level)?.hints)
}

pub fn title_for(level: u32) -> GeneratorResult<String> {
    Ok(stage_for(level)?.title_for(level))
}

/// Everything the difficulty curve says about one level.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelParams {
    pub capacity: usize,
    pub color_count: usize,
    pub extra_empty: usize,
    pub shuffle_intensity: usize,
    pub hints: u32,
    pub title: String,
}

impl LevelParams {
    pub fn for_level(level: u32) -> GeneratorResult<Self> {
        Ok(Self {
            capacity: capacity(level)?,
            color_count: color_count(level)?,
            extra_empty: extra_empty_vessels(level)?,
            shuffle_intensity: shuffle_intensity(level)?,
            hints: hints(level)?,
            title: title_for(level)?,
        })
    }
}

/// Check the stage table: ranges contiguous from [`FIRST_LEVEL`] to [`LAST_LEVEL`], each step
/// rule defined from its stage start, title lists not empty, and capacity, color count and
/// extra empties never decreasing across the catalogue.
///
/// Returns [`GeneratorError::StageTable`] describing the first problem found.
pub fn check_stages() -> GeneratorResult<()> {
    let mut expected_start = FIRST_LEVEL;
    for stage in &STAGES {
        if stage.start != expected_start {
            return Err(GeneratorError::stage_table(format!(
                "stage starting at {} should start at {expected_start}",
                stage.start
            )));
        }
        if stage.end < stage.start {
            return Err(GeneratorError::stage_table(format!(
                "stage {}..={} is empty",
                stage.start, stage.end
            )));
        }
        if stage.title_tokens.is_empty() {
            return Err(GeneratorError::stage_table(format!(
                "stage {}..={} has no titles",
                stage.start, stage.end
            )));
        }
        for steps in [stage.capacity, stage.extra_empty] {
            if steps.first().is_none_or(|s| s.from != stage.start) {
                return Err(GeneratorError::stage_table(format!(
                    "stage {}..={} has a step rule not defined at its start",
                    stage.start, stage.end
                )));
            }
        }
        expected_start = stage.end + 1;
    }
    if expected_start != LAST_LEVEL + 1 {
        return Err(GeneratorError::stage_table(format!(
            "stages end at {} instead of {LAST_LEVEL}",
            expected_start - 1
        )));
    }

    let mut previous: Option<(usize, usize, usize)> = None;
    for level in FIRST_LEVEL..=LAST_LEVEL {
        let current = (
            capacity(level)?,
            color_count(level)?,
            extra_empty_vessels(level)?,
        );
        if let Some(prev) = previous
            && (current.0 < prev.0 || current.1 < prev.1 || current.2 < prev.2)
        {
            return Err(GeneratorError::stage_table(format!(
                "parameters decrease at level {level}: {prev:?} -> {current:?}"
            )));
        }
        previous = Some(current);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_table_is_consistent() {
        check_stages().unwrap();
    }

    #[test]
    fn every_level_has_a_stage() {
        for level in FIRST_LEVEL..=LAST_LEVEL {
            assert!(stage_for(level).is_ok(), "level {level}");
        }
    }

    #[test]
    fn levels_outside_the_catalogue_are_configuration_errors() {
        for level in [0, LAST_LEVEL + 1, u32::MAX] {
            assert!(matches!(
                stage_for(level),
                Err(GeneratorError::Configuration { level: l }) if l == level
            ));
            assert!(LevelParams::for_level(level).is_err());
        }
    }

    #[test]
    fn parameters_stay_in_their_ranges() {
        for level in FIRST_LEVEL..=LAST_LEVEL {
            let params = LevelParams::for_level(level).unwrap();
            assert!((4..=6).contains(&params.capacity));
            assert!((2..=3).contains(&params.extra_empty));
            assert!((3..=PALETTE.len()).contains(&params.color_count));
        }
    }

    #[test]
    fn breakpoints() {
        assert_eq!(capacity(90).unwrap(), 4);
        assert_eq!(capacity(91).unwrap(), 5);
        assert_eq!(capacity(150).unwrap(), 5);
        assert_eq!(capacity(151).unwrap(), 6);
        assert_eq!(extra_empty_vessels(90).unwrap(), 2);
        assert_eq!(extra_empty_vessels(91).unwrap(), 3);
        assert_eq!(color_count(1).unwrap(), 3);
        assert_eq!(color_count(11).unwrap(), 4);
        assert_eq!(color_count(50).unwrap(), 6);
        assert_eq!(color_count(51).unwrap(), 6);
        assert_eq!(color_count(63).unwrap(), 7);
        assert_eq!(color_count(200).unwrap(), 11);
        assert_eq!(color_count(300).unwrap(), 13);
    }

    #[test]
    fn titles_cycle_through_tokens_in_waves() {
        assert_eq!(title_for(1).unwrap(), "Easy Flow 1");
        assert_eq!(title_for(2).unwrap(), "Gentle Pour 1");
        assert_eq!(title_for(5).unwrap(), "Bright Breeze 1");
        assert_eq!(title_for(6).unwrap(), "Easy Flow 2");
        assert_eq!(title_for(50).unwrap(), "Bright Breeze 10");
        assert_eq!(title_for(51).unwrap(), "Vivid Stream 1");
        assert_eq!(title_for(300).unwrap(), "Master Cascade 20");
    }

    #[test]
    fn stage_scalars() {
        assert_eq!(hints(1).unwrap(), 5);
        assert_eq!(hints(300).unwrap(), 2);
        assert_eq!(shuffle_intensity(120).unwrap(), 8);
        assert_eq!(shuffle_intensity(121).unwrap(), 10);
    }

    #[test]
    fn ramp_clamps_at_its_maximum() {
        let ramp = ColorRamp { base: 3, every: 10, max: 6 };
        assert_eq!(ramp.value(0), 3);
        assert_eq!(ramp.value(9), 3);
        assert_eq!(ramp.value(10), 4);
        assert_eq!(ramp.value(1000), 6);
    }

    #[test]
    fn color_counts_past_the_palette_are_clamped() {
        let ramp = ColorRamp { base: 18, every: 1, max: 30 };
        assert_eq!(ramp.value(5), 23);
        assert_eq!(clamp_to_palette(ramp.value(5)), PALETTE.len());
        assert_eq!(clamp_to_palette(ramp.value(2)), PALETTE.len());
        assert_eq!(clamp_to_palette(ramp.value(1)), 19);
    }
}
