//! Level generator for a water sort puzzle.
//!
//! Each level of the catalogue is derived from its index alone:
//!
//! * [`difficulty`] maps the index to a vessel capacity, a number of colors, spare empty
//!   vessels, a shuffle intensity, a hint budget and a title.
//! * [`palette`] provides the colors, [`model`] the vessels and puzzle states.
//! * [`pour`] is the only move of the game, [`validate`] tells solved and well mixed states
//!   apart.
//! * [`scramble`] turns a sorted state into a puzzle with a seeded random walk.
//! * [`level`] puts it all together into a [`level::LevelRecord`].
//!
//! [`solver`] can check a generated level by searching for a solution, and [`store`] writes
//! records to disk.

pub mod difficulty;
pub mod error;
pub mod level;
pub mod model;
pub mod palette;
pub mod pour;
pub mod scramble;
pub mod solver;
pub mod store;
pub mod validate;

pub use error::{GeneratorError, GeneratorResult};
pub use level::{LevelBuilder, LevelRecord, generate_level};
pub use scramble::WalkStrategy;
