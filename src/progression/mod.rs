//! The progression engine: pure state transitions, no I/O
//!
//! Everything in this module is a total function over its documented input
//! domain. Callers pass the current records plus the clock; the engine
//! returns the next records and never touches a store or the network.

pub mod completion;
pub mod levels;
pub mod removal;
pub mod streak;

pub use completion::{complete_mission, Completion, LEVEL_UP_BONUS};
pub use levels::{
    difficulty_for_skill_level, experience_for_level, experience_to_next_level,
    level_from_experience, mission_reward,
};
pub use removal::{remove_skill, Removal};
