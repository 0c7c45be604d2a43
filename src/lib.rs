//! Questline - gamified personal growth tracking
//!
//! Questline tracks user-defined skills, turns them into missions worth
//! experience points, and keeps an account-wide level plus a daily streak.
//! Mission text can be drafted by an AI endpoint, with a deterministic
//! template fallback when no credential is configured or the call fails.
//!
//! ## Layering
//!
//! 1. **Progression engine** (`progression`): pure leveling arithmetic, the
//!    mission-completion reducer, the streak state machine, and skill
//!    deletion reversal. No I/O.
//!
//! 2. **Ports** (`store`, `generator`): the local SQLite store (source of
//!    truth for a session), the optional fire-and-forget remote sync, and
//!    the mission/challenge text strategies.
//!
//! 3. **Session** (`session`): the explicitly-passed account context that
//!    wires the engine to its collaborators.

pub mod cli;
pub mod config;
pub mod domain;
pub mod generator;
pub mod progression;
pub mod session;
pub mod store;

pub use domain::*;
