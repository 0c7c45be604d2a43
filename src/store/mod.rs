//! Persistence ports for Questline
//!
//! Two explicit ports, per the local-first design:
//!
//! - [`ProgressStore`]: the local store, source of truth for a session.
//!   Realized by [`SqliteStore`] (`~/.questline/questline.db`).
//! - [`RemoteSync`]: an optional remote copy, pushed fire-and-forget. Its
//!   failures never roll back local state; the gap is surfaced through
//!   [`SyncStatus`] instead of hidden.

mod db;
mod local;
mod remote;

pub use db::StoreDb;
pub use local::SqliteStore;
pub use remote::{AccountSnapshot, RemoteSync, SyncStatus};

use anyhow::Result;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::{Mission, Skill, UserProgress};

/// Local persistence port.
///
/// Every call may fail independently; callers keep operating on in-memory
/// state and report the failure rather than aborting.
pub trait ProgressStore {
    /// Singleton progress record; `None` when the account is brand new
    fn load_progress(&self) -> Result<Option<UserProgress>>;
    fn save_progress(&self, progress: &UserProgress) -> Result<()>;

    fn load_skills(&self) -> Result<Vec<Skill>>;
    fn create_skill(&self, skill: &Skill) -> Result<()>;
    fn update_skill(&self, skill: &Skill) -> Result<()>;
    /// Removes the skill and cascades to its missions
    fn delete_skill(&self, skill_id: Uuid) -> Result<()>;

    /// Missions for one skill, or all missions when `skill_id` is `None`
    fn load_missions(&self, skill_id: Option<Uuid>) -> Result<Vec<Mission>>;
    fn get_mission(&self, mission_id: Uuid) -> Result<Option<Mission>>;
    fn create_mission(&self, mission: &Mission) -> Result<()>;
    fn save_mission(&self, mission: &Mission) -> Result<()>;

    /// Calendar date of the last streak-counted completion
    fn load_last_streak_date(&self) -> Result<Option<NaiveDate>>;
    fn save_last_streak_date(&self, date: NaiveDate) -> Result<()>;
}
