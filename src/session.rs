//! Account session - the explicit progression context
//!
//! One `Session` per CLI invocation. It loads the account from the local
//! store, applies engine transitions in memory first, persists each changed
//! record, and pushes a snapshot to the remote copy without waiting for it.
//! Collaborator failures are logged and never roll back the in-memory
//! state; the local/remote gap shows up in the sync status.

use anyhow::{bail, Result};
use chrono::{DateTime, Local, NaiveDate, Utc};
use tokio::task::JoinHandle;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::domain::{Difficulty, Mission, Skill, UserProgress};
use crate::generator::{GeneratedMission, MissionGenerator, TextSource};
use crate::progression::{self, Completion, Removal};
use crate::store::{AccountSnapshot, ProgressStore, RemoteSync, SyncStatus};

/// Default skill colors, assigned round-robin at creation
const PALETTE: &[&str] = &[
    "#e76f51", "#f4a261", "#e9c46a", "#2a9d8f", "#264653", "#9b5de5", "#f15bb5", "#00bbf9",
];

/// Fuzzy skill lookup threshold (Jaro-Winkler)
const NAME_MATCH_THRESHOLD: f64 = 0.82;

/// How a completion request resolved
#[derive(Debug)]
pub enum CompleteOutcome {
    /// The transition applied; records were updated
    Applied(Box<Completion>),
    /// Rejected no-op: rewards must never double-apply
    AlreadyCompleted,
    /// The mission id is unknown
    MissionMissing,
    /// The owning skill was deleted; the completion is dropped
    SkillMissing,
}

/// What a skill deletion did
#[derive(Debug)]
pub struct DeleteSummary {
    pub skill_name: String,
    pub missions_removed: usize,
    pub removal: Removal,
}

/// The account-progression context object
pub struct Session<S: ProgressStore> {
    store: S,
    remote: Option<RemoteSync>,
    generator: MissionGenerator,
    progress: UserProgress,
    skills: Vec<Skill>,
    last_streak_date: Option<NaiveDate>,
    sync_status: SyncStatus,
    pending_pushes: Vec<JoinHandle<bool>>,
}

impl<S: ProgressStore> Session<S> {
    /// Load the account state from the local store
    pub fn open(store: S, remote: Option<RemoteSync>, generator: MissionGenerator) -> Result<Self> {
        let progress = store.load_progress()?.unwrap_or_default();
        let skills = store.load_skills()?;
        let last_streak_date = store.load_last_streak_date()?;
        let sync_status = if remote.is_some() {
            SyncStatus::InSync
        } else {
            SyncStatus::Disabled
        };
        Ok(Self {
            store,
            remote,
            generator,
            progress,
            skills,
            last_streak_date,
            sync_status,
            pending_pushes: Vec::new(),
        })
    }

    pub fn progress(&self) -> &UserProgress {
        &self.progress
    }

    pub fn skills(&self) -> &[Skill] {
        &self.skills
    }

    pub fn sync_status(&self) -> SyncStatus {
        self.sync_status
    }

    pub fn generator(&self) -> &MissionGenerator {
        &self.generator
    }

    /// Missions for one skill, or all of them
    pub fn missions(&self, skill_id: Option<Uuid>) -> Result<Vec<Mission>> {
        self.store.load_missions(skill_id)
    }

    /// Resolve a skill by name: exact match first, then the closest fuzzy
    /// match above the threshold.
    pub fn find_skill(&self, query: &str) -> Option<&Skill> {
        let lower = query.to_lowercase();
        if let Some(skill) = self.skills.iter().find(|s| s.name.to_lowercase() == lower) {
            return Some(skill);
        }
        self.skills
            .iter()
            .map(|s| (strsim::jaro_winkler(&s.name.to_lowercase(), &lower), s))
            .filter(|(score, _)| *score >= NAME_MATCH_THRESHOLD)
            .max_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, s)| s)
    }

    // ========================================
    // SKILLS
    // ========================================

    /// Create a new skill at level 1
    pub fn create_skill(&mut self, name: &str, color: Option<String>) -> Result<&Skill> {
        let name = name.trim();
        if name.is_empty() {
            bail!("skill name cannot be empty");
        }
        if self.skills.iter().any(|s| s.name.eq_ignore_ascii_case(name)) {
            bail!("a skill named '{name}' already exists");
        }

        let color =
            color.unwrap_or_else(|| PALETTE[self.skills.len() % PALETTE.len()].to_string());
        let skill = Skill::new(name, color);

        if let Err(e) = self.store.create_skill(&skill) {
            error!("failed to persist skill '{}': {e:#}", skill.name);
        }
        info!(skill = %skill.name, "skill created");
        self.skills.push(skill);
        self.queue_push();
        Ok(self.skills.last().expect("just pushed"))
    }

    /// Delete a skill, cascade its missions, and reverse its account XP
    /// contribution. Other skills are unaffected.
    pub fn delete_skill(&mut self, skill_id: Uuid) -> Result<DeleteSummary> {
        let Some(index) = self.skills.iter().position(|s| s.id == skill_id) else {
            bail!("no such skill");
        };
        let skill = self.skills.remove(index);
        let missions_removed = self
            .store
            .load_missions(Some(skill_id))
            .map(|m| m.len())
            .unwrap_or(0);

        if let Err(e) = self.store.delete_skill(skill_id) {
            error!("failed to delete skill '{}' from store: {e:#}", skill.name);
        }

        let removal = progression::remove_skill(&self.progress, skill_id, self.skills.len());
        self.progress = removal.progress.clone();
        if removal.reset {
            info!("last skill removed, account progress reset");
        }
        if let Err(e) = self.store.save_progress(&self.progress) {
            error!("failed to persist progress after deletion: {e:#}");
        }

        self.queue_push();
        Ok(DeleteSummary {
            skill_name: skill.name,
            missions_removed,
            removal,
        })
    }

    // ========================================
    // MISSIONS
    // ========================================

    /// Create a hand-written mission. The reward is priced at creation from
    /// the difficulty and the skill's current level.
    pub fn add_mission(
        &mut self,
        skill_id: Uuid,
        title: &str,
        description: &str,
        difficulty: Difficulty,
        is_recurring: bool,
    ) -> Result<Mission> {
        let Some(skill) = self.skills.iter().find(|s| s.id == skill_id) else {
            bail!("no such skill");
        };
        let reward = progression::mission_reward(difficulty, skill.level);
        let mission = Mission::new(skill_id, title, description, difficulty, reward, is_recurring);

        if let Err(e) = self.store.create_mission(&mission) {
            error!("failed to persist mission '{}': {e:#}", mission.title);
        }
        self.queue_push();
        Ok(mission)
    }

    /// Draft a mission with the text generator (AI when configured,
    /// templates otherwise) and create it. Difficulty and reward follow the
    /// skill's current level.
    pub fn generate_mission(&mut self, skill_id: Uuid) -> Result<(Mission, GeneratedMission, TextSource)> {
        let Some(skill) = self.skills.iter().find(|s| s.id == skill_id) else {
            bail!("no such skill");
        };
        let difficulty = progression::difficulty_for_skill_level(skill.level);
        let recent: Vec<Mission> = self
            .store
            .load_missions(Some(skill_id))
            .unwrap_or_default()
            .into_iter()
            .rev()
            .take(5)
            .collect();

        let (drafted, source) =
            self.generator
                .generate_mission(skill, &self.progress, &recent, difficulty);
        debug!(skill = %skill.name, ?source, "mission text drafted");

        let reward = progression::mission_reward(difficulty, skill.level);
        let mission = Mission::new(
            skill_id,
            drafted.title.clone(),
            drafted.description.clone(),
            difficulty,
            reward,
            drafted.is_recurring,
        );
        if let Err(e) = self.store.create_mission(&mission) {
            error!("failed to persist mission '{}': {e:#}", mission.title);
        }
        self.queue_push();
        Ok((mission, drafted, source))
    }

    /// Complete a mission at the current wall-clock time
    pub fn complete_mission(&mut self, mission_id: Uuid) -> Result<CompleteOutcome> {
        self.complete_mission_at(mission_id, Utc::now(), Local::now().date_naive())
    }

    /// Clock-injected completion; `complete_mission` and tests route here.
    /// One call is one atomic transition over mission, skill, progress, and
    /// streak.
    pub fn complete_mission_at(
        &mut self,
        mission_id: Uuid,
        now: DateTime<Utc>,
        today: NaiveDate,
    ) -> Result<CompleteOutcome> {
        let Some(mission) = self.store.get_mission(mission_id)? else {
            return Ok(CompleteOutcome::MissionMissing);
        };
        if mission.is_completed {
            debug!(mission = %mission.title, "already completed, ignoring");
            return Ok(CompleteOutcome::AlreadyCompleted);
        }
        let Some(index) = self.skills.iter().position(|s| s.id == mission.skill_id) else {
            debug!(mission = %mission.title, "skill is gone, completion dropped");
            return Ok(CompleteOutcome::SkillMissing);
        };

        let Some(outcome) = progression::complete_mission(
            &mission,
            &self.skills[index],
            &self.progress,
            self.last_streak_date,
            now,
            today,
        ) else {
            return Ok(CompleteOutcome::AlreadyCompleted);
        };

        // Local state first; store writes are reported but never roll it back
        self.skills[index] = outcome.skill.clone();
        self.progress = outcome.progress.clone();
        self.last_streak_date = Some(outcome.last_streak_date);

        if let Err(e) = self.store.save_mission(&outcome.mission) {
            error!("failed to persist completed mission: {e:#}");
        }
        if let Err(e) = self.store.update_skill(&outcome.skill) {
            error!("failed to persist skill XP: {e:#}");
        }
        if let Err(e) = self.store.save_progress(&self.progress) {
            error!("failed to persist account progress: {e:#}");
        }
        if let Err(e) = self.store.save_last_streak_date(outcome.last_streak_date) {
            error!("failed to persist streak date: {e:#}");
        }

        info!(
            mission = %outcome.mission.title,
            reward = outcome.mission.experience,
            leveled_up = outcome.skill_leveled_up,
            "mission completed"
        );
        self.queue_push();
        Ok(CompleteOutcome::Applied(Box::new(outcome)))
    }

    // ========================================
    // REMOTE SYNC
    // ========================================

    /// Queue a fire-and-forget snapshot push. Local state is already
    /// committed by the time this runs; the push is never awaited here.
    fn queue_push(&mut self) {
        let Some(remote) = self.remote.clone() else {
            return;
        };
        let snapshot = AccountSnapshot {
            progress: self.progress.clone(),
            skills: self.skills.clone(),
            missions: self.store.load_missions(None).unwrap_or_default(),
            last_streak_date: self.last_streak_date,
        };
        self.sync_status = SyncStatus::Pending;
        self.pending_pushes.push(tokio::task::spawn_blocking(move || {
            match remote.push_snapshot(&snapshot) {
                Ok(()) => true,
                Err(e) => {
                    error!("remote push failed, local state is ahead: {e:#}");
                    false
                }
            }
        }));
    }

    /// Wait for in-flight pushes and report where the remote copy stands.
    /// Called once at the end of a command, after all local mutations.
    pub async fn finish(&mut self) -> SyncStatus {
        if self.remote.is_none() {
            return SyncStatus::Disabled;
        }
        let mut all_ok = true;
        for handle in self.pending_pushes.drain(..) {
            match handle.await {
                Ok(ok) => all_ok &= ok,
                Err(e) => {
                    error!("remote push task failed: {e}");
                    all_ok = false;
                }
            }
        }
        self.sync_status = if all_ok {
            SyncStatus::InSync
        } else {
            SyncStatus::Failed
        };
        self.sync_status
    }
}
