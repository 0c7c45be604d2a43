//! Mission and challenge text generation
//!
//! Two strategies behind one entry point: an AI endpoint (when a credential
//! is configured) and a deterministic template catalog that always
//! succeeds. Any AI failure - absent credential, network error, malformed
//! response - falls through to the templates, so creating a mission can
//! never fail or block on text generation.

mod ai;
mod templates;

pub use ai::{AiClient, GenerateError};
pub use templates::{challenge_template, mission_template};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::AiConfig;
use crate::domain::{Difficulty, Mission, Skill, UserProgress};

/// Drafted mission copy, from either strategy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedMission {
    pub title: String,
    pub description: String,
    /// Up to 3 concrete steps
    #[serde(default)]
    pub specific_tasks: Vec<String>,
    /// Up to 2 tips tuned to the user's level
    #[serde(default)]
    pub personalized_tips: Vec<String>,
    /// Up to 3 pointers to learning material
    #[serde(default)]
    pub resources: Vec<String>,
    #[serde(default)]
    pub is_recurring: bool,
}

impl GeneratedMission {
    /// Enforce the contract's list bounds on whatever the model returned
    fn clamp(mut self) -> Self {
        self.specific_tasks.truncate(3);
        self.personalized_tips.truncate(2);
        self.resources.truncate(3);
        self
    }
}

/// Drafted copy for a time-boxed challenge
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedChallenge {
    pub title: String,
    pub description: String,
    pub duration_days: u32,
}

/// Which strategy produced the text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextSource {
    Ai,
    Template,
}

/// Capability-checked text generator: AI when configured, templates always
pub struct MissionGenerator {
    ai: Option<AiClient>,
}

impl MissionGenerator {
    /// Build from config. A missing API key is a normal condition, not an
    /// error: the generator simply runs template-only.
    pub fn from_config(config: &AiConfig) -> Self {
        let ai = AiClient::from_config(config);
        if ai.is_none() {
            debug!("no AI credential configured, mission text will use templates");
        }
        Self { ai }
    }

    /// Template-only generator (used by tests and offline mode)
    pub fn template_only() -> Self {
        Self { ai: None }
    }

    /// Draft mission text for a skill at the given difficulty.
    ///
    /// Total: always returns text. `recent` lets the model avoid repeating
    /// mission ideas the user has already seen.
    pub fn generate_mission(
        &self,
        skill: &Skill,
        progress: &UserProgress,
        recent: &[Mission],
        difficulty: Difficulty,
    ) -> (GeneratedMission, TextSource) {
        if let Some(ai) = &self.ai {
            match ai.draft_mission(skill, progress, recent, difficulty) {
                Ok(drafted) => return (drafted.clamp(), TextSource::Ai),
                Err(e) => warn!("AI mission generation failed, using template: {e}"),
            }
        }
        (mission_template(&skill.name, difficulty), TextSource::Template)
    }

    /// Draft a time-boxed challenge for a skill
    pub fn generate_challenge(
        &self,
        skill: &Skill,
        progress: &UserProgress,
        duration_days: u32,
    ) -> (GeneratedChallenge, TextSource) {
        if let Some(ai) = &self.ai {
            match ai.draft_challenge(skill, progress, duration_days) {
                Ok(drafted) => return (drafted, TextSource::Ai),
                Err(e) => warn!("AI challenge generation failed, using template: {e}"),
            }
        }
        (
            challenge_template(&skill.name, skill.level, duration_days),
            TextSource::Template,
        )
    }
}
