use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Mission difficulty tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Expert,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
            Self::Expert => "expert",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "easy" => Some(Self::Easy),
            "medium" => Some(Self::Medium),
            "hard" => Some(Self::Hard),
            "expert" => Some(Self::Expert),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
            Self::Expert => "Expert",
        }
    }

    /// Base XP reward before the skill-level bonus
    pub fn base_reward(&self) -> u64 {
        match self {
            Self::Easy => 50,
            Self::Medium => 100,
            Self::Hard => 200,
            Self::Expert => 400,
        }
    }

    /// Suggested completion window in minutes
    pub fn time_limit_minutes(&self) -> u32 {
        match self {
            Self::Easy => 30,
            Self::Medium => 60,
            Self::Hard => 120,
            Self::Expert => 240,
        }
    }
}

/// A single task tied to a skill, rewarding XP once completed.
///
/// Invariant: `completed_at` is set iff `is_completed` is true. A mission is
/// completed at most once; re-completion is rejected by the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mission {
    pub id: Uuid,
    pub skill_id: Uuid,
    pub title: String,
    pub description: String,
    pub difficulty: Difficulty,
    /// Fixed XP reward, priced at creation time
    pub experience: u64,
    pub time_limit_minutes: u32,
    pub is_completed: bool,
    pub is_recurring: bool,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Mission {
    /// Create a new open mission attached to a skill
    pub fn new(
        skill_id: Uuid,
        title: impl Into<String>,
        description: impl Into<String>,
        difficulty: Difficulty,
        experience: u64,
        is_recurring: bool,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            skill_id,
            title: title.into(),
            description: description.into(),
            difficulty,
            experience,
            time_limit_minutes: difficulty.time_limit_minutes(),
            is_completed: false,
            is_recurring,
            created_at: Utc::now(),
            completed_at: None,
        }
    }
}
