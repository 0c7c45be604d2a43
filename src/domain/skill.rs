use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::progression::levels::{
    experience_for_level, experience_to_next_level, level_from_experience,
};

/// A user-tracked area of improvement with its own level and XP.
///
/// `level`, `experience`, and `experience_to_next` are derived from
/// `total_experience` and kept in sync through [`Skill::sync_derived`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Skill {
    pub id: Uuid,
    pub name: String,
    /// Always `level_from_experience(total_experience)`
    pub level: u32,
    /// XP gained within the current level (informational)
    pub experience: u64,
    /// XP still needed to reach the next level boundary
    pub experience_to_next: u64,
    /// Lifetime XP; never decreases while the skill exists
    pub total_experience: u64,
    /// Display color for the UI layer (hex string)
    pub color: String,
    pub created_at: DateTime<Utc>,
}

impl Skill {
    /// Create a fresh skill at level 1 with no experience
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            level: 1,
            experience: 0,
            experience_to_next: experience_to_next_level(0),
            total_experience: 0,
            color: color.into(),
            created_at: Utc::now(),
        }
    }

    /// Recompute the derived level fields from `total_experience`
    pub fn sync_derived(&mut self) {
        self.level = level_from_experience(self.total_experience);
        self.experience = self.total_experience - experience_for_level(self.level);
        self.experience_to_next = experience_to_next_level(self.total_experience);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_skill_starts_at_level_one() {
        let skill = Skill::new("Guitar", "#e76f51");
        assert_eq!(skill.level, 1);
        assert_eq!(skill.total_experience, 0);
        assert_eq!(skill.experience_to_next, 100);
    }

    #[test]
    fn test_sync_derived_recomputes_level_fields() {
        let mut skill = Skill::new("Guitar", "#e76f51");
        skill.total_experience = 150;
        skill.sync_derived();
        assert_eq!(skill.level, 2);
        assert_eq!(skill.experience, 50); // 150 - 100 at the level 2 boundary
        assert_eq!(skill.experience_to_next, 250); // 400 - 150
    }
}
