use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Account-wide progression record (one per account).
///
/// `total_experience` only grows through per-skill level-up bonuses, never by
/// summing skill XP directly. `level_up_contributions` records how much of it
/// each skill produced, so deleting a skill can reverse exactly its share.
/// Invariant: the ledger values sum to `total_experience`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProgress {
    /// Always `level_from_experience(total_experience)`
    pub total_level: u32,
    pub total_experience: u64,
    pub missions_completed: u64,
    pub current_streak: u32,
    /// Max observed value of `current_streak`
    pub longest_streak: u32,
    /// Skill id -> account XP that skill's level-ups produced
    pub level_up_contributions: HashMap<Uuid, u64>,
}

impl Default for UserProgress {
    fn default() -> Self {
        Self {
            total_level: 1,
            total_experience: 0,
            missions_completed: 0,
            current_streak: 0,
            longest_streak: 0,
            level_up_contributions: HashMap::new(),
        }
    }
}

impl UserProgress {
    /// Account XP a skill is responsible for (0 if never leveled up)
    pub fn contribution(&self, skill_id: Uuid) -> u64 {
        self.level_up_contributions.get(&skill_id).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let progress = UserProgress::default();
        assert_eq!(progress.total_level, 1);
        assert_eq!(progress.total_experience, 0);
        assert_eq!(progress.contribution(Uuid::new_v4()), 0);
    }
}
