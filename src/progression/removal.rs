//! Skill-deletion reversal
//!
//! Deleting a skill removes its missions and takes back exactly the account
//! XP that skill's level-ups produced, using the contribution ledger. Other
//! skills' entries are never touched. If the last skill goes away while the
//! account still shows progress, the XP side of the record is reset.

use uuid::Uuid;

use crate::domain::UserProgress;
use crate::progression::levels::level_from_experience;

/// Next progress state after a skill deletion
#[derive(Debug, Clone)]
pub struct Removal {
    pub progress: UserProgress,
    /// Account XP taken back (the skill's ledger entry, clamped at zero)
    pub reversed: u64,
    /// Whether orphan cleanup reset the XP fields
    pub reset: bool,
}

/// Reverse a deleted skill's contribution to account-wide progress.
///
/// `remaining_skills` is the number of skills left after the deletion.
/// Never drives `total_experience` negative. Orphan cleanup resets the
/// level/XP fields (not `missions_completed`, not the streak fields) when
/// the last skill disappears while progress is still nonzero.
pub fn remove_skill(progress: &UserProgress, skill_id: Uuid, remaining_skills: usize) -> Removal {
    let mut progress = progress.clone();

    let contributed = progress.level_up_contributions.remove(&skill_id).unwrap_or(0);
    let reversed = contributed.min(progress.total_experience);
    progress.total_experience -= reversed;
    progress.total_level = level_from_experience(progress.total_experience);

    let orphaned =
        remaining_skills == 0 && (progress.total_experience > 0 || progress.total_level > 1);
    if orphaned {
        progress.total_level = 1;
        progress.total_experience = 0;
        progress.level_up_contributions.clear();
    }

    Removal {
        progress,
        reversed,
        reset: orphaned,
    }
}
