//! Mission-completion reducer
//!
//! One completion event is one atomic transition over the mission, its
//! skill, the account progress, and the streak. The reducer is pure: it
//! clones the inputs, applies every step, and hands the next records back
//! to the caller for persistence.

use chrono::{DateTime, NaiveDate, Utc};

use crate::domain::{Mission, Skill, UserProgress};
use crate::progression::levels::level_from_experience;
use crate::progression::streak::{self, StreakUpdate};

/// Fixed account XP awarded each time any skill crosses a level boundary.
/// The account's "Total Level" grows only through this bonus.
pub const LEVEL_UP_BONUS: u64 = 50;

/// Next state produced by one mission completion
#[derive(Debug, Clone)]
pub struct Completion {
    pub mission: Mission,
    pub skill: Skill,
    pub progress: UserProgress,
    /// New value of the persisted last-streak-date
    pub last_streak_date: NaiveDate,
    pub streak_update: StreakUpdate,
    pub skill_leveled_up: bool,
    pub account_leveled_up: bool,
}

/// Apply a mission completion.
///
/// `now` stamps the mission; `today` is the completion's calendar date in
/// the user's local time zone and drives the streak machine. Returns `None`
/// for the rejected no-op cases: the mission was already completed (rewards
/// must never double-apply) or it does not belong to the given skill.
pub fn complete_mission(
    mission: &Mission,
    skill: &Skill,
    progress: &UserProgress,
    last_streak_date: Option<NaiveDate>,
    now: DateTime<Utc>,
    today: NaiveDate,
) -> Option<Completion> {
    if mission.is_completed || mission.skill_id != skill.id {
        return None;
    }

    let mut mission = mission.clone();
    mission.is_completed = true;
    mission.completed_at = Some(now);

    let mut skill = skill.clone();
    let old_level = skill.level;
    skill.total_experience += mission.experience;
    skill.sync_derived();
    let skill_leveled_up = skill.level > old_level;

    let mut progress = progress.clone();
    let bonus = if skill_leveled_up { LEVEL_UP_BONUS } else { 0 };
    progress.total_experience += bonus;
    let old_total_level = progress.total_level;
    progress.total_level = level_from_experience(progress.total_experience);
    let account_leveled_up = progress.total_level > old_total_level;
    *progress.level_up_contributions.entry(skill.id).or_insert(0) += bonus;
    progress.missions_completed += 1;

    let (streak_update, last_streak_date) =
        streak::record_completion(&mut progress, last_streak_date, today);

    Some(Completion {
        mission,
        skill,
        progress,
        last_streak_date,
        streak_update,
        skill_leveled_up,
        account_leveled_up,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Difficulty;

    fn fixture() -> (Skill, Mission, UserProgress) {
        let skill = Skill::new("Guitar", "#e76f51");
        let mission = Mission::new(skill.id, "Practice scales", "", Difficulty::Easy, 50, false);
        (skill, mission, UserProgress::default())
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).expect("valid test date")
    }

    #[test]
    fn test_easy_mission_no_level_up() {
        let (skill, mission, progress) = fixture();
        let out = complete_mission(&mission, &skill, &progress, None, Utc::now(), day(10))
            .expect("open mission completes");

        assert!(out.mission.is_completed);
        assert!(out.mission.completed_at.is_some());
        assert_eq!(out.skill.total_experience, 50);
        assert_eq!(out.skill.level, 1);
        assert!(!out.skill_leveled_up);
        // No boundary crossed: account XP untouched, ledger entry stays 0
        assert_eq!(out.progress.total_experience, 0);
        assert_eq!(out.progress.total_level, 1);
        assert_eq!(out.progress.contribution(skill.id), 0);
        assert_eq!(out.progress.missions_completed, 1);
        assert_eq!(out.progress.current_streak, 1);
    }

    #[test]
    fn test_level_up_awards_account_bonus() {
        let (mut skill, _, progress) = fixture();
        skill.total_experience = 60;
        skill.sync_derived();
        let mission = Mission::new(skill.id, "Long session", "", Difficulty::Easy, 55, false);

        let out = complete_mission(&mission, &skill, &progress, None, Utc::now(), day(10))
            .expect("open mission completes");

        // 60 + 55 = 115 crosses the level 2 boundary at 100
        assert_eq!(out.skill.level, 2);
        assert!(out.skill_leveled_up);
        assert_eq!(out.progress.total_experience, LEVEL_UP_BONUS);
        assert_eq!(out.progress.contribution(skill.id), LEVEL_UP_BONUS);
    }

    #[test]
    fn test_completion_is_idempotent() {
        let (skill, mission, progress) = fixture();
        let first = complete_mission(&mission, &skill, &progress, None, Utc::now(), day(10))
            .expect("open mission completes");

        // Re-invoking with the already-completed mission must not double-apply
        let again = complete_mission(
            &first.mission,
            &first.skill,
            &first.progress,
            Some(first.last_streak_date),
            Utc::now(),
            day(10),
        );
        assert!(again.is_none());
    }

    #[test]
    fn test_mission_for_other_skill_is_dropped() {
        let (skill, _, progress) = fixture();
        let other = Skill::new("Chess", "#2a9d8f");
        let mission = Mission::new(other.id, "Openings", "", Difficulty::Easy, 50, false);
        assert!(complete_mission(&mission, &skill, &progress, None, Utc::now(), day(10)).is_none());
    }

    #[test]
    fn test_ledger_sums_to_total_experience() {
        let mut skill_a = Skill::new("Guitar", "#e76f51");
        let skill_b = Skill::new("Chess", "#2a9d8f");
        let mut progress = UserProgress::default();

        // Drive skill A across two boundaries (100 and 400), skill B across none
        let m1 = Mission::new(skill_a.id, "m1", "", Difficulty::Medium, 150, false);
        let out = complete_mission(&m1, &skill_a, &progress, None, Utc::now(), day(10)).unwrap();
        skill_a = out.skill;
        progress = out.progress;
        let mut last = Some(out.last_streak_date);

        let m2 = Mission::new(skill_a.id, "m2", "", Difficulty::Medium, 300, false);
        let out = complete_mission(&m2, &skill_a, &progress, last, Utc::now(), day(10)).unwrap();
        skill_a = out.skill;
        progress = out.progress;
        last = Some(out.last_streak_date);

        let m3 = Mission::new(skill_b.id, "m3", "", Difficulty::Easy, 10, false);
        let out = complete_mission(&m3, &skill_b, &progress, last, Utc::now(), day(10)).unwrap();
        progress = out.progress;

        let ledger_sum: u64 = progress.level_up_contributions.values().sum();
        assert_eq!(ledger_sum, progress.total_experience);
        assert_eq!(progress.contribution(skill_a.id), 2 * LEVEL_UP_BONUS);
        assert_eq!(progress.contribution(skill_b.id), 0);
        assert_eq!(progress.missions_completed, 3);
    }

    #[test]
    fn test_streak_runs_once_per_completion_event() {
        let (skill, mission, progress) = fixture();
        let first = complete_mission(&mission, &skill, &progress, None, Utc::now(), day(10)).unwrap();
        assert_eq!(first.streak_update, StreakUpdate::Counted(1));

        let second_mission =
            Mission::new(skill.id, "Another", "", Difficulty::Easy, 50, false);
        let second = complete_mission(
            &second_mission,
            &first.skill,
            &first.progress,
            Some(first.last_streak_date),
            Utc::now(),
            day(10),
        )
        .unwrap();
        assert_eq!(second.streak_update, StreakUpdate::AlreadyCountedToday);
        assert_eq!(second.progress.current_streak, 1);
        assert_eq!(second.progress.missions_completed, 2);
    }
}
