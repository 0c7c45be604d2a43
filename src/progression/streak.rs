//! Daily streak state machine
//!
//! A streak counts consecutive calendar days with at least one mission
//! completion, compared date-only in the user's local time zone. The
//! decision table keys on two inputs: whether `last_date` is today, and
//! whether it is yesterday. Nothing else affects the transition.

use chrono::NaiveDate;

use crate::domain::UserProgress;

/// Outcome of feeding one completion event into the streak machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreakUpdate {
    /// A completion was already recorded today; the counter is unchanged
    AlreadyCountedToday,
    /// First completion today; the counter moved to the contained value
    Counted(u32),
}

/// Next value of the streak counter for the first completion on `today`.
///
/// Returns `None` when today was already counted - including the corrupted
/// `current == 0` case, which is deliberately left as a no-op.
fn next_count(current: u32, last_date: Option<NaiveDate>, today: NaiveDate) -> Option<u32> {
    match last_date {
        Some(last) if last == today => None,
        Some(last) if Some(last) == today.pred_opt() => Some(current + 1),
        None => Some(current.max(1)),
        // Gap of two or more days (or a date in the future): streak broken
        Some(_) => Some(1),
    }
}

/// Advance the streak for a completion event that happened on `today`.
///
/// Invoked exactly once per mission completion. Updates `current_streak`
/// and `longest_streak` on the progress record and returns the new value of
/// the persisted last-streak-date.
pub fn record_completion(
    progress: &mut UserProgress,
    last_date: Option<NaiveDate>,
    today: NaiveDate,
) -> (StreakUpdate, NaiveDate) {
    let update = match next_count(progress.current_streak, last_date, today) {
        Some(count) => {
            progress.current_streak = count;
            StreakUpdate::Counted(count)
        }
        None => StreakUpdate::AlreadyCountedToday,
    };
    progress.longest_streak = progress.longest_streak.max(progress.current_streak);
    (update, today)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).expect("valid test date")
    }

    #[test]
    fn test_first_ever_completion_starts_at_one() {
        let mut progress = UserProgress::default();
        let (update, date) = record_completion(&mut progress, None, day(10));
        assert_eq!(update, StreakUpdate::Counted(1));
        assert_eq!(date, day(10));
        assert_eq!(progress.current_streak, 1);
        assert_eq!(progress.longest_streak, 1);
    }

    #[test]
    fn test_same_day_does_not_double_count() {
        let mut progress = UserProgress::default();
        let (_, date) = record_completion(&mut progress, None, day(10));
        let (update, _) = record_completion(&mut progress, Some(date), day(10));
        assert_eq!(update, StreakUpdate::AlreadyCountedToday);
        assert_eq!(progress.current_streak, 1);
    }

    #[test]
    fn test_consecutive_day_extends() {
        let mut progress = UserProgress::default();
        let (_, date) = record_completion(&mut progress, None, day(10));
        let (update, _) = record_completion(&mut progress, Some(date), day(11));
        assert_eq!(update, StreakUpdate::Counted(2));
        assert_eq!(progress.current_streak, 2);
        assert_eq!(progress.longest_streak, 2);
    }

    #[test]
    fn test_gap_resets_to_one() {
        let mut progress = UserProgress::default();
        let (_, d1) = record_completion(&mut progress, None, day(10));
        let (_, d2) = record_completion(&mut progress, Some(d1), day(11));
        let (update, _) = record_completion(&mut progress, Some(d2), day(14));
        assert_eq!(update, StreakUpdate::Counted(1));
        assert_eq!(progress.current_streak, 1);
        // Longest keeps the pre-gap high-water mark
        assert_eq!(progress.longest_streak, 2);
    }

    #[test]
    fn test_first_completion_never_double_counts_dirty_state() {
        // current_streak somehow nonzero with no recorded date: keep the max
        let mut progress = UserProgress {
            current_streak: 3,
            longest_streak: 3,
            ..Default::default()
        };
        let (update, _) = record_completion(&mut progress, None, day(10));
        assert_eq!(update, StreakUpdate::Counted(3));
        assert_eq!(progress.current_streak, 3);
    }

    #[test]
    fn test_corrupted_zero_with_today_is_noop() {
        // last date says today but the counter is 0: defensive no-op
        let mut progress = UserProgress::default();
        let (update, date) = record_completion(&mut progress, Some(day(10)), day(10));
        assert_eq!(update, StreakUpdate::AlreadyCountedToday);
        assert_eq!(date, day(10));
        assert_eq!(progress.current_streak, 0);
    }

    #[test]
    fn test_month_boundary_extends() {
        let mut progress = UserProgress::default();
        let last = NaiveDate::from_ymd_opt(2026, 2, 28).unwrap();
        let today = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        progress.current_streak = 5;
        progress.longest_streak = 5;
        let (update, _) = record_completion(&mut progress, Some(last), today);
        assert_eq!(update, StreakUpdate::Counted(6));
        assert_eq!(progress.longest_streak, 6);
    }
}
