//! End-to-end progression flows through the session and the SQLite store
//!
//! These tests drive the same path the CLI uses: open a session against a
//! throwaway database, mutate, and (where it matters) reopen to prove the
//! state survived.

use chrono::{NaiveDate, Utc};
use tempfile::tempdir;

use questline::domain::Difficulty;
use questline::generator::MissionGenerator;
use questline::progression::LEVEL_UP_BONUS;
use questline::session::{CompleteOutcome, Session};
use questline::store::SqliteStore;

fn open(dir: &tempfile::TempDir) -> Session<SqliteStore> {
    let store = SqliteStore::open(&dir.path().join("questline.db")).unwrap();
    Session::open(store, None, MissionGenerator::template_only()).unwrap()
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 4, d).expect("valid test date")
}

#[test]
fn easy_mission_end_to_end() {
    let dir = tempdir().unwrap();
    let mut session = open(&dir);

    let skill_id = session.create_skill("Guitar", None).unwrap().id;
    let mission = session
        .add_mission(skill_id, "Practice scales", "", Difficulty::Easy, false)
        .unwrap();
    // Level 1 Easy mission: 50 base + 10% level bonus
    assert_eq!(mission.experience, 55);

    let outcome = session
        .complete_mission_at(mission.id, Utc::now(), day(1))
        .unwrap();
    let CompleteOutcome::Applied(outcome) = outcome else {
        panic!("completion should apply");
    };

    assert_eq!(outcome.skill.total_experience, 55);
    assert_eq!(outcome.skill.level, 1);
    assert!(!outcome.skill_leveled_up);
    assert_eq!(session.progress().total_experience, 0);
    assert_eq!(session.progress().missions_completed, 1);
    assert_eq!(session.progress().current_streak, 1);
}

#[test]
fn level_up_pays_account_bonus_exactly_at_the_boundary() {
    let dir = tempdir().unwrap();
    let mut session = open(&dir);
    let skill_id = session.create_skill("Guitar", None).unwrap().id;

    // First completion: 55 XP, below the 100 XP boundary
    let m1 = session
        .add_mission(skill_id, "Session 1", "", Difficulty::Easy, false)
        .unwrap();
    session.complete_mission_at(m1.id, Utc::now(), day(1)).unwrap();
    assert_eq!(session.progress().total_experience, 0);

    // Second completion crosses it: 110 XP total -> skill level 2
    let m2 = session
        .add_mission(skill_id, "Session 2", "", Difficulty::Easy, false)
        .unwrap();
    let outcome = session.complete_mission_at(m2.id, Utc::now(), day(1)).unwrap();
    let CompleteOutcome::Applied(outcome) = outcome else {
        panic!("completion should apply");
    };
    assert!(outcome.skill_leveled_up);
    assert_eq!(outcome.skill.level, 2);
    assert_eq!(session.progress().total_experience, LEVEL_UP_BONUS);
    assert_eq!(session.progress().contribution(skill_id), LEVEL_UP_BONUS);

    // Third completion stays inside level 2: no further bonus
    let m3 = session
        .add_mission(skill_id, "Session 3", "", Difficulty::Easy, false)
        .unwrap();
    session.complete_mission_at(m3.id, Utc::now(), day(1)).unwrap();
    assert_eq!(session.progress().total_experience, LEVEL_UP_BONUS);
}

#[test]
fn streak_scenario_from_the_decision_table() {
    let dir = tempdir().unwrap();
    let mut session = open(&dir);
    let skill_id = session.create_skill("Running", None).unwrap().id;

    let complete_on = |session: &mut Session<SqliteStore>, d: u32| {
        let m = session
            .add_mission(skill_id, "Run", "", Difficulty::Easy, false)
            .unwrap();
        session.complete_mission_at(m.id, Utc::now(), day(d)).unwrap();
    };

    // Day D: first ever completion starts the streak
    complete_on(&mut session, 10);
    assert_eq!(session.progress().current_streak, 1);

    // Same day: no further increase
    complete_on(&mut session, 10);
    assert_eq!(session.progress().current_streak, 1);

    // Days D+1 and D+2: extends each day
    complete_on(&mut session, 11);
    assert_eq!(session.progress().current_streak, 2);
    complete_on(&mut session, 12);
    assert_eq!(session.progress().current_streak, 3);

    // Day D+5: skipped days, streak resets to 1
    complete_on(&mut session, 15);
    assert_eq!(session.progress().current_streak, 1);
    assert_eq!(session.progress().longest_streak, 3);
}

#[test]
fn completing_twice_rewards_once_across_reopen() {
    let dir = tempdir().unwrap();
    let mission_id;
    {
        let mut session = open(&dir);
        let skill_id = session.create_skill("Guitar", None).unwrap().id;
        let mission = session
            .add_mission(skill_id, "Practice", "", Difficulty::Medium, false)
            .unwrap();
        mission_id = mission.id;
        session.complete_mission_at(mission_id, Utc::now(), day(1)).unwrap();
    }

    // New session, same database: the completion must not re-apply
    let mut session = open(&dir);
    assert_eq!(session.progress().missions_completed, 1);
    let outcome = session
        .complete_mission_at(mission_id, Utc::now(), day(2))
        .unwrap();
    assert!(matches!(outcome, CompleteOutcome::AlreadyCompleted));
    assert_eq!(session.progress().missions_completed, 1);
    assert_eq!(session.progress().current_streak, 1);
}

#[test]
fn deletion_reverses_only_the_deleted_skills_share() {
    let dir = tempdir().unwrap();
    let mut session = open(&dir);
    let guitar = session.create_skill("Guitar", None).unwrap().id;
    let chess = session.create_skill("Chess", None).unwrap().id;

    // Guitar levels up twice (level 3 needs 400 XP), chess once
    for title in ["g1", "g2", "g3", "g4"] {
        let m = session
            .add_mission(guitar, title, "", Difficulty::Medium, false)
            .unwrap();
        session.complete_mission_at(m.id, Utc::now(), day(1)).unwrap();
    }
    let m = session
        .add_mission(chess, "c1", "", Difficulty::Medium, false)
        .unwrap();
    session.complete_mission_at(m.id, Utc::now(), day(1)).unwrap();

    let guitar_share = session.progress().contribution(guitar);
    let chess_share = session.progress().contribution(chess);
    assert_eq!(guitar_share, 2 * LEVEL_UP_BONUS);
    assert_eq!(chess_share, LEVEL_UP_BONUS);
    let total_before = session.progress().total_experience;

    let summary = session.delete_skill(guitar).unwrap();
    assert_eq!(summary.removal.reversed, guitar_share);
    assert_eq!(session.progress().total_experience, total_before - guitar_share);
    assert_eq!(session.progress().contribution(chess), chess_share);
    assert_eq!(session.progress().contribution(guitar), 0);

    // Guitar's missions are gone, chess's remain
    assert!(session.missions(Some(guitar)).unwrap().is_empty());
    assert_eq!(session.missions(Some(chess)).unwrap().len(), 1);
}

#[test]
fn state_survives_reopen() {
    let dir = tempdir().unwrap();
    {
        let mut session = open(&dir);
        let skill_id = session.create_skill("Spanish", None).unwrap().id;
        let m = session
            .add_mission(skill_id, "Flashcards", "", Difficulty::Hard, true)
            .unwrap();
        session.complete_mission_at(m.id, Utc::now(), day(20)).unwrap();
    }

    let session = open(&dir);
    assert_eq!(session.skills().len(), 1);
    let skill = &session.skills()[0];
    assert_eq!(skill.name, "Spanish");
    // Hard at level 1: 200 base + 10% = 220 XP -> level 2
    assert_eq!(skill.total_experience, 220);
    assert_eq!(skill.level, 2);
    assert_eq!(session.progress().total_experience, LEVEL_UP_BONUS);
    assert_eq!(session.progress().current_streak, 1);

    let missions = session.missions(None).unwrap();
    assert_eq!(missions.len(), 1);
    assert!(missions[0].is_completed);
    assert!(missions[0].completed_at.is_some());
    assert!(missions[0].is_recurring);
}

#[test]
fn mission_generation_prices_by_skill_level() {
    let dir = tempdir().unwrap();
    let mut session = open(&dir);
    let skill_id = session.create_skill("Coding", None).unwrap().id;

    // Fresh skill: Easy difficulty, template text mentions the skill
    let (mission, drafted, _) = session.generate_mission(skill_id).unwrap();
    assert_eq!(mission.difficulty, Difficulty::Easy);
    assert_eq!(mission.experience, 55);
    assert!(!drafted.title.is_empty());
    assert!(drafted.specific_tasks.len() <= 3);

    // Grind the skill to level 3: generated missions switch to Medium
    for i in 0..4 {
        let m = session
            .add_mission(skill_id, format!("grind {i}").as_str(), "", Difficulty::Medium, false)
            .unwrap();
        session.complete_mission_at(m.id, Utc::now(), day(1)).unwrap();
    }
    let skill = session.skills().iter().find(|s| s.id == skill_id).unwrap();
    assert!(skill.level >= 3);
    let expected_level = skill.level;
    let (mission, _, _) = session.generate_mission(skill_id).unwrap();
    assert_eq!(mission.difficulty, Difficulty::Medium);
    assert_eq!(mission.experience, 100 * (10 + u64::from(expected_level)) / 10);
}
