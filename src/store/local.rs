//! Local SQLite store - the session's source of truth

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::params;
use uuid::Uuid;

use crate::domain::{Difficulty, Mission, Skill, UserProgress};

use super::db::StoreDb;
use super::ProgressStore;

/// [`ProgressStore`] backed by the account SQLite database
#[derive(Clone)]
pub struct SqliteStore {
    db: StoreDb,
}

/// Raw row shapes read inside the rusqlite closures; converted to domain
/// types (uuid/timestamp parsing) outside so failures get proper context.
type SkillRow = (String, String, String, i64, i64, i64, i64, i64);
type MissionRow = (
    String,
    String,
    String,
    String,
    String,
    i64,
    i64,
    bool,
    bool,
    i64,
    Option<i64>,
);

impl SqliteStore {
    pub fn new(db: StoreDb) -> Self {
        Self { db }
    }

    pub fn open_default() -> Result<Self> {
        Ok(Self::new(StoreDb::open_default()?))
    }

    pub fn open(path: &std::path::Path) -> Result<Self> {
        Ok(Self::new(StoreDb::open(path)?))
    }

    fn skill_from_row(row: SkillRow) -> Result<Skill> {
        let (id, name, color, level, experience, experience_to_next, total_experience, created_at) =
            row;
        Ok(Skill {
            id: Uuid::parse_str(&id).with_context(|| format!("bad skill id: {id}"))?,
            name,
            color,
            level: level as u32,
            experience: experience as u64,
            experience_to_next: experience_to_next as u64,
            total_experience: total_experience as u64,
            created_at: timestamp(created_at),
        })
    }

    fn mission_from_row(row: MissionRow) -> Result<Mission> {
        let (
            id,
            skill_id,
            title,
            description,
            difficulty,
            experience,
            time_limit_minutes,
            is_completed,
            is_recurring,
            created_at,
            completed_at,
        ) = row;
        Ok(Mission {
            id: Uuid::parse_str(&id).with_context(|| format!("bad mission id: {id}"))?,
            skill_id: Uuid::parse_str(&skill_id)
                .with_context(|| format!("bad skill id on mission: {skill_id}"))?,
            title,
            description,
            difficulty: Difficulty::from_str(&difficulty)
                .with_context(|| format!("unknown difficulty: {difficulty}"))?,
            experience: experience as u64,
            time_limit_minutes: time_limit_minutes as u32,
            is_completed,
            is_recurring,
            created_at: timestamp(created_at),
            completed_at: completed_at.map(timestamp),
        })
    }
}

const MISSION_COLUMNS: &str = "id, skill_id, title, description, difficulty, experience, \
     time_limit_minutes, is_completed, is_recurring, created_at, completed_at";

impl ProgressStore for SqliteStore {
    fn load_progress(&self) -> Result<Option<UserProgress>> {
        let conn = self.db.conn();
        let row: Option<(i64, i64, i64, i64, i64)> = conn
            .query_row(
                "SELECT total_level, total_experience, missions_completed,
                        current_streak, longest_streak
                 FROM user_progress WHERE id = 1",
                [],
                |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?, r.get(4)?)),
            )
            .map(Some)
            .or_else(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => Ok(None),
                other => Err(other),
            })?;

        let Some((total_level, total_experience, missions_completed, current, longest)) = row
        else {
            return Ok(None);
        };

        let mut progress = UserProgress {
            total_level: total_level as u32,
            total_experience: total_experience as u64,
            missions_completed: missions_completed as u64,
            current_streak: current as u32,
            longest_streak: longest as u32,
            ..Default::default()
        };

        let mut stmt = conn.prepare("SELECT skill_id, amount FROM level_up_contributions")?;
        let entries: Vec<(String, i64)> = stmt
            .query_map([], |r| Ok((r.get(0)?, r.get(1)?)))?
            .collect::<rusqlite::Result<_>>()?;
        for (skill_id, amount) in entries {
            let id = Uuid::parse_str(&skill_id)
                .with_context(|| format!("bad skill id in ledger: {skill_id}"))?;
            progress.level_up_contributions.insert(id, amount as u64);
        }

        Ok(Some(progress))
    }

    fn save_progress(&self, progress: &UserProgress) -> Result<()> {
        let mut conn = self.db.conn();
        // Singleton row and ledger move together
        let tx = conn.transaction()?;
        tx.execute(
            "UPDATE user_progress SET total_level = ?1, total_experience = ?2,
                 missions_completed = ?3, current_streak = ?4, longest_streak = ?5
             WHERE id = 1",
            params![
                progress.total_level as i64,
                progress.total_experience as i64,
                progress.missions_completed as i64,
                progress.current_streak as i64,
                progress.longest_streak as i64,
            ],
        )?;
        tx.execute("DELETE FROM level_up_contributions", [])?;
        for (skill_id, amount) in &progress.level_up_contributions {
            tx.execute(
                "INSERT INTO level_up_contributions (skill_id, amount) VALUES (?1, ?2)",
                params![skill_id.to_string(), *amount as i64],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    fn load_skills(&self) -> Result<Vec<Skill>> {
        let conn = self.db.conn();
        let mut stmt = conn.prepare(
            "SELECT id, name, color, level, experience, experience_to_next,
                    total_experience, created_at
             FROM skills ORDER BY created_at",
        )?;
        let rows: Vec<SkillRow> = stmt
            .query_map([], |r| {
                Ok((
                    r.get(0)?,
                    r.get(1)?,
                    r.get(2)?,
                    r.get(3)?,
                    r.get(4)?,
                    r.get(5)?,
                    r.get(6)?,
                    r.get(7)?,
                ))
            })?
            .collect::<rusqlite::Result<_>>()?;
        rows.into_iter().map(Self::skill_from_row).collect()
    }

    fn create_skill(&self, skill: &Skill) -> Result<()> {
        let conn = self.db.conn();
        conn.execute(
            "INSERT INTO skills (id, name, color, level, experience, experience_to_next,
                                 total_experience, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                skill.id.to_string(),
                skill.name,
                skill.color,
                skill.level as i64,
                skill.experience as i64,
                skill.experience_to_next as i64,
                skill.total_experience as i64,
                skill.created_at.timestamp_millis(),
            ],
        )?;
        Ok(())
    }

    fn update_skill(&self, skill: &Skill) -> Result<()> {
        let conn = self.db.conn();
        conn.execute(
            "UPDATE skills SET name = ?2, color = ?3, level = ?4, experience = ?5,
                 experience_to_next = ?6, total_experience = ?7
             WHERE id = ?1",
            params![
                skill.id.to_string(),
                skill.name,
                skill.color,
                skill.level as i64,
                skill.experience as i64,
                skill.experience_to_next as i64,
                skill.total_experience as i64,
            ],
        )?;
        Ok(())
    }

    fn delete_skill(&self, skill_id: Uuid) -> Result<()> {
        let conn = self.db.conn();
        // Missions cascade via the foreign key
        conn.execute("DELETE FROM skills WHERE id = ?1", params![skill_id.to_string()])?;
        Ok(())
    }

    fn load_missions(&self, skill_id: Option<Uuid>) -> Result<Vec<Mission>> {
        let conn = self.db.conn();
        let sql_all = format!("SELECT {MISSION_COLUMNS} FROM missions ORDER BY created_at");
        let sql_one = format!(
            "SELECT {MISSION_COLUMNS} FROM missions WHERE skill_id = ?1 ORDER BY created_at"
        );

        let map_row = |r: &rusqlite::Row<'_>| -> rusqlite::Result<MissionRow> {
            Ok((
                r.get(0)?,
                r.get(1)?,
                r.get(2)?,
                r.get(3)?,
                r.get(4)?,
                r.get(5)?,
                r.get(6)?,
                r.get(7)?,
                r.get(8)?,
                r.get(9)?,
                r.get(10)?,
            ))
        };

        let rows: Vec<MissionRow> = match skill_id {
            Some(id) => {
                let mut stmt = conn.prepare(&sql_one)?;
                let rows = stmt
                    .query_map(params![id.to_string()], map_row)?
                    .collect::<rusqlite::Result<_>>()?;
                rows
            }
            None => {
                let mut stmt = conn.prepare(&sql_all)?;
                let rows = stmt.query_map([], map_row)?.collect::<rusqlite::Result<_>>()?;
                rows
            }
        };
        rows.into_iter().map(Self::mission_from_row).collect()
    }

    fn get_mission(&self, mission_id: Uuid) -> Result<Option<Mission>> {
        let conn = self.db.conn();
        let sql = format!("SELECT {MISSION_COLUMNS} FROM missions WHERE id = ?1");
        let row: Option<MissionRow> = conn
            .query_row(&sql, params![mission_id.to_string()], |r| {
                Ok((
                    r.get(0)?,
                    r.get(1)?,
                    r.get(2)?,
                    r.get(3)?,
                    r.get(4)?,
                    r.get(5)?,
                    r.get(6)?,
                    r.get(7)?,
                    r.get(8)?,
                    r.get(9)?,
                    r.get(10)?,
                ))
            })
            .map(Some)
            .or_else(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => Ok(None),
                other => Err(other),
            })?;
        row.map(Self::mission_from_row).transpose()
    }

    fn create_mission(&self, mission: &Mission) -> Result<()> {
        let conn = self.db.conn();
        conn.execute(
            &format!("INSERT INTO missions ({MISSION_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)"),
            params![
                mission.id.to_string(),
                mission.skill_id.to_string(),
                mission.title,
                mission.description,
                mission.difficulty.as_str(),
                mission.experience as i64,
                mission.time_limit_minutes as i64,
                mission.is_completed,
                mission.is_recurring,
                mission.created_at.timestamp_millis(),
                mission.completed_at.map(|t| t.timestamp_millis()),
            ],
        )?;
        Ok(())
    }

    fn save_mission(&self, mission: &Mission) -> Result<()> {
        let conn = self.db.conn();
        conn.execute(
            "UPDATE missions SET title = ?2, description = ?3, difficulty = ?4,
                 experience = ?5, time_limit_minutes = ?6, is_completed = ?7,
                 is_recurring = ?8, completed_at = ?9
             WHERE id = ?1",
            params![
                mission.id.to_string(),
                mission.title,
                mission.description,
                mission.difficulty.as_str(),
                mission.experience as i64,
                mission.time_limit_minutes as i64,
                mission.is_completed,
                mission.is_recurring,
                mission.completed_at.map(|t| t.timestamp_millis()),
            ],
        )?;
        Ok(())
    }

    fn load_last_streak_date(&self) -> Result<Option<NaiveDate>> {
        let conn = self.db.conn();
        let day: Option<String> = conn.query_row(
            "SELECT last_activity_day FROM streak_state WHERE id = 1",
            [],
            |r| r.get(0),
        )?;
        match day {
            Some(d) => Ok(Some(
                NaiveDate::parse_from_str(&d, "%Y-%m-%d")
                    .with_context(|| format!("bad streak date in store: {d}"))?,
            )),
            None => Ok(None),
        }
    }

    fn save_last_streak_date(&self, date: NaiveDate) -> Result<()> {
        let conn = self.db.conn();
        conn.execute(
            "UPDATE streak_state SET last_activity_day = ?1 WHERE id = 1",
            params![date.format("%Y-%m-%d").to_string()],
        )?;
        Ok(())
    }
}

/// Millisecond timestamp to `DateTime<Utc>`, clamping garbage to now
fn timestamp(ms: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ms).unwrap_or_else(Utc::now)
}
