//! SQLite database connection and schema management
//!
//! Manages the `~/.questline/questline.db` database with automatic schema
//! migration.

use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use rusqlite::Connection;

use crate::config::Config;

/// Database wrapper shared by the store
#[derive(Clone)]
pub struct StoreDb {
    conn: Arc<Mutex<Connection>>,
}

impl StoreDb {
    /// Open or create the database at the default location
    /// (~/.questline/questline.db)
    pub fn open_default() -> Result<Self> {
        let db_path = Config::global_config_dir().join("questline.db");
        Self::open(&db_path)
    }

    /// Open or create the database at a specific path
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create data dir: {}", parent.display()))?;
        }

        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;

        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        // Mission rows cascade when their skill is deleted
        conn.pragma_update(None, "foreign_keys", "ON")?;

        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.init_schema()?;
        Ok(db)
    }

    /// Get a reference to the connection
    pub fn conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().expect("DB lock poisoned")
    }

    fn init_schema(&self) -> Result<()> {
        let conn = self.conn();
        conn.execute_batch(SCHEMA_SQL)?;
        drop(conn);
        self.run_migrations()?;
        Ok(())
    }

    /// Run any pending migrations
    fn run_migrations(&self) -> Result<()> {
        let conn = self.conn();

        let version: i32 = conn
            .query_row("SELECT COALESCE(MAX(version), 0) FROM schema_version", [], |r| r.get(0))
            .unwrap_or(0);

        // Migration 2: track recurring missions created before the column existed
        if version < 2 {
            let has_is_recurring: bool = conn
                .prepare("SELECT COUNT(*) FROM pragma_table_info('missions') WHERE name = 'is_recurring'")
                .and_then(|mut s| s.query_row([], |r| r.get::<_, i32>(0)))
                .map(|c| c > 0)
                .unwrap_or(false);

            if !has_is_recurring {
                conn.execute_batch(
                    "ALTER TABLE missions ADD COLUMN is_recurring INTEGER NOT NULL DEFAULT 0;",
                )?;
            }
            conn.execute("INSERT OR REPLACE INTO schema_version VALUES (2)", [])?;
        }

        Ok(())
    }

    /// Delete all account data (reset to a fresh install)
    pub fn reset_all(&self) -> Result<()> {
        let conn = self.conn();
        conn.execute_batch(
            r#"
            DELETE FROM missions;
            DELETE FROM skills;
            DELETE FROM level_up_contributions;
            UPDATE user_progress SET total_level = 1, total_experience = 0,
                missions_completed = 0, current_streak = 0, longest_streak = 0 WHERE id = 1;
            UPDATE streak_state SET last_activity_day = NULL WHERE id = 1;
            "#,
        )?;
        Ok(())
    }
}

/// SQL schema for the account database
const SCHEMA_SQL: &str = r#"
-- Tracked skills (one row per skill)
CREATE TABLE IF NOT EXISTS skills (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    color TEXT NOT NULL,
    level INTEGER NOT NULL DEFAULT 1,
    experience INTEGER NOT NULL DEFAULT 0,
    experience_to_next INTEGER NOT NULL DEFAULT 100,
    total_experience INTEGER NOT NULL DEFAULT 0,
    created_at INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_skill_name ON skills(name);

-- Missions (owned by a skill, cascade on skill deletion)
CREATE TABLE IF NOT EXISTS missions (
    id TEXT PRIMARY KEY,
    skill_id TEXT NOT NULL REFERENCES skills(id) ON DELETE CASCADE,
    title TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    difficulty TEXT NOT NULL,
    experience INTEGER NOT NULL,
    time_limit_minutes INTEGER NOT NULL,
    is_completed INTEGER NOT NULL DEFAULT 0,
    is_recurring INTEGER NOT NULL DEFAULT 0,
    created_at INTEGER NOT NULL,
    completed_at INTEGER
);
CREATE INDEX IF NOT EXISTS idx_mission_skill ON missions(skill_id);
CREATE INDEX IF NOT EXISTS idx_mission_open ON missions(is_completed);

-- Account progress (singleton row)
CREATE TABLE IF NOT EXISTS user_progress (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    total_level INTEGER NOT NULL DEFAULT 1,
    total_experience INTEGER NOT NULL DEFAULT 0,
    missions_completed INTEGER NOT NULL DEFAULT 0,
    current_streak INTEGER NOT NULL DEFAULT 0,
    longest_streak INTEGER NOT NULL DEFAULT 0
);
INSERT OR IGNORE INTO user_progress (id) VALUES (1);

-- Per-skill account XP ledger. Deliberately no foreign key: entries are
-- pruned by the engine on skill deletion, not cascaded by the database.
CREATE TABLE IF NOT EXISTS level_up_contributions (
    skill_id TEXT PRIMARY KEY,
    amount INTEGER NOT NULL DEFAULT 0
);

-- Last streak-counted day (singleton row, "YYYY-MM-DD" local date)
CREATE TABLE IF NOT EXISTS streak_state (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    last_activity_day TEXT
);
INSERT OR IGNORE INTO streak_state (id) VALUES (1);

-- Schema version
CREATE TABLE IF NOT EXISTS schema_version (version INTEGER PRIMARY KEY);
INSERT OR IGNORE INTO schema_version VALUES (2);
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_open_and_init() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test_questline.db");
        let db = StoreDb::open(&db_path).unwrap();

        let conn = db.conn();
        let mut stmt = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table'")
            .unwrap();
        let tables: Vec<String> = stmt
            .query_map([], |row| row.get(0))
            .unwrap()
            .filter_map(|r| r.ok())
            .collect();

        assert!(tables.contains(&"skills".to_string()));
        assert!(tables.contains(&"missions".to_string()));
        assert!(tables.contains(&"user_progress".to_string()));
        assert!(tables.contains(&"level_up_contributions".to_string()));
        assert!(tables.contains(&"streak_state".to_string()));
    }

    #[test]
    fn test_progress_singleton_seeded() {
        let dir = tempdir().unwrap();
        let db = StoreDb::open(&dir.path().join("t.db")).unwrap();
        let conn = db.conn();
        let level: i64 = conn
            .query_row("SELECT total_level FROM user_progress WHERE id = 1", [], |r| r.get(0))
            .unwrap();
        assert_eq!(level, 1);
    }
}
