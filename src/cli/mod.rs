//! CLI command implementations

pub mod challenge;
pub mod init;
pub mod mission;
pub mod reset;
pub mod skill;
pub mod status;

use std::path::Path;

use anyhow::Result;

use crate::config::Config;
use crate::generator::MissionGenerator;
use crate::session::Session;
use crate::store::{RemoteSync, SqliteStore, SyncStatus};

/// Open the account session every command runs against.
///
/// `data_dir` overrides the default `~/.questline` location (used by tests
/// and by people keeping their account in a synced folder).
pub(crate) fn open_session(data_dir: Option<&Path>) -> Result<Session<SqliteStore>> {
    let config = Config::load()?;
    let store = match data_dir {
        Some(dir) => SqliteStore::open(&dir.join("questline.db"))?,
        None => SqliteStore::open_default()?,
    };
    let remote = RemoteSync::from_config(&config.sync);
    let generator = MissionGenerator::from_config(&config.ai);
    Session::open(store, remote, generator)
}

/// Await pending remote pushes and tell the user if the remote copy lags
pub(crate) async fn finish_session(session: &mut Session<SqliteStore>) {
    if session.finish().await == SyncStatus::Failed {
        eprintln!("warning: remote sync failed, your local data is saved but the remote copy is behind");
    }
}
