//! Reset command: wipe the account back to a fresh install

use std::path::Path;

use anyhow::{bail, Result};

use crate::config::Config;
use crate::store::StoreDb;

/// Delete all skills, missions, and progress. Requires `--yes`.
pub async fn reset_command(data_dir: Option<&Path>, yes: bool) -> Result<()> {
    if !yes {
        bail!("this deletes every skill, mission, and streak - re-run with --yes to confirm");
    }

    let db = match data_dir {
        Some(dir) => StoreDb::open(&dir.join("questline.db"))?,
        None => StoreDb::open(&Config::global_config_dir().join("questline.db"))?,
    };
    db.reset_all()?;
    println!("Account reset. Everything starts at level 1 again.");
    Ok(())
}
