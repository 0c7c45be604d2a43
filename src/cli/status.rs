//! Status command: the account at a glance

use std::path::Path;

use anyhow::Result;
use serde_json::json;

use crate::progression::experience_to_next_level;

use super::open_session;

/// Show account-wide progress, streaks, and every skill
pub async fn status_command(data_dir: Option<&Path>, json: bool) -> Result<()> {
    let session = open_session(data_dir)?;
    let progress = session.progress();
    let open_missions = session
        .missions(None)?
        .iter()
        .filter(|m| !m.is_completed)
        .count();

    if json {
        let value = json!({
            "progress": progress,
            "skills": session.skills(),
            "open_missions": open_missions,
            "sync": session.sync_status().label(),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!(
        "Total level {} ({} XP, {} to next)",
        progress.total_level,
        progress.total_experience,
        experience_to_next_level(progress.total_experience)
    );
    println!(
        "Missions completed: {}   Streak: {} day(s), best {}",
        progress.missions_completed, progress.current_streak, progress.longest_streak
    );
    println!("Open missions: {open_missions}   Sync: {}", session.sync_status().label());

    if session.skills().is_empty() {
        println!();
        println!("No skills yet. Start with: questline skill add <name>");
        return Ok(());
    }

    println!();
    for skill in session.skills() {
        let contributed = progress.contribution(skill.id);
        println!(
            "{:<20} level {:<3} {:>6} XP total, {:>5} to next{}",
            skill.name,
            skill.level,
            skill.total_experience,
            skill.experience_to_next,
            if contributed > 0 {
                format!("  (+{contributed} account XP)")
            } else {
                String::new()
            },
        );
    }
    Ok(())
}
