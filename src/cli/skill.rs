//! Skill commands: add, list, remove

use std::path::Path;

use anyhow::{bail, Result};

use super::{finish_session, open_session};

/// Create a new skill
pub async fn skill_add_command(
    data_dir: Option<&Path>,
    name: &str,
    color: Option<String>,
) -> Result<()> {
    let mut session = open_session(data_dir)?;
    let skill = session.create_skill(name, color)?;
    println!("Added skill '{}' (level 1, {} XP to level 2)", skill.name, skill.experience_to_next);
    finish_session(&mut session).await;
    Ok(())
}

/// List all skills
pub async fn skill_list_command(data_dir: Option<&Path>, json: bool) -> Result<()> {
    let session = open_session(data_dir)?;
    let skills = session.skills();

    if json {
        println!("{}", serde_json::to_string_pretty(skills)?);
        return Ok(());
    }

    if skills.is_empty() {
        println!("No skills yet.");
        println!();
        println!("Start with: questline skill add <name>");
        return Ok(());
    }

    for skill in skills {
        println!(
            "{:<20} level {:<3} {:>6} XP total, {:>5} to next",
            skill.name, skill.level, skill.total_experience, skill.experience_to_next
        );
    }
    Ok(())
}

/// Delete a skill, its missions, and its account XP contribution
pub async fn skill_remove_command(data_dir: Option<&Path>, name: &str) -> Result<()> {
    let mut session = open_session(data_dir)?;
    let Some(skill) = session.find_skill(name) else {
        bail!("no skill matching '{name}'");
    };
    let skill_id = skill.id;

    let summary = session.delete_skill(skill_id)?;
    println!(
        "Removed '{}' and {} mission(s)",
        summary.skill_name, summary.missions_removed
    );
    if summary.removal.reversed > 0 {
        println!(
            "Took back {} account XP (total level is now {})",
            summary.removal.reversed,
            session.progress().total_level
        );
    }
    if summary.removal.reset {
        println!("Last skill removed - account progress reset to level 1");
    }
    finish_session(&mut session).await;
    Ok(())
}
