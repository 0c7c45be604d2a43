//! Mission commands: add, generate, complete, list

use std::path::Path;

use anyhow::{bail, Result};
use uuid::Uuid;

use crate::domain::{Difficulty, Mission};
use crate::generator::TextSource;
use crate::session::CompleteOutcome;
use crate::store::SqliteStore;

use super::{finish_session, open_session};

/// Create a hand-written mission for a skill
pub async fn mission_add_command(
    data_dir: Option<&Path>,
    skill_name: &str,
    title: &str,
    description: &str,
    difficulty: &str,
    recurring: bool,
) -> Result<()> {
    let Some(difficulty) = Difficulty::from_str(&difficulty.to_lowercase()) else {
        bail!("unknown difficulty '{difficulty}' (easy, medium, hard, expert)");
    };

    let mut session = open_session(data_dir)?;
    let Some(skill) = session.find_skill(skill_name) else {
        bail!("no skill matching '{skill_name}'");
    };
    let skill_id = skill.id;

    let mission = session.add_mission(skill_id, title, description, difficulty, recurring)?;
    println!(
        "Added {} mission '{}' worth {} XP ({} min)",
        mission.difficulty.label(),
        mission.title,
        mission.experience,
        mission.time_limit_minutes
    );
    println!("Complete it with: questline mission complete {}", short_id(&mission));
    finish_session(&mut session).await;
    Ok(())
}

/// Draft a mission with the text generator and create it
pub async fn mission_generate_command(data_dir: Option<&Path>, skill_name: &str) -> Result<()> {
    let mut session = open_session(data_dir)?;
    let Some(skill) = session.find_skill(skill_name) else {
        bail!("no skill matching '{skill_name}'");
    };
    let skill_id = skill.id;

    let (mission, drafted, source) = session.generate_mission(skill_id)?;
    println!(
        "{} mission '{}' worth {} XP ({} min){}",
        mission.difficulty.label(),
        mission.title,
        mission.experience,
        mission.time_limit_minutes,
        if source == TextSource::Template { " [template]" } else { "" },
    );
    if !mission.description.is_empty() {
        println!("  {}", mission.description);
    }
    for task in &drafted.specific_tasks {
        println!("  - {task}");
    }
    for tip in &drafted.personalized_tips {
        println!("  tip: {tip}");
    }
    for resource in &drafted.resources {
        println!("  see: {resource}");
    }
    println!("Complete it with: questline mission complete {}", short_id(&mission));
    finish_session(&mut session).await;
    Ok(())
}

/// Complete a mission (by id or unique id prefix)
pub async fn mission_complete_command(data_dir: Option<&Path>, id: &str) -> Result<()> {
    let mut session = open_session(data_dir)?;
    let mission_id = resolve_mission_id(&session, id)?;

    match session.complete_mission(mission_id)? {
        CompleteOutcome::Applied(outcome) => {
            println!(
                "Completed '{}' (+{} XP to {})",
                outcome.mission.title, outcome.mission.experience, outcome.skill.name
            );
            if outcome.skill_leveled_up {
                println!(
                    "  {} reached level {}! +50 account XP",
                    outcome.skill.name, outcome.skill.level
                );
            }
            if outcome.account_leveled_up {
                println!("  Total level is now {}", outcome.progress.total_level);
            }
            println!(
                "  Streak: {} day(s) (best {})",
                outcome.progress.current_streak, outcome.progress.longest_streak
            );
        }
        CompleteOutcome::AlreadyCompleted => {
            println!("Already completed - nothing to do");
        }
        CompleteOutcome::MissionMissing | CompleteOutcome::SkillMissing => {
            println!("Mission is gone - nothing to do");
        }
    }
    finish_session(&mut session).await;
    Ok(())
}

/// List missions, newest last
pub async fn mission_list_command(
    data_dir: Option<&Path>,
    skill_name: Option<&str>,
    show_completed: bool,
) -> Result<()> {
    let session = open_session(data_dir)?;
    let skill_id = match skill_name {
        Some(name) => match session.find_skill(name) {
            Some(skill) => Some(skill.id),
            None => bail!("no skill matching '{name}'"),
        },
        None => None,
    };

    let missions = session.missions(skill_id)?;
    let visible: Vec<&Mission> = missions
        .iter()
        .filter(|m| show_completed || !m.is_completed)
        .collect();

    if visible.is_empty() {
        println!("No open missions. Generate one with: questline mission generate --skill <name>");
        return Ok(());
    }

    for mission in visible {
        let skill_name = session
            .skills()
            .iter()
            .find(|s| s.id == mission.skill_id)
            .map(|s| s.name.as_str())
            .unwrap_or("?");
        println!(
            "{} {} [{}] {} ({} XP, {} min){}",
            short_id(mission),
            if mission.is_completed { "x" } else { "o" },
            skill_name,
            mission.title,
            mission.experience,
            mission.time_limit_minutes,
            if mission.is_recurring { " (recurring)" } else { "" },
        );
    }
    Ok(())
}

/// First 8 hex chars of the mission id, enough to address it from the CLI
fn short_id(mission: &Mission) -> String {
    mission.id.to_string()[..8].to_string()
}

/// Resolve a full or prefix mission id, rejecting ambiguity
fn resolve_mission_id(session: &crate::session::Session<SqliteStore>, id: &str) -> Result<Uuid> {
    if let Ok(full) = Uuid::parse_str(id) {
        return Ok(full);
    }
    let prefix = id.to_lowercase();
    let missions = session.missions(None)?;
    let matches: Vec<&Mission> = missions
        .iter()
        .filter(|m| m.id.to_string().starts_with(&prefix))
        .collect();
    match matches.len() {
        0 => bail!("no mission with id '{id}'"),
        1 => Ok(matches[0].id),
        n => bail!("'{id}' is ambiguous ({n} missions match), use more characters"),
    }
}
