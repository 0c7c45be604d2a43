//! Challenge commands: suggest a time-boxed challenge for a skill

use std::path::Path;

use anyhow::{bail, Result};

use crate::generator::TextSource;

use super::open_session;

/// Draft a time-boxed challenge. Suggestion only - joining a challenge is a
/// community feature that lives on the remote side.
pub async fn challenge_suggest_command(
    data_dir: Option<&Path>,
    skill_name: &str,
    days: u32,
) -> Result<()> {
    if days == 0 {
        bail!("a challenge needs at least one day");
    }

    let session = open_session(data_dir)?;
    let Some(skill) = session.find_skill(skill_name) else {
        bail!("no skill matching '{skill_name}'");
    };

    let generator = session.generator();
    let (challenge, source) = generator.generate_challenge(skill, session.progress(), days);
    println!(
        "{}{}",
        challenge.title,
        if source == TextSource::Template { " [template]" } else { "" },
    );
    println!("  {}", challenge.description);
    println!("  Duration: {} day(s)", challenge.duration_days);
    Ok(())
}
