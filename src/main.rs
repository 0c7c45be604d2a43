use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use questline::cli;

#[derive(Parser)]
#[command(name = "questline")]
#[command(about = "Track skills, complete missions, keep your streak alive")]
#[command(version)]
struct Cli {
    /// Path to the data directory (defaults to ~/.questline)
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the global configuration file
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Manage skills
    Skill {
        #[command(subcommand)]
        command: SkillCommands,
    },

    /// Manage missions
    Mission {
        #[command(subcommand)]
        command: MissionCommands,
    },

    /// Time-boxed challenges
    Challenge {
        #[command(subcommand)]
        command: ChallengeCommands,
    },

    /// Show account progress, streaks, and skills
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Wipe the account back to a fresh install
    Reset {
        /// Confirm the wipe
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum SkillCommands {
    /// Track a new skill
    Add {
        name: String,
        /// Display color (hex), picked automatically when omitted
        #[arg(long)]
        color: Option<String>,
    },
    /// List tracked skills
    List {
        #[arg(long)]
        json: bool,
    },
    /// Delete a skill, its missions, and its account XP contribution
    Remove { name: String },
}

#[derive(Subcommand)]
enum MissionCommands {
    /// Add a hand-written mission
    Add {
        /// Skill the mission belongs to
        #[arg(long)]
        skill: String,
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        /// easy, medium, hard, or expert
        #[arg(long, default_value = "easy")]
        difficulty: String,
        /// Mark the mission as repeatable
        #[arg(long)]
        recurring: bool,
    },
    /// Draft a mission with AI (or templates) and add it
    Generate {
        #[arg(long)]
        skill: String,
    },
    /// Complete a mission by id (or unique id prefix)
    Complete { id: String },
    /// List missions
    List {
        /// Only this skill's missions
        #[arg(long)]
        skill: Option<String>,
        /// Include completed missions
        #[arg(long)]
        all: bool,
    },
}

#[derive(Subcommand)]
enum ChallengeCommands {
    /// Draft a time-boxed challenge for a skill
    Suggest {
        #[arg(long)]
        skill: String,
        /// Challenge length in days
        #[arg(long, default_value_t = 7)]
        days: u32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    let data_dir = cli.data_dir.as_deref();

    match cli.command {
        Commands::Init { force } => {
            cli::init::init_command(force).await?;
        }
        Commands::Skill { command } => match command {
            SkillCommands::Add { name, color } => {
                cli::skill::skill_add_command(data_dir, &name, color).await?;
            }
            SkillCommands::List { json } => {
                cli::skill::skill_list_command(data_dir, json).await?;
            }
            SkillCommands::Remove { name } => {
                cli::skill::skill_remove_command(data_dir, &name).await?;
            }
        },
        Commands::Mission { command } => match command {
            MissionCommands::Add {
                skill,
                title,
                description,
                difficulty,
                recurring,
            } => {
                cli::mission::mission_add_command(
                    data_dir,
                    &skill,
                    &title,
                    &description,
                    &difficulty,
                    recurring,
                )
                .await?;
            }
            MissionCommands::Generate { skill } => {
                cli::mission::mission_generate_command(data_dir, &skill).await?;
            }
            MissionCommands::Complete { id } => {
                cli::mission::mission_complete_command(data_dir, &id).await?;
            }
            MissionCommands::List { skill, all } => {
                cli::mission::mission_list_command(data_dir, skill.as_deref(), all).await?;
            }
        },
        Commands::Challenge { command } => match command {
            ChallengeCommands::Suggest { skill, days } => {
                cli::challenge::challenge_suggest_command(data_dir, &skill, days).await?;
            }
        },
        Commands::Status { json } => {
            cli::status::status_command(data_dir, json).await?;
        }
        Commands::Reset { yes } => {
            cli::reset::reset_command(data_dir, yes).await?;
        }
    }

    Ok(())
}
