//! Init command implementation

use anyhow::{bail, Result};
use tracing::info;

use crate::config::Config;

/// Default configuration content for questline init
pub const DEFAULT_CONFIG: &str = r#"# Questline Configuration
# =======================
#
# Both sections are optional. Without an AI key, mission text comes from
# built-in templates. Without a sync endpoint, your account stays local.

# ============================================================================
# AI - mission and challenge text generation
# ============================================================================
#
# Available options:
#   api_key  - Bearer credential for an OpenAI-compatible endpoint.
#              Can also be set via the QUESTLINE_AI_API_KEY environment
#              variable. Leave empty to use template text.
#   base_url - API root (default: https://api.openai.com/v1)
#   model    - Model name (default: gpt-4o-mini)

[ai]
api_key = ""
# base_url = "https://api.openai.com/v1"
# model = "gpt-4o-mini"

# ============================================================================
# SYNC - optional remote account copy
# ============================================================================
#
# Pushes are fire-and-forget: your local database is always written first
# and stays authoritative if the remote copy is unreachable.
#
# Available options:
#   endpoint - Account endpoint root (e.g. https://example.com/api)
#   token    - Bearer token for the endpoint

# [sync]
# endpoint = ""
# token = ""
"#;

/// Write the default config file to ~/.questline/config.toml
pub async fn init_command(force: bool) -> Result<()> {
    let config_dir = Config::global_config_dir();
    let config_path = Config::global_config_path();

    if config_path.exists() && !force {
        bail!(
            "config already exists at {} (use --force to overwrite)",
            config_path.display()
        );
    }

    std::fs::create_dir_all(&config_dir)?;
    std::fs::write(&config_path, DEFAULT_CONFIG)?;

    info!("wrote default config");
    println!("Created {}", config_path.display());
    println!();
    println!("Next steps:");
    println!("  questline skill add <name>        track your first skill");
    println!("  questline mission generate --skill <name>");
    Ok(())
}
