//! Remote sync port - optimistic, fire-and-forget
//!
//! Local state is committed first and never waits for the remote copy.
//! Pushes ship the whole account snapshot; a failed push leaves the gap
//! visible in [`SyncStatus`] until a later push succeeds. There is no retry
//! queue; the next mutation simply pushes a fresher snapshot.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Serialize;

use crate::config::SyncConfig;
use crate::domain::{Mission, Skill, UserProgress};

/// Where the local and remote copies stand relative to each other
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncStatus {
    /// No remote endpoint configured
    #[default]
    Disabled,
    /// A push is in flight
    Pending,
    /// Last push succeeded
    InSync,
    /// Last push failed; local state is ahead of the remote copy
    Failed,
}

impl SyncStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Disabled => "local only",
            Self::Pending => "sync pending",
            Self::InSync => "in sync",
            Self::Failed => "sync failed (local ahead)",
        }
    }
}

/// Serialized account state shipped to the remote store
#[derive(Debug, Clone, Serialize)]
pub struct AccountSnapshot {
    pub progress: UserProgress,
    pub skills: Vec<Skill>,
    pub missions: Vec<Mission>,
    pub last_streak_date: Option<NaiveDate>,
}

/// Client for the remote account endpoint
#[derive(Clone)]
pub struct RemoteSync {
    endpoint: String,
    token: String,
}

impl RemoteSync {
    /// Build from config; `None` when sync is not configured
    pub fn from_config(config: &SyncConfig) -> Option<Self> {
        let endpoint = config.endpoint.clone()?;
        let token = config.token.clone()?;
        Some(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            token,
        })
    }

    /// Push the snapshot. Blocking; callers run this off the main task and
    /// treat failure as diagnostics, never as a rollback.
    pub fn push_snapshot(&self, snapshot: &AccountSnapshot) -> Result<()> {
        let url = format!("{}/account/snapshot", self.endpoint);
        ureq::put(&url)
            .set("Authorization", &format!("Bearer {}", self.token))
            .send_json(serde_json::to_value(snapshot)?)
            .context("Failed to push account snapshot")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SyncConfig;

    #[test]
    fn test_unconfigured_sync_is_disabled() {
        assert!(RemoteSync::from_config(&SyncConfig::default()).is_none());
        let partial = SyncConfig {
            endpoint: Some("https://example.com/api".into()),
            token: None,
        };
        assert!(RemoteSync::from_config(&partial).is_none());
    }

    #[test]
    fn test_endpoint_trailing_slash_trimmed() {
        let config = SyncConfig {
            endpoint: Some("https://example.com/api/".into()),
            token: Some("secret".into()),
        };
        let sync = RemoteSync::from_config(&config).unwrap();
        assert_eq!(sync.endpoint, "https://example.com/api");
    }

    #[test]
    fn test_snapshot_serializes() {
        let snapshot = AccountSnapshot {
            progress: UserProgress::default(),
            skills: vec![Skill::new("Guitar", "#e76f51")],
            missions: vec![],
            last_streak_date: None,
        };
        let value = serde_json::to_value(&snapshot).unwrap();
        assert!(value.get("progress").is_some());
        assert_eq!(value["skills"].as_array().unwrap().len(), 1);
    }
}
