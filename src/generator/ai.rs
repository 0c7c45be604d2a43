//! AI text generation client
//!
//! Talks to an OpenAI-compatible chat-completions endpoint with a bearer
//! credential. The model is asked for strict JSON matching the generation
//! contract; anything that does not parse is an error the caller turns
//! into a template fallback.

use serde_json::json;

use crate::config::AiConfig;
use crate::domain::{Difficulty, Mission, Skill, UserProgress};

use super::{GeneratedChallenge, GeneratedMission};

/// Error type for AI text generation
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("request failed: {0}")]
    Http(Box<ureq::Error>),

    #[error("failed to read response: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed model response: {0}")]
    Malformed(String),
}

impl From<ureq::Error> for GenerateError {
    fn from(e: ureq::Error) -> Self {
        Self::Http(Box::new(e))
    }
}

/// Thin client over the chat-completions endpoint
pub struct AiClient {
    base_url: String,
    api_key: String,
    model: String,
}

impl AiClient {
    /// Build from config; `None` when no credential is present
    pub fn from_config(config: &AiConfig) -> Option<Self> {
        let api_key = config.resolve_api_key()?;
        Some(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            model: config.model.clone(),
        })
    }

    /// Ask the model for mission copy
    pub fn draft_mission(
        &self,
        skill: &Skill,
        progress: &UserProgress,
        recent: &[Mission],
        difficulty: Difficulty,
    ) -> Result<GeneratedMission, GenerateError> {
        let recent_titles: Vec<&str> = recent.iter().map(|m| m.title.as_str()).collect();
        let prompt = format!(
            "Draft one {} mission for the skill \"{}\" (skill level {}, account level {}, \
             {}-day streak). Avoid repeating these recent missions: {}. \
             Respond with JSON only: {{\"title\": string, \"description\": string, \
             \"specific_tasks\": [up to 3 strings], \"personalized_tips\": [up to 2 strings], \
             \"resources\": [up to 3 strings], \"is_recurring\": bool}}",
            difficulty.label(),
            skill.name,
            skill.level,
            progress.total_level,
            progress.current_streak,
            if recent_titles.is_empty() {
                "none".to_string()
            } else {
                recent_titles.join("; ")
            },
        );
        self.request(&prompt)
    }

    /// Ask the model for challenge copy
    pub fn draft_challenge(
        &self,
        skill: &Skill,
        progress: &UserProgress,
        duration_days: u32,
    ) -> Result<GeneratedChallenge, GenerateError> {
        let prompt = format!(
            "Draft one {}-day challenge for the skill \"{}\" (skill level {}, account level {}). \
             Respond with JSON only: {{\"title\": string, \"description\": string, \
             \"duration_days\": {}}}",
            duration_days, skill.name, skill.level, progress.total_level, duration_days,
        );
        self.request(&prompt)
    }

    /// POST the prompt and parse the model's JSON answer into `T`
    fn request<T: serde::de::DeserializeOwned>(&self, prompt: &str) -> Result<T, GenerateError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = json!({
            "model": self.model,
            "messages": [
                {
                    "role": "system",
                    "content": "You write short, encouraging self-improvement tasks. \
                                Always answer with a single JSON object and nothing else."
                },
                { "role": "user", "content": prompt }
            ],
            "temperature": 0.8,
        });

        let response: serde_json::Value = ureq::post(&url)
            .set("Authorization", &format!("Bearer {}", self.api_key))
            .send_json(body)?
            .into_json()?;

        let content = response
            .pointer("/choices/0/message/content")
            .and_then(|v| v.as_str())
            .ok_or_else(|| GenerateError::Malformed("no message content in response".into()))?;

        serde_json::from_str(strip_code_fence(content))
            .map_err(|e| GenerateError::Malformed(format!("content is not contract JSON: {e}")))
    }
}

/// Models sometimes wrap JSON in a markdown fence despite instructions
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AiConfig;

    #[test]
    fn test_no_credential_means_no_client() {
        let config = AiConfig {
            api_key: None,
            ..Default::default()
        };
        assert!(AiClient::from_config(&config).is_none());
    }

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(strip_code_fence("{\"a\":1}"), "{\"a\":1}");
        assert_eq!(strip_code_fence("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fence("```\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fence("  {\"a\":1}  "), "{\"a\":1}");
    }

    #[test]
    fn test_generated_mission_parses_from_contract_json() {
        let raw = r#"{
            "title": "Master barre chords",
            "description": "Work through the F shape cleanly.",
            "specific_tasks": ["Warm up", "Drill transitions", "Record yourself"],
            "personalized_tips": ["Keep your thumb low"],
            "resources": ["justinguitar.com"],
            "is_recurring": true
        }"#;
        let drafted: GeneratedMission = serde_json::from_str(raw).unwrap();
        assert_eq!(drafted.title, "Master barre chords");
        assert!(drafted.is_recurring);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let raw = r#"{"title": "t", "description": "d"}"#;
        let drafted: GeneratedMission = serde_json::from_str(raw).unwrap();
        assert!(drafted.specific_tasks.is_empty());
        assert!(!drafted.is_recurring);
    }
}
