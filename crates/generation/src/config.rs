use serde::{Deserialize, Serialize};

/// Connection and sampling settings for the chat-completion service.
///
/// The sampling defaults are the production values the counselor answers are
/// tuned against: low temperature for consistency, a mild frequency penalty
/// against repetition, top_p pinned so the policy prompt dominates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerationConfig {
    /// Service API key.
    pub api_key: String,
    /// API base, e.g. `https://api.openai.com/v1`.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Chat model identifier.
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_frequency_penalty")]
    pub frequency_penalty: f32,
    #[serde(default)]
    pub presence_penalty: f32,
    #[serde(default)]
    pub top_p: f32,
    /// Overall request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            frequency_penalty: default_frequency_penalty(),
            presence_penalty: 0.0,
            top_p: 0.0,
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4o".to_string()
}

fn default_temperature() -> f32 {
    0.1
}

fn default_max_tokens() -> u32 {
    1500
}

fn default_frequency_penalty() -> f32 {
    0.25
}

fn default_timeout_secs() -> u64 {
    60
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_sampling_parameters() {
        let cfg = GenerationConfig::default();
        assert_eq!(cfg.model, "gpt-4o");
        assert!((cfg.temperature - 0.1).abs() < f32::EPSILON);
        assert_eq!(cfg.max_tokens, 1500);
        assert!((cfg.frequency_penalty - 0.25).abs() < f32::EPSILON);
        assert_eq!(cfg.presence_penalty, 0.0);
        assert_eq!(cfg.top_p, 0.0);
    }

    #[test]
    fn partial_json_uses_defaults() {
        let cfg: GenerationConfig = serde_json::from_str(r#"{"api_key": "sk-test"}"#).unwrap();
        assert_eq!(cfg.api_key, "sk-test");
        assert_eq!(cfg.base_url, "https://api.openai.com/v1");
        assert_eq!(cfg.max_tokens, 1500);
    }
}
