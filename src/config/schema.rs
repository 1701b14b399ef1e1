use std::fmt;

use serde::{Deserialize, Serialize};

pub const DEFAULT_MODEL: &str = "HuggingFaceH4/zephyr-7b-beta";
pub const DEFAULT_BASE_URL: &str = "https://router.huggingface.co/v1";
pub const DEFAULT_MAX_NEW_TOKENS: u32 = 256;
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,

    pub model: String,

    pub base_url: String,

    /// Cap on generated tokens per reply
    pub max_new_tokens: u32,

    pub timeout_seconds: u64,

    /// Turns retained per session; `None` keeps the whole conversation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_history_turns: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_token: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            max_new_tokens: DEFAULT_MAX_NEW_TOKENS,
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
            max_history_turns: None,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_token", &self.api_token.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("max_new_tokens", &self.max_new_tokens)
            .field("timeout_seconds", &self.timeout_seconds)
            .field("max_history_turns", &self.max_history_turns)
            .finish()
    }
}

/// Loggable view of the configuration; never carries the token itself.
#[derive(Debug, Clone, PartialEq)]
pub struct SafeConfigSummary {
    pub api_token_configured: bool,
    pub model: String,
    pub base_url: String,
    pub max_new_tokens: u32,
    pub timeout_seconds: u64,
    pub max_history_turns: Option<usize>,
}

impl Config {
    pub fn get_safe_summary(&self) -> SafeConfigSummary {
        SafeConfigSummary {
            api_token_configured: self.api_token.as_deref().is_some_and(|t| !t.is_empty()),
            model: self.model.clone(),
            base_url: self.base_url.clone(),
            max_new_tokens: self.max_new_tokens,
            timeout_seconds: self.timeout_seconds,
            max_history_turns: self.max_history_turns,
        }
    }
}
