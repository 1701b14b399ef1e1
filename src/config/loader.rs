use crate::config::schema::Config;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

pub const ENV_API_TOKEN: &str = "HUGGINGFACE_API_TOKEN";
pub const ENV_API_TOKEN_FALLBACK: &str = "HF_TOKEN";
pub const ENV_MODEL: &str = "SOCCERFAN_MODEL";
pub const ENV_BASE_URL: &str = "SOCCERFAN_BASE_URL";
pub const ENV_MAX_NEW_TOKENS: &str = "SOCCERFAN_MAX_NEW_TOKENS";
pub const ENV_TIMEOUT_SECS: &str = "SOCCERFAN_TIMEOUT_SECS";
pub const ENV_MAX_HISTORY: &str = "SOCCERFAN_MAX_HISTORY";

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{key} must be a number, got '{value}'")]
    InvalidNumber { key: String, value: String },

    #[error("{key} must be greater than zero")]
    Zero { key: String },
}

/// Values given on the command line; they win over everything else.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub model: Option<String>,
    pub max_history: Option<usize>,
}

/// Loads a `.env` file from the working directory or one of its parents.
///
/// Variables already present in the process environment are left as they
/// are. A missing file is normal; an unreadable one is logged and skipped.
pub fn load_dotenv() -> Option<PathBuf> {
    match dotenvy::dotenv() {
        Ok(path) => {
            tracing::debug!(path = %path.display(), "Loaded .env file");
            Some(path)
        }
        Err(e) if e.not_found() => None,
        Err(e) => {
            tracing::warn!(error = %e, "Ignoring unreadable .env file");
            None
        }
    }
}

/// Builds the configuration: defaults, then environment, then CLI flags.
///
/// Nothing is validated against the endpoint here; a missing token only
/// shows up when the first completion is requested.
pub fn load_config(overrides: CliOverrides) -> Config {
    tracing::debug!("Loading configuration");

    let config = merge_env_with(Config::default(), |key| std::env::var(key).ok());
    let config = apply_cli_overrides(config, overrides);

    let summary = config.get_safe_summary();
    tracing::debug!(
        api_token_configured = summary.api_token_configured,
        model = %summary.model,
        base_url = %summary.base_url,
        max_new_tokens = summary.max_new_tokens,
        timeout_seconds = summary.timeout_seconds,
        max_history_turns = ?summary.max_history_turns,
        "Configuration loaded"
    );

    config
}

/// Applies environment overrides read through `lookup`.
///
/// Empty values are ignored; unparsable numbers are logged and ignored.
pub fn merge_env_with<F>(mut config: Config, lookup: F) -> Config
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(token) = get(ENV_API_TOKEN).or_else(|| get(ENV_API_TOKEN_FALLBACK)) {
        config.api_token = Some(token.trim().to_string());
    }
    if let Some(model) = get(ENV_MODEL) {
        config.model = model.trim().to_string();
    }
    if let Some(url) = get(ENV_BASE_URL) {
        config.base_url = url.trim().to_string();
    }
    if let Some(raw) = get(ENV_MAX_NEW_TOKENS) {
        if let Some(v) = parse_or_warn::<u32>(ENV_MAX_NEW_TOKENS, &raw) {
            config.max_new_tokens = v;
        }
    }
    if let Some(raw) = get(ENV_TIMEOUT_SECS) {
        if let Some(v) = parse_or_warn::<u64>(ENV_TIMEOUT_SECS, &raw) {
            config.timeout_seconds = v;
        }
    }
    if let Some(raw) = get(ENV_MAX_HISTORY) {
        if let Some(v) = parse_or_warn::<usize>(ENV_MAX_HISTORY, &raw) {
            config.max_history_turns = Some(v);
        }
    }

    config
}

pub fn apply_cli_overrides(mut config: Config, overrides: CliOverrides) -> Config {
    if let Some(model) = overrides.model.filter(|m| !m.trim().is_empty()) {
        tracing::debug!(model = %model, "Applying CLI model override");
        config.model = model;
    }
    if let Some(max) = overrides.max_history {
        tracing::debug!(max_history = max, "Applying CLI history bound");
        config.max_history_turns = Some(max);
    }
    config
}

/// Parses a strictly positive number from an environment value.
pub fn parse_positive<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr + PartialEq + Default,
{
    let value = raw
        .trim()
        .parse::<T>()
        .map_err(|_| ConfigError::InvalidNumber {
            key: key.to_string(),
            value: raw.to_string(),
        })?;
    if value == T::default() {
        return Err(ConfigError::Zero {
            key: key.to_string(),
        });
    }
    Ok(value)
}

fn parse_or_warn<T>(key: &str, raw: &str) -> Option<T>
where
    T: FromStr + PartialEq + Default,
{
    match parse_positive(key, raw) {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::warn!(error = %e, "Ignoring environment override");
            None
        }
    }
}
