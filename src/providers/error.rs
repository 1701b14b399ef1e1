//! Error type for the completion capability
//!
//! Every failure of the remote model endpoint surfaces as a `CompletionError`.
//! Variants only classify the cause; callers treat them uniformly.

use thiserror::Error;

/// Errors that can occur while obtaining a completion
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompletionError {
    /// Connection issues, DNS failures, dropped sockets
    #[error("Network error: {message}")]
    Network { message: String },

    /// Missing or rejected API token
    #[error("Authentication error: {message}")]
    Auth { message: String },

    /// Too many requests or quota exceeded
    #[error("Rate limit exceeded: {message}")]
    RateLimit {
        message: String,
        /// Seconds suggested by the endpoint, when it sent one
        retry_after: Option<u64>,
    },

    /// Endpoint rejected the request (bad model id, bad parameters)
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("Request timeout after {seconds} seconds")]
    Timeout { seconds: u64 },

    /// Server-side failure reported by the endpoint
    #[error("Provider error: {message}")]
    Provider {
        message: String,
        code: Option<String>,
    },

    /// Response body could not be understood
    #[error("Malformed response: {message}")]
    Malformed { message: String },

    /// Endpoint answered without any reply text
    #[error("Empty response from model")]
    EmptyResponse,

    /// Client-side configuration problem (e.g. no API token set)
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CompletionError {
    /// Returns true if the same request could plausibly succeed later
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CompletionError::Network { .. }
                | CompletionError::RateLimit { .. }
                | CompletionError::Timeout { .. }
        )
    }

    pub fn is_auth_error(&self) -> bool {
        matches!(self, CompletionError::Auth { .. })
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }

    pub fn rate_limit(message: impl Into<String>, retry_after: Option<u64>) -> Self {
        Self::RateLimit {
            message: message.into(),
            retry_after,
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    pub fn timeout(seconds: u64) -> Self {
        Self::Timeout { seconds }
    }

    pub fn provider(message: impl Into<String>, code: Option<impl Into<String>>) -> Self {
        Self::Provider {
            message: message.into(),
            code: code.map(|c| c.into()),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}
