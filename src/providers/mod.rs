//! Completion providers
//!
//! The conversation engine only knows the `CompletionProvider` trait: hand it
//! an ordered list of turns and a cap on generated tokens, get back a reply.
//! `HuggingFaceProvider` is the production implementation.
//!
//! # Example
//!
//! ```rust,no_run
//! use soccerfan::providers::CompletionProvider;
//! use soccerfan::session::Turn;
//!
//! async fn example(provider: &dyn CompletionProvider) {
//!     let turns = vec![
//!         Turn::system("You are a soccer fan"),
//!         Turn::user("Who wins the league?"),
//!     ];
//!     let completion = provider.complete(turns, 256).await.unwrap();
//!     println!("{}", completion.content);
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::session::Turn;

pub mod error;
pub mod huggingface;
#[cfg(test)]
pub mod mock;

pub use error::CompletionError;
pub use huggingface::HuggingFaceProvider;

/// Reply produced by a provider
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Completion {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completion_tokens: Option<u32>,
}

impl Completion {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            prompt_tokens: None,
            completion_tokens: None,
        }
    }

    pub fn with_tokens(mut self, prompt: u32, completion: u32) -> Self {
        self.prompt_tokens = Some(prompt);
        self.completion_tokens = Some(completion);
        self
    }

    pub fn total_tokens(&self) -> Option<u32> {
        match (self.prompt_tokens, self.completion_tokens) {
            (Some(p), Some(c)) => Some(p + c),
            _ => None,
        }
    }
}

/// A hosted model that maps an ordered conversation to a reply.
#[async_trait::async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Requests a reply for `turns` (oldest first), generating at most
    /// `max_new_tokens` tokens.
    async fn complete(
        &self,
        turns: Vec<Turn>,
        max_new_tokens: u32,
    ) -> Result<Completion, CompletionError>;

    /// Model identifier sent to the endpoint
    fn model(&self) -> &str;

    /// Used for logging
    fn provider_name(&self) -> &'static str;
}

pub type BoxedProvider = Box<dyn CompletionProvider>;
