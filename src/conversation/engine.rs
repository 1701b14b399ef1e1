//! Conversation engine
//!
//! Each call to [`ConversationEngine::respond`] is one request/response
//! exchange. The only state is the conversation history held by the owned
//! [`SessionStore`]; the engine replays it in front of every new utterance.
//!
//! Context layout sent to the provider:
//! 1. persona (system turn)
//! 2. every retained turn of the session, oldest first
//! 3. the new user turn

use std::time::Instant;

use crate::config::Config;
use crate::conversation::persona::SOCCER_FAN_PERSONA;
use crate::providers::{BoxedProvider, CompletionError, HuggingFaceProvider};
use crate::session::{Session, SessionStore, Turn};

/// Assembles the ordered context for the next completion.
pub fn build_context(persona: &str, session: &Session, utterance: &Turn) -> Vec<Turn> {
    let mut context = Vec::with_capacity(session.len() + 2);
    context.push(Turn::system(persona));
    context.extend(session.history().cloned());
    context.push(utterance.clone());
    context
}

pub struct ConversationEngine {
    provider: BoxedProvider,
    store: SessionStore,
    max_new_tokens: u32,
}

impl ConversationEngine {
    pub fn new(provider: BoxedProvider, store: SessionStore) -> Self {
        Self {
            provider,
            store,
            max_new_tokens: crate::config::schema::DEFAULT_MAX_NEW_TOKENS,
        }
    }

    pub fn with_max_new_tokens(mut self, max_new_tokens: u32) -> Self {
        self.max_new_tokens = max_new_tokens;
        self
    }

    /// Wires the Hugging Face provider and a fresh store from configuration.
    pub fn from_config(config: &Config) -> Result<Self, CompletionError> {
        let provider = HuggingFaceProvider::from_config(config)?;
        let store = SessionStore::new().with_max_turns(config.max_history_turns);
        Ok(Self::new(Box::new(provider), store).with_max_new_tokens(config.max_new_tokens))
    }

    pub fn model(&self) -> &str {
        self.provider.model()
    }

    pub fn max_new_tokens(&self) -> u32 {
        self.max_new_tokens
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn clear_session(&mut self, session_id: &str) -> bool {
        self.store.clear(session_id)
    }

    /// Produces the persona's reply to `utterance` within `session_id`.
    ///
    /// The user turn is recorded before the provider is called and stays in
    /// the history even when the call fails. The assistant turn is recorded
    /// only on success.
    pub async fn respond(
        &mut self,
        session_id: &str,
        utterance: &str,
    ) -> Result<String, CompletionError> {
        let started = Instant::now();
        let user_turn = Turn::user(utterance);

        let context = {
            let session = self.store.get_or_create(session_id);
            let context = build_context(SOCCER_FAN_PERSONA, session, &user_turn);
            session.add_turn(user_turn);
            context
        };

        tracing::debug!(
            session_id = %session_id,
            context_turns = context.len(),
            provider = self.provider.provider_name(),
            "Context built"
        );

        let completion = match self.provider.complete(context, self.max_new_tokens).await {
            Ok(completion) => completion,
            Err(e) => {
                tracing::warn!(session_id = %session_id, error = %e, "Completion failed");
                return Err(e);
            }
        };

        if completion.content.trim().is_empty() {
            tracing::warn!(session_id = %session_id, "Completion returned no text");
            return Err(CompletionError::EmptyResponse);
        }

        self.store
            .get_or_create(session_id)
            .add_turn(Turn::assistant(completion.content.clone()));

        tracing::debug!(
            session_id = %session_id,
            response_ms = started.elapsed().as_millis(),
            reply_length = completion.content.len(),
            "Reply recorded"
        );

        Ok(completion.content)
    }
}
