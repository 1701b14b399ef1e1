//! Mock completion provider for unit tests
//!
//! Replies are served from a queue (falling back to a default reply), errors
//! can be injected, and every call's context is recorded for assertions.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::providers::{Completion, CompletionError, CompletionProvider};
use crate::session::Turn;

type Scripted = std::result::Result<Completion, CompletionError>;

#[derive(Clone)]
pub struct MockCompletionProvider {
    default_reply: Arc<Mutex<Completion>>,
    queue: Arc<Mutex<VecDeque<Scripted>>>,
    calls: Arc<Mutex<Vec<Vec<Turn>>>>,
    max_tokens_seen: Arc<Mutex<Vec<u32>>>,
}

impl MockCompletionProvider {
    pub fn new() -> Self {
        Self {
            default_reply: Arc::new(Mutex::new(Completion::new("Mock response"))),
            queue: Arc::new(Mutex::new(VecDeque::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            max_tokens_seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Sets the reply returned whenever the queue is empty
    pub fn set_response(&self, content: impl Into<String>) {
        *self.default_reply.lock().unwrap() = Completion::new(content);
    }

    pub fn push_response(&self, content: impl Into<String>) {
        self.queue
            .lock()
            .unwrap()
            .push_back(Ok(Completion::new(content)));
    }

    pub fn push_error(&self, error: CompletionError) {
        self.queue.lock().unwrap().push_back(Err(error));
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn last_turns(&self) -> Option<Vec<Turn>> {
        self.calls.lock().unwrap().last().cloned()
    }

    pub fn last_max_tokens(&self) -> Option<u32> {
        self.max_tokens_seen.lock().unwrap().last().copied()
    }
}

impl Default for MockCompletionProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl CompletionProvider for MockCompletionProvider {
    async fn complete(
        &self,
        turns: Vec<Turn>,
        max_new_tokens: u32,
    ) -> Result<Completion, CompletionError> {
        self.calls.lock().unwrap().push(turns);
        self.max_tokens_seen.lock().unwrap().push(max_new_tokens);

        let scripted = self.queue.lock().unwrap().pop_front();
        match scripted {
            Some(result) => result,
            None => Ok(self.default_reply.lock().unwrap().clone()),
        }
    }

    fn model(&self) -> &str {
        "mock-model"
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_serves_queue_then_default() {
        let mock = MockCompletionProvider::new();
        mock.set_response("fallback");
        mock.push_response("first");
        mock.push_error(CompletionError::network("down"));

        let first = mock.complete(vec![Turn::user("a")], 16).await.unwrap();
        assert_eq!(first.content, "first");

        let second = mock.complete(vec![Turn::user("b")], 16).await;
        assert!(second.is_err());

        let third = mock.complete(vec![Turn::user("c")], 32).await.unwrap();
        assert_eq!(third.content, "fallback");

        assert_eq!(mock.call_count(), 3);
        assert_eq!(mock.last_turns().unwrap(), vec![Turn::user("c")]);
        assert_eq!(mock.last_max_tokens(), Some(32));
    }
}
