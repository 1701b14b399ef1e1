use crate::session::types::Session;
use std::collections::HashMap;
use tracing::debug;

/// In-memory owner of every conversation for the lifetime of the process.
///
/// Sessions are created lazily on first reference and only ever lent out by
/// reference; nothing is persisted.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: HashMap<String, Session>,
    max_turns: Option<usize>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies a history bound to every session this store creates.
    /// Zero is raised to one, as in [`Session::with_max_turns`].
    pub fn with_max_turns(mut self, max_turns: Option<usize>) -> Self {
        self.max_turns = max_turns.map(|max| max.max(1));
        self
    }

    pub fn max_turns(&self) -> Option<usize> {
        self.max_turns
    }

    /// Returns the session for `session_id`, registering an empty one if absent.
    pub fn get_or_create(&mut self, session_id: &str) -> &mut Session {
        let max_turns = self.max_turns;
        self.sessions
            .entry(session_id.to_string())
            .or_insert_with(|| {
                debug!(session_id = %session_id, "Creating session");
                Session::new(session_id).with_max_turns(max_turns)
            })
    }

    /// Empties the history of an existing session.
    ///
    /// Returns `false` without creating an entry when `session_id` is unknown.
    pub fn clear(&mut self, session_id: &str) -> bool {
        match self.sessions.get_mut(session_id) {
            Some(session) => {
                debug!(session_id = %session_id, turns = session.len(), "Clearing session");
                session.clear();
                true
            }
            None => false,
        }
    }

    pub fn get(&self, session_id: &str) -> Option<&Session> {
        self.sessions.get(session_id)
    }

    pub fn contains(&self, session_id: &str) -> bool {
        self.sessions.contains_key(session_id)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Known session ids, sorted.
    pub fn session_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.sessions.keys().cloned().collect();
        ids.sort();
        ids
    }
}
