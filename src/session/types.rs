use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

/// Role of the speaker of a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Persona / instructions
    System,
    /// Human input
    User,
    /// Model reply
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One role-tagged message of a conversation.
///
/// Turns are never mutated after creation; the timestamp is informational and
/// is ignored by equality so that replayed context compares by role and text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl Turn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

impl PartialEq for Turn {
    fn eq(&self, other: &Self) -> bool {
        self.role == other.role && self.content == other.content
    }
}

impl Eq for Turn {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub session_id: String,
    pub created_at: DateTime<Utc>,
    pub last_accessed: DateTime<Utc>,
    pub turns: VecDeque<Turn>,
    /// Oldest turns are evicted once this many are retained. `None` keeps everything.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_turns: Option<usize>,
}

impl Session {
    pub fn new(session_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            session_id: session_id.into(),
            created_at: now,
            last_accessed: now,
            turns: VecDeque::new(),
            max_turns: None,
        }
    }

    /// Bounds retained history. A bound of zero is raised to one so the most
    /// recent turn (a question awaiting its reply) is never lost.
    pub fn with_max_turns(mut self, max_turns: Option<usize>) -> Self {
        self.max_turns = max_turns.map(|max| max.max(1));
        self
    }

    pub fn add_turn(&mut self, turn: Turn) {
        if let Some(max) = self.max_turns {
            while self.turns.len() >= max {
                self.turns.pop_front();
            }
        }
        self.turns.push_back(turn);
        self.last_accessed = Utc::now();
    }

    /// Empties the history in place; the session itself stays registered.
    pub fn clear(&mut self) {
        self.turns.clear();
        self.last_accessed = Utc::now();
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn history(&self) -> impl Iterator<Item = &Turn> {
        self.turns.iter()
    }
}
