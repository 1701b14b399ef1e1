use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use soccerfan::conversation::{ConversationEngine, SOCCER_FAN_PERSONA};
use soccerfan::providers::{Completion, CompletionError, CompletionProvider};
use soccerfan::session::{Role, SessionStore, Turn};

/// Provider that replays scripted outcomes and records every context it receives
#[derive(Clone, Default)]
struct ScriptedProvider {
    outcomes: Arc<Mutex<VecDeque<Result<String, CompletionError>>>>,
    contexts: Arc<Mutex<Vec<Vec<Turn>>>>,
}

impl ScriptedProvider {
    fn reply(&self, content: &str) -> &Self {
        self.outcomes
            .lock()
            .unwrap()
            .push_back(Ok(content.to_string()));
        self
    }

    fn fail(&self, error: CompletionError) -> &Self {
        self.outcomes.lock().unwrap().push_back(Err(error));
        self
    }

    fn contexts(&self) -> Vec<Vec<Turn>> {
        self.contexts.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl CompletionProvider for ScriptedProvider {
    async fn complete(
        &self,
        turns: Vec<Turn>,
        _max_new_tokens: u32,
    ) -> Result<Completion, CompletionError> {
        self.contexts.lock().unwrap().push(turns);
        let outcome = self
            .outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok("Default reply".to_string()));
        outcome.map(Completion::new)
    }

    fn model(&self) -> &str {
        "scripted"
    }

    fn provider_name(&self) -> &'static str {
        "scripted"
    }
}

fn engine(provider: &ScriptedProvider) -> ConversationEngine {
    ConversationEngine::new(Box::new(provider.clone()), SessionStore::new())
}

fn history(engine: &ConversationEngine, session_id: &str) -> Vec<Turn> {
    engine
        .store()
        .get(session_id)
        .map(|s| s.history().cloned().collect())
        .unwrap_or_default()
}

#[tokio::test]
async fn test_end_to_end_best_player() {
    let provider = ScriptedProvider::default();
    provider.reply("Messi, obviously.");
    let mut engine = engine(&provider);
    assert!(engine.store().is_empty());

    let reply = engine.respond("s1", "Who is the best player?").await.unwrap();

    assert_eq!(reply, "Messi, obviously.");
    assert_eq!(
        history(&engine, "s1"),
        vec![
            Turn::user("Who is the best player?"),
            Turn::assistant("Messi, obviously."),
        ]
    );
}

#[tokio::test]
async fn test_context_assembly_with_prior_turns() {
    let provider = ScriptedProvider::default();
    provider.reply("Y").reply("Z-reply");
    let mut engine = engine(&provider);

    engine.respond("sid", "X").await.unwrap();
    engine.respond("sid", "Z").await.unwrap();

    let contexts = provider.contexts();
    assert_eq!(
        contexts[1],
        vec![
            Turn::system(SOCCER_FAN_PERSONA),
            Turn::user("X"),
            Turn::assistant("Y"),
            Turn::user("Z"),
        ]
    );
}

#[tokio::test]
async fn test_failure_retains_user_turn_for_next_call() {
    let provider = ScriptedProvider::default();
    provider
        .fail(CompletionError::timeout(60))
        .reply("Sorry, I was watching the match.");
    let mut engine = engine(&provider);

    let err = engine.respond("sid", "Q").await.unwrap_err();
    assert_eq!(err, CompletionError::timeout(60));
    assert_eq!(history(&engine, "sid"), vec![Turn::user("Q")]);

    engine.respond("sid", "Still there?").await.unwrap();

    let contexts = provider.contexts();
    assert_eq!(
        contexts[1],
        vec![
            Turn::system(SOCCER_FAN_PERSONA),
            Turn::user("Q"),
            Turn::user("Still there?"),
        ]
    );
    let roles: Vec<Role> = history(&engine, "sid").iter().map(|t| t.role).collect();
    assert_eq!(roles, vec![Role::User, Role::User, Role::Assistant]);
}

#[tokio::test]
async fn test_respond_never_touches_other_sessions() {
    let provider = ScriptedProvider::default();
    let mut engine = engine(&provider);

    engine.respond("B", "Arsenal will win it").await.unwrap();
    let b_before = history(&engine, "B");

    engine.respond("A", "No chance").await.unwrap();
    engine.respond("A", "Trust me").await.unwrap();

    assert_eq!(history(&engine, "B"), b_before);
    assert_eq!(history(&engine, "A").len(), 4);
}

#[tokio::test]
async fn test_clear_then_respond_uses_empty_history() {
    let provider = ScriptedProvider::default();
    let mut engine = engine(&provider);

    engine.respond("sid", "before").await.unwrap();
    assert!(engine.clear_session("sid"));
    assert!(engine.store().contains("sid"));
    assert!(history(&engine, "sid").is_empty());

    engine.respond("sid", "after").await.unwrap();

    let contexts = provider.contexts();
    assert_eq!(
        contexts.last().unwrap(),
        &vec![Turn::system(SOCCER_FAN_PERSONA), Turn::user("after")]
    );
}

#[tokio::test]
async fn test_each_call_starts_with_persona() {
    let provider = ScriptedProvider::default();
    let mut engine = engine(&provider);

    for i in 0..3 {
        engine.respond("sid", &format!("msg {}", i)).await.unwrap();
    }

    for context in provider.contexts() {
        assert_eq!(context[0].role, Role::System);
        assert_eq!(context[0].content, SOCCER_FAN_PERSONA);
        assert_eq!(
            context.iter().filter(|t| t.role == Role::System).count(),
            1
        );
    }
}
