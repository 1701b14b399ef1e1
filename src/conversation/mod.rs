pub mod engine;
pub mod persona;

pub use engine::{ConversationEngine, build_context};
pub use persona::SOCCER_FAN_PERSONA;
