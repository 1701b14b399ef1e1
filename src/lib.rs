//! soccerfan - a soccer fan chatbot persona with per-session memory

pub mod config;
pub mod conversation;
pub mod providers;
pub mod repl;
pub mod session;
