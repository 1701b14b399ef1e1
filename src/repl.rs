//! Interactive read-eval-print loop
//!
//! Reads one line at a time, routes session commands to the store and
//! everything else to the conversation engine. Completion failures are
//! printed and the loop keeps going.

use std::io::{self, BufRead, Write};

use crate::conversation::ConversationEngine;
use crate::providers::CompletionError;

pub const DEFAULT_SESSION_ID: &str = "default";

pub const BANNER: &str = "Soccer Fan Chatbot (Type 'exit' to quit, 'new session' to start a fresh conversation, 'clear' to reset current conversation)";

/// What a line of input asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Exit,
    NewSession,
    Clear,
    Utterance(String),
}

impl ReplCommand {
    /// Commands are exact, case-insensitive matches; anything else is chat.
    pub fn parse(line: &str) -> Self {
        match line.to_lowercase().as_str() {
            "exit" | "quit" | "bye" => ReplCommand::Exit,
            "new session" => ReplCommand::NewSession,
            "clear" => ReplCommand::Clear,
            _ => ReplCommand::Utterance(line.to_string()),
        }
    }
}

/// Follow-up advice printed under an error, when there is any.
pub fn recovery_hint(error: &CompletionError) -> Option<&'static str> {
    if error.is_auth_error() {
        Some("Hint: check that HUGGINGFACE_API_TOKEN holds a valid Hugging Face token.")
    } else if error.is_retryable() {
        Some("Hint: this looks temporary, try sending your message again.")
    } else {
        None
    }
}

pub struct Repl<R, W> {
    input: R,
    output: W,
    session_id: String,
}

impl<R: BufRead, W: Write> Repl<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            session_id: DEFAULT_SESSION_ID.to_string(),
        }
    }

    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = session_id.into();
        self
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Runs until an exit command or end of input.
    pub async fn run(&mut self, engine: &mut ConversationEngine) -> io::Result<()> {
        writeln!(self.output, "{}", BANNER)?;
        writeln!(self.output, "{}", "=".repeat(50))?;

        loop {
            write!(self.output, "\nYou: ")?;
            self.output.flush()?;

            let Some(line) = self.read_line()? else {
                writeln!(self.output)?;
                writeln!(self.output, "Goodbye!")?;
                return Ok(());
            };

            match ReplCommand::parse(&line) {
                ReplCommand::Exit => {
                    writeln!(self.output, "Goodbye!")?;
                    return Ok(());
                }
                ReplCommand::NewSession => self.start_new_session()?,
                ReplCommand::Clear => self.clear_session(engine)?,
                ReplCommand::Utterance(text) => {
                    match engine.respond(&self.session_id, &text).await {
                        Ok(reply) => writeln!(self.output, "\nBot: {}", reply)?,
                        Err(e) => {
                            writeln!(self.output, "Error: {}", e)?;
                            if let Some(hint) = recovery_hint(&e) {
                                writeln!(self.output, "{}", hint)?;
                            }
                        }
                    }
                }
            }
        }
    }

    fn start_new_session(&mut self) -> io::Result<()> {
        write!(
            self.output,
            "Enter session name (or press Enter for random): "
        )?;
        self.output.flush()?;

        let requested = self.read_line()?.unwrap_or_default();
        let requested = requested.trim();
        self.session_id = if requested.is_empty() {
            uuid::Uuid::new_v4().to_string()
        } else {
            requested.to_string()
        };

        tracing::info!(session_id = %self.session_id, "Switched session");
        writeln!(self.output, "Starting new session: {}", self.session_id)
    }

    fn clear_session(&mut self, engine: &mut ConversationEngine) -> io::Result<()> {
        if engine.clear_session(&self.session_id) {
            writeln!(
                self.output,
                "Chat history for session '{}' cleared.",
                self.session_id
            )
        } else {
            writeln!(
                self.output,
                "No chat history found for session '{}'.",
                self.session_id
            )
        }
    }

    /// Next line without its line terminator, `None` at end of input.
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut buf = String::new();
        if self.input.read_line(&mut buf)? == 0 {
            return Ok(None);
        }
        let trimmed = buf.trim_end_matches(['\n', '\r']);
        Ok(Some(trimmed.to_string()))
    }
}
