//! Command interpretation engine
//!
//! Maps a normalized utterance to an intent and the intent to a spoken
//! response. Side-effecting work (note persistence, process launch) goes
//! through the collaborator traits so tests can substitute fakes.

mod intent;
mod respond;

pub use intent::{Intent, classify, is_exit_phrase, normalize};
pub use respond::{ADVICE, ResponseGenerator};

use crate::Result;

/// Outcome of handling one utterance
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Text to deliver to the user
    pub response_text: String,

    /// Whether the session should end after this turn
    pub should_terminate: bool,
}

impl CommandResult {
    /// A response that keeps the session going
    #[must_use]
    pub fn reply(response_text: impl Into<String>) -> Self {
        Self {
            response_text: response_text.into(),
            should_terminate: false,
        }
    }

    /// A response that ends the session
    #[must_use]
    pub fn farewell(response_text: impl Into<String>) -> Self {
        Self {
            response_text: response_text.into(),
            should_terminate: true,
        }
    }
}

/// Append-only note storage
pub trait NoteStore: Send {
    /// Persist one note
    ///
    /// # Errors
    ///
    /// Returns error if the note cannot be stored
    fn append(&self, text: &str) -> Result<()>;
}

/// Platform application launcher
pub trait Launcher: Send {
    /// Start the application identified by `identifier`
    ///
    /// # Errors
    ///
    /// Returns error if the process cannot be started
    fn launch(&self, identifier: &str) -> Result<()>;
}
