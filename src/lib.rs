//! Valet - voice-driven personal command assistant
//!
//! This library provides the core functionality for the Valet assistant:
//! - Voice processing (capture, utterance segmentation, STT, TTS)
//! - Command interpretation (keyword rules -> intent -> response)
//! - Note persistence and application launching
//! - Best-effort interaction logging to Firestore
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                    Input                             │
//! │      Microphone (cpal + STT)  │  stdin (--text)     │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │                 Session Loop                         │
//! │   Classify  │  Respond  │  Speak  │  Journal        │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │              Collaborators                           │
//! │   Notes (SQLite) │ Launcher │ Firestore journal     │
//! └─────────────────────────────────────────────────────┘
//! ```

pub mod command;
pub mod config;
pub mod console;
pub mod db;
pub mod error;
pub mod journal;
pub mod launcher;
pub mod session;
pub mod setup;
pub mod voice;

pub use command::{
    CommandResult, Intent, Launcher, NoteStore, ResponseGenerator, classify, is_exit_phrase,
    normalize,
};
pub use config::Config;
pub use error::{Error, Result};
pub use journal::{FirestoreJournal, Journal, NullJournal};
pub use launcher::DesktopLauncher;
pub use session::{Heard, Session, Speaker, Transcriber};
