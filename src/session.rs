//! Session loop - the main assistant service
//!
//! Drives the listen -> classify -> respond -> log cycle until the user
//! says goodbye, the input source closes, or ctrl-c arrives. No failure of
//! a collaborator ever ends the session; only those three do.

use tokio::sync::mpsc;

use crate::command::{ResponseGenerator, classify, is_exit_phrase, normalize};
use crate::journal::Journal;
use crate::{Error, Result};

const READY_GREETING: &str = "Hello! I'm your personal AI assistant. I'm ready to help you!";

const CLARIFY: &str = "I didn't catch that. Could you please repeat?";

const RECOGNITION_RETRY: &str = "I'm having trouble with speech recognition. Please try again.";

const INTERRUPT_FAREWELL: &str = "Goodbye!";

const TURN_ERROR: &str = "I encountered an error. Let me try to continue.";

/// Outcome of one listen attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Heard {
    /// A transcribed command
    Utterance(String),
    /// Nothing was said within the listen window
    NoSpeech,
    /// Speech was captured but could not be transcribed
    Unintelligible,
    /// The recognition service failed
    ServiceError,
    /// The input source is exhausted (stdin EOF, end of script)
    Closed,
}

/// Source of utterances
///
/// `?Send` because the microphone implementation holds a cpal stream,
/// which is tied to its thread; the session runs on one task anyway.
#[async_trait::async_trait(?Send)]
pub trait Transcriber {
    /// Block until something is heard (or the listen window lapses)
    async fn listen(&mut self) -> Heard;
}

/// Sink for spoken responses
#[async_trait::async_trait(?Send)]
pub trait Speaker {
    /// Deliver one response, blocking until playback completes
    ///
    /// # Errors
    ///
    /// Returns error if synthesis or playback fails
    async fn speak(&mut self, text: &str) -> Result<()>;
}

/// Whether the loop continues after a turn
enum Turn {
    Continue,
    Terminate,
}

/// The assistant session: one user, one microphone, sequential turns
pub struct Session {
    generator: ResponseGenerator,
    transcriber: Box<dyn Transcriber>,
    speaker: Box<dyn Speaker>,
    journal: Box<dyn Journal>,
    shutdown: mpsc::Receiver<()>,
}

impl Session {
    /// Assemble a session from its collaborators
    ///
    /// `shutdown` carries the external interrupt signal; send on it to make
    /// the session say goodbye and stop after the current operation.
    #[must_use]
    pub fn new(
        generator: ResponseGenerator,
        transcriber: Box<dyn Transcriber>,
        speaker: Box<dyn Speaker>,
        journal: Box<dyn Journal>,
        shutdown: mpsc::Receiver<()>,
    ) -> Self {
        Self {
            generator,
            transcriber,
            speaker,
            journal,
            shutdown,
        }
    }

    /// Run until terminated
    ///
    /// # Errors
    ///
    /// Currently infallible at the loop level; the signature leaves room
    /// for fatal setup errors surfaced by future collaborators.
    pub async fn run(mut self) -> Result<()> {
        self.deliver(READY_GREETING).await;

        loop {
            let heard = tokio::select! {
                _ = self.shutdown.recv() => None,
                heard = self.transcriber.listen() => Some(heard),
            };

            let Some(heard) = heard else {
                tracing::info!("interrupt received");
                self.deliver(INTERRUPT_FAREWELL).await;
                break;
            };

            match self.turn(heard).await {
                Ok(Turn::Continue) => {}
                Ok(Turn::Terminate) => break,
                Err(e) => {
                    tracing::error!(error = %e, "turn failed");
                    self.deliver(TURN_ERROR).await;
                    self.record("error", "system_error", &e.to_string()).await;
                }
            }
        }

        tracing::info!("session ended");
        Ok(())
    }

    /// Handle one listen outcome
    async fn turn(&mut self, heard: Heard) -> Result<Turn> {
        let raw = match heard {
            Heard::NoSpeech => return Ok(Turn::Continue),
            Heard::Unintelligible => {
                self.deliver(CLARIFY).await;
                return Ok(Turn::Continue);
            }
            Heard::ServiceError => {
                self.deliver(RECOGNITION_RETRY).await;
                return Ok(Turn::Continue);
            }
            Heard::Closed => {
                tracing::info!("input source closed");
                return Ok(Turn::Terminate);
            }
            Heard::Utterance(raw) => raw,
        };

        let utterance = normalize(&raw);
        if utterance.is_empty() {
            return Err(Error::Stt("empty utterance after normalization".into()));
        }

        let intent = classify(&utterance);
        tracing::debug!(?intent, utterance = %utterance, "classified");

        let result = self.generator.respond(intent, &utterance);
        self.deliver(&result.response_text).await;
        self.record("command", &utterance, &result.response_text)
            .await;

        if result.should_terminate || is_exit_phrase(&utterance) {
            return Ok(Turn::Terminate);
        }

        Ok(Turn::Continue)
    }

    /// Speak a response; synthesis failure is logged, never fatal
    async fn deliver(&mut self, text: &str) {
        if let Err(e) = self.speaker.speak(text).await {
            tracing::warn!(error = %e, "speech synthesis failed");
        }
    }

    /// Record an interaction; the journal is best-effort
    async fn record(&self, kind: &str, command: &str, response: &str) {
        if let Err(e) = self.journal.record(kind, command, response).await {
            tracing::debug!(error = %e, kind, "interaction not recorded");
        }
    }
}
