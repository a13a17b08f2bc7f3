//! Text-mode collaborators
//!
//! Replaces the microphone and speakers with stdin/stdout for headless
//! machines (`valet --text`). One line is one utterance; EOF ends the
//! session.

use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use crate::Result;
use crate::session::{Heard, Speaker, Transcriber};

/// Reads utterances from stdin, one per line
pub struct ConsoleTranscriber {
    lines: Lines<BufReader<Stdin>>,
}

impl ConsoleTranscriber {
    /// Create a transcriber over stdin
    #[must_use]
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }
}

impl Default for ConsoleTranscriber {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait(?Send)]
impl Transcriber for ConsoleTranscriber {
    async fn listen(&mut self) -> Heard {
        match self.lines.next_line().await {
            Ok(Some(line)) if line.trim().is_empty() => Heard::NoSpeech,
            Ok(Some(line)) => Heard::Utterance(line),
            Ok(None) => Heard::Closed,
            Err(e) => {
                tracing::warn!(error = %e, "stdin read failed");
                Heard::ServiceError
            }
        }
    }
}

/// Prints responses to stdout
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSpeaker;

#[async_trait::async_trait(?Send)]
impl Speaker for ConsoleSpeaker {
    async fn speak(&mut self, text: &str) -> Result<()> {
        println!("Assistant: {text}");
        Ok(())
    }
}
