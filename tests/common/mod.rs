//! Shared test fakes for the session collaborators
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use valet::command::{Launcher, NoteStore};
use valet::journal::Journal;
use valet::session::{Heard, Speaker, Transcriber};
use valet::{Error, Result};

/// Note store that records every appended text
#[derive(Clone, Default)]
pub struct RecordingNotes {
    pub appended: Arc<Mutex<Vec<String>>>,
}

impl RecordingNotes {
    pub fn texts(&self) -> Vec<String> {
        self.appended.lock().unwrap().clone()
    }
}

impl NoteStore for RecordingNotes {
    fn append(&self, text: &str) -> Result<()> {
        self.appended.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

/// Note store whose appends always fail
pub struct FailingNotes;

impl NoteStore for FailingNotes {
    fn append(&self, _text: &str) -> Result<()> {
        Err(Error::Database("disk full".to_string()))
    }
}

/// Launcher that records every launched identifier
#[derive(Clone, Default)]
pub struct RecordingLauncher {
    pub launched: Arc<Mutex<Vec<String>>>,
}

impl RecordingLauncher {
    pub fn identifiers(&self) -> Vec<String> {
        self.launched.lock().unwrap().clone()
    }
}

impl Launcher for RecordingLauncher {
    fn launch(&self, identifier: &str) -> Result<()> {
        self.launched.lock().unwrap().push(identifier.to_string());
        Ok(())
    }
}

/// Launcher whose launches always fail
pub struct FailingLauncher;

impl Launcher for FailingLauncher {
    fn launch(&self, _identifier: &str) -> Result<()> {
        Err(Error::Launch("no such executable".to_string()))
    }
}

/// Transcriber that replays a fixed script, then reports a closed source
pub struct ScriptedTranscriber {
    script: VecDeque<Heard>,
}

impl ScriptedTranscriber {
    pub fn new(script: Vec<Heard>) -> Self {
        Self {
            script: script.into(),
        }
    }
}

#[async_trait::async_trait(?Send)]
impl Transcriber for ScriptedTranscriber {
    async fn listen(&mut self) -> Heard {
        self.script.pop_front().unwrap_or(Heard::Closed)
    }
}

/// Transcriber that never hears anything (for interrupt tests)
pub struct BlockedTranscriber;

#[async_trait::async_trait(?Send)]
impl Transcriber for BlockedTranscriber {
    async fn listen(&mut self) -> Heard {
        std::future::pending().await
    }
}

/// Speaker that records every delivered response
#[derive(Clone, Default)]
pub struct RecordingSpeaker {
    pub spoken: Arc<Mutex<Vec<String>>>,
}

impl RecordingSpeaker {
    pub fn texts(&self) -> Vec<String> {
        self.spoken.lock().unwrap().clone()
    }
}

#[async_trait::async_trait(?Send)]
impl Speaker for RecordingSpeaker {
    async fn speak(&mut self, text: &str) -> Result<()> {
        self.spoken.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

/// Speaker whose synthesis always fails
pub struct FailingSpeaker;

#[async_trait::async_trait(?Send)]
impl Speaker for FailingSpeaker {
    async fn speak(&mut self, _text: &str) -> Result<()> {
        Err(Error::Tts("synthesizer offline".to_string()))
    }
}

/// Journal that keeps entries in memory
#[derive(Clone, Default)]
pub struct MemoryJournal {
    pub entries: Arc<Mutex<Vec<(String, String, String)>>>,
}

impl MemoryJournal {
    pub fn recorded(&self) -> Vec<(String, String, String)> {
        self.entries.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Journal for MemoryJournal {
    async fn record(&self, kind: &str, command: &str, response: &str) -> Result<()> {
        self.entries.lock().unwrap().push((
            kind.to_string(),
            command.to_string(),
            response.to_string(),
        ));
        Ok(())
    }
}

/// Journal whose writes always fail
pub struct FailingJournal;

#[async_trait::async_trait]
impl Journal for FailingJournal {
    async fn record(&self, _kind: &str, _command: &str, _response: &str) -> Result<()> {
        Err(Error::Journal("remote store unreachable".to_string()))
    }
}
