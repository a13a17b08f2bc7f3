//! Session loop integration tests
//!
//! Runs whole sessions against scripted transcribers and recording fakes;
//! no audio hardware or network involved.

use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::mpsc;

use valet::command::ResponseGenerator;
use valet::journal::Journal;
use valet::session::{Heard, Session, Speaker, Transcriber};

mod common;

use common::{
    BlockedTranscriber, FailingJournal, FailingNotes, FailingSpeaker, MemoryJournal,
    RecordingLauncher, RecordingNotes, RecordingSpeaker, ScriptedTranscriber,
};

const GREETING: &str = "Hello! I'm your personal AI assistant. I'm ready to help you!";

fn generator(notes: RecordingNotes, launcher: RecordingLauncher) -> ResponseGenerator {
    ResponseGenerator::with_rng(
        Box::new(notes),
        Box::new(launcher),
        Box::new(StdRng::seed_from_u64(1)),
    )
}

/// Run a session over a script and return what was spoken and journaled
async fn run_script(script: Vec<Heard>) -> (Vec<String>, Vec<(String, String, String)>) {
    let speaker = RecordingSpeaker::default();
    let journal = MemoryJournal::default();
    run_session(
        Box::new(ScriptedTranscriber::new(script)),
        Box::new(speaker.clone()),
        Box::new(journal.clone()),
        RecordingNotes::default(),
    )
    .await;
    (speaker.texts(), journal.recorded())
}

async fn run_session(
    transcriber: Box<dyn Transcriber>,
    speaker: Box<dyn Speaker>,
    journal: Box<dyn Journal>,
    notes: RecordingNotes,
) {
    let (_shutdown_tx, shutdown_rx) = mpsc::channel(1);
    Session::new(
        generator(notes, RecordingLauncher::default()),
        transcriber,
        speaker,
        journal,
        shutdown_rx,
    )
    .run()
    .await
    .unwrap();
}

#[tokio::test]
async fn greets_then_terminates_on_exit() {
    let (spoken, recorded) = run_script(vec![
        Heard::Utterance("hello".to_string()),
        Heard::Utterance("goodbye".to_string()),
        // Never reached: the exit turn terminates the loop
        Heard::Utterance("what time is it".to_string()),
    ])
    .await;

    assert_eq!(spoken[0], GREETING);
    assert!(spoken[1].contains("How can I help you today?"));
    assert_eq!(spoken[2], "Goodbye! Have a great day!");
    assert_eq!(spoken.len(), 3);

    assert_eq!(recorded.len(), 2);
    assert_eq!(recorded[0].0, "command");
    assert_eq!(recorded[0].1, "hello");
    assert_eq!(recorded[1].1, "goodbye");
}

#[tokio::test]
async fn no_speech_is_skipped_silently() {
    let (spoken, recorded) = run_script(vec![
        Heard::NoSpeech,
        Heard::NoSpeech,
        Heard::Utterance("goodbye".to_string()),
    ])
    .await;

    // Greeting + farewell only; empty listens produce nothing
    assert_eq!(spoken.len(), 2);
    assert_eq!(recorded.len(), 1);
}

#[tokio::test]
async fn unintelligible_asks_for_repeat_without_logging() {
    let (spoken, recorded) = run_script(vec![
        Heard::Unintelligible,
        Heard::Utterance("goodbye".to_string()),
    ])
    .await;

    assert_eq!(spoken[1], "I didn't catch that. Could you please repeat?");
    // Only the goodbye turn is journaled
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].1, "goodbye");
}

#[tokio::test]
async fn service_error_asks_for_retry_without_logging() {
    let (spoken, recorded) = run_script(vec![
        Heard::ServiceError,
        Heard::Utterance("goodbye".to_string()),
    ])
    .await;

    assert_eq!(
        spoken[1],
        "I'm having trouble with speech recognition. Please try again."
    );
    assert_eq!(recorded.len(), 1);
}

#[tokio::test]
async fn closed_source_ends_session_silently() {
    let (spoken, recorded) = run_script(vec![]).await;

    assert_eq!(spoken, vec![GREETING.to_string()]);
    assert!(recorded.is_empty());
}

#[tokio::test]
async fn raw_exit_keyword_terminates_even_with_other_intent() {
    // "open" wins classification, but the raw utterance contains "exit"
    let (spoken, _) = run_script(vec![
        Heard::Utterance("open the exit door".to_string()),
        Heard::Utterance("what time is it".to_string()),
    ])
    .await;

    // Greeting + the open response, then the session is over
    assert_eq!(spoken.len(), 2);
    assert!(spoken[1].contains("I don't know how to open"));
}

#[tokio::test]
async fn failing_note_store_does_not_stop_the_loop() {
    let speaker = RecordingSpeaker::default();
    let journal = MemoryJournal::default();
    let (_shutdown_tx, shutdown_rx) = mpsc::channel(1);

    Session::new(
        ResponseGenerator::with_rng(
            Box::new(FailingNotes),
            Box::new(RecordingLauncher::default()),
            Box::new(StdRng::seed_from_u64(1)),
        ),
        Box::new(ScriptedTranscriber::new(vec![
            Heard::Utterance("save note buy milk".to_string()),
            Heard::Utterance("goodbye".to_string()),
        ])),
        Box::new(speaker.clone()),
        Box::new(journal.clone()),
        shutdown_rx,
    )
    .run()
    .await
    .unwrap();

    let spoken = speaker.texts();
    assert!(spoken[1].starts_with("Error saving note:"));
    // The loop carried on to the goodbye turn
    assert_eq!(spoken[2], "Goodbye! Have a great day!");
    assert_eq!(journal.recorded().len(), 2);
}

#[tokio::test]
async fn malformed_utterance_is_reported_and_loop_continues() {
    // Whitespace-only utterances violate the transcriber contract; the
    // loop-level catch reports them with kind "error" and keeps going
    let (spoken, recorded) = run_script(vec![
        Heard::Utterance("   ".to_string()),
        Heard::Utterance("goodbye".to_string()),
    ])
    .await;

    assert_eq!(spoken[1], "I encountered an error. Let me try to continue.");
    assert_eq!(spoken[2], "Goodbye! Have a great day!");

    assert_eq!(recorded[0].0, "error");
    assert_eq!(recorded[0].1, "system_error");
    assert_eq!(recorded[1].0, "command");
}

#[tokio::test]
async fn failing_speaker_never_aborts() {
    let journal = MemoryJournal::default();
    let (_shutdown_tx, shutdown_rx) = mpsc::channel(1);

    Session::new(
        generator(RecordingNotes::default(), RecordingLauncher::default()),
        Box::new(ScriptedTranscriber::new(vec![
            Heard::Utterance("hello".to_string()),
            Heard::Utterance("goodbye".to_string()),
        ])),
        Box::new(FailingSpeaker),
        Box::new(journal.clone()),
        shutdown_rx,
    )
    .run()
    .await
    .unwrap();

    // Both turns completed and were journaled despite no audio out
    assert_eq!(journal.recorded().len(), 2);
}

#[tokio::test]
async fn failing_journal_never_aborts() {
    let speaker = RecordingSpeaker::default();
    let (_shutdown_tx, shutdown_rx) = mpsc::channel(1);

    Session::new(
        generator(RecordingNotes::default(), RecordingLauncher::default()),
        Box::new(ScriptedTranscriber::new(vec![
            Heard::Utterance("hello".to_string()),
            Heard::Utterance("goodbye".to_string()),
        ])),
        Box::new(speaker.clone()),
        Box::new(FailingJournal),
        shutdown_rx,
    )
    .run()
    .await
    .unwrap();

    assert_eq!(speaker.texts().len(), 3); // greeting + two responses
}

#[tokio::test]
async fn interrupt_says_goodbye_and_stops() {
    let speaker = RecordingSpeaker::default();
    let journal = MemoryJournal::default();
    let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

    shutdown_tx.send(()).await.unwrap();

    Session::new(
        generator(RecordingNotes::default(), RecordingLauncher::default()),
        Box::new(BlockedTranscriber),
        Box::new(speaker.clone()),
        Box::new(journal.clone()),
        shutdown_rx,
    )
    .run()
    .await
    .unwrap();

    let spoken = speaker.texts();
    assert_eq!(spoken.first().map(String::as_str), Some(GREETING));
    assert_eq!(spoken.last().map(String::as_str), Some("Goodbye!"));
    assert!(journal.recorded().is_empty());
}

#[tokio::test]
async fn notes_survive_the_turn_that_saved_them() {
    let notes = RecordingNotes::default();
    let speaker = RecordingSpeaker::default();
    let (_shutdown_tx, shutdown_rx) = mpsc::channel(1);

    Session::new(
        generator(notes.clone(), RecordingLauncher::default()),
        Box::new(ScriptedTranscriber::new(vec![
            Heard::Utterance("Save Note Buy Milk".to_string()),
            Heard::Utterance("goodbye".to_string()),
        ])),
        Box::new(speaker.clone()),
        Box::new(MemoryJournal::default()),
        shutdown_rx,
    )
    .run()
    .await
    .unwrap();

    // Normalization lower-cases before extraction
    assert_eq!(notes.texts(), vec!["buy milk".to_string()]);
    assert!(speaker.texts()[1].contains("Note saved successfully: buy milk"));
}
