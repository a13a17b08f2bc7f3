//! Intent classification
//!
//! An ordered list of keyword rules, evaluated first-match-wins. The order
//! is the tie-break policy: an utterance containing both "time" and
//! "weather" is a time query because the time rule comes first. The same
//! holds for the stranger combinations ("open the phone app" launches an
//! application, it never dials) and is deliberate.

/// Category of a spoken command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    /// "what time is it"
    QueryTime,
    /// "how's the weather"
    QueryWeather,
    /// "save note ..." / "take note ..."
    SaveNote,
    /// "open <application>"
    OpenApplication,
    /// "call mom"
    PlaceCall,
    /// what/how/why/should-i questions
    GeneralQuestion,
    /// "hello", "good morning"
    Greeting,
    /// "goodbye", "stop"
    Exit,
    /// Anything else
    Unrecognized,
}

const TIME_WORDS: &[&str] = &["time", "clock", "what time"];
const WEATHER_WORDS: &[&str] = &["weather", "temperature", "forecast"];
const NOTE_MARKERS: &[&str] = &["save note", "take note"];
const CALL_WORDS: &[&str] = &["call", "phone"];
const QUESTION_WORDS: &[&str] = &[
    "what",
    "how",
    "why",
    "when",
    "where",
    "should i",
    "help me decide",
];
const GREETING_WORDS: &[&str] = &[
    "hello",
    "hi",
    "hey",
    "good morning",
    "good afternoon",
    "good evening",
];
const EXIT_WORDS: &[&str] = &["goodbye", "bye", "exit", "quit", "stop"];

/// One classification rule: predicate plus the intent it selects
struct Rule {
    matches: fn(&str) -> bool,
    intent: Intent,
}

/// Rules in priority order. Evaluation stops at the first match.
const RULES: &[Rule] = &[
    Rule {
        matches: |u| contains_any(u, TIME_WORDS),
        intent: Intent::QueryTime,
    },
    Rule {
        matches: |u| contains_any(u, WEATHER_WORDS),
        intent: Intent::QueryWeather,
    },
    Rule {
        matches: |u| contains_any(u, NOTE_MARKERS),
        intent: Intent::SaveNote,
    },
    Rule {
        matches: |u| u.contains("open"),
        intent: Intent::OpenApplication,
    },
    Rule {
        matches: |u| contains_any(u, CALL_WORDS),
        intent: Intent::PlaceCall,
    },
    Rule {
        matches: |u| contains_any(u, QUESTION_WORDS),
        intent: Intent::GeneralQuestion,
    },
    Rule {
        matches: |u| contains_any(u, GREETING_WORDS),
        intent: Intent::Greeting,
    },
    Rule {
        matches: |u| contains_any(u, EXIT_WORDS),
        intent: Intent::Exit,
    },
];

/// Classify a normalized utterance
///
/// Total over all strings: every input maps to exactly one intent, with
/// [`Intent::Unrecognized`] as the fallback.
#[must_use]
pub fn classify(utterance: &str) -> Intent {
    RULES
        .iter()
        .find(|rule| (rule.matches)(utterance))
        .map_or(Intent::Unrecognized, |rule| rule.intent)
}

/// Normalize a raw transcript into an utterance (lower-cased, trimmed)
#[must_use]
pub fn normalize(raw: &str) -> String {
    raw.to_lowercase().trim().to_string()
}

/// Whether the utterance contains an exit keyword
///
/// The session loop checks this on the raw utterance independently of the
/// classified intent, so "open the exit door" still ends the session after
/// the application response.
#[must_use]
pub fn is_exit_phrase(utterance: &str) -> bool {
    contains_any(utterance, EXIT_WORDS)
}

/// Text of a note command: everything after the first note marker
pub(crate) fn note_text(utterance: &str) -> Option<&str> {
    NOTE_MARKERS.iter().find_map(|marker| {
        utterance
            .find(marker)
            .map(|pos| utterance[pos + marker.len()..].trim())
    })
}

fn contains_any(utterance: &str, words: &[&str]) -> bool {
    words.iter().any(|w| utterance.contains(w))
}
