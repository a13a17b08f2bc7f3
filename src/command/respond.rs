//! Response generation
//!
//! Turns a classified intent back into a spoken response. Collaborator
//! failures (note storage, application launch) are caught here and become
//! error-description responses; nothing propagates to the session loop.

use chrono::Local;
use rand::RngCore;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::intent::note_text;
use super::{CommandResult, Intent, Launcher, NoteStore};
use crate::{Result, launcher};

const WEATHER_APOLOGY: &str = "I'm sorry, I don't have access to real-time weather data yet. \
     You can check your weather app or ask me to open it for you.";

const CALL_APOLOGY: &str = "I'm sorry, I cannot make actual phone calls yet. This feature \
     would require integration with your phone system or VoIP service.";

const NOTE_PROMPT: &str = "What would you like me to save as a note?";

const OPEN_PROMPT: &str = "What application would you like me to open?";

const GREETING: &str = "Hello! I'm your personal AI assistant. How can I help you today?";

const FAREWELL: &str = "Goodbye! Have a great day!";

const UNRECOGNIZED: &str = "I'm not sure how to help with that. You can ask me about the time, \
     weather, save notes, open applications, or ask general questions.";

const LOOKUP_DEFLECTION: &str = "That's an interesting question! I'd recommend checking a reliable \
     source like Wikipedia or asking a more specialized AI for detailed information.";

const HOWTO_DEFLECTION: &str = "For step-by-step instructions, I'd suggest searching online or \
     checking tutorial websites. Is there a specific part you'd like help with?";

const GENERIC_DEFLECTION: &str = "That's a thoughtful question! While I can help with basic tasks, \
     you might want to consult specialized resources for detailed information.";

/// The fixed advice pool for "should i" questions
pub const ADVICE: &[&str] = &[
    "Based on what you've told me, I think you should go for it!",
    "It might be worth considering the pros and cons first.",
    "Trust your instincts - you usually know what's best.",
    "Maybe sleep on it and decide tomorrow?",
    "What does your gut feeling tell you?",
];

/// Generates responses for classified utterances
///
/// Owns the side-effecting collaborators and the random source so tests
/// can substitute fakes and a seeded rng.
pub struct ResponseGenerator {
    notes: Box<dyn NoteStore>,
    launcher: Box<dyn Launcher>,
    rng: Box<dyn RngCore + Send>,
}

impl ResponseGenerator {
    /// Create a generator with an entropy-seeded random source
    #[must_use]
    pub fn new(notes: Box<dyn NoteStore>, launcher: Box<dyn Launcher>) -> Self {
        Self::with_rng(notes, launcher, Box::new(StdRng::from_entropy()))
    }

    /// Create a generator with an explicit random source
    #[must_use]
    pub fn with_rng(
        notes: Box<dyn NoteStore>,
        launcher: Box<dyn Launcher>,
        rng: Box<dyn RngCore + Send>,
    ) -> Self {
        Self {
            notes,
            launcher,
            rng,
        }
    }

    /// Produce the response for one utterance
    ///
    /// Never fails: any error raised while generating is converted into an
    /// error-description response with `should_terminate` left false.
    pub fn respond(&mut self, intent: Intent, utterance: &str) -> CommandResult {
        if intent == Intent::Exit {
            return CommandResult::farewell(FAREWELL);
        }

        match self.dispatch(intent, utterance) {
            Ok(text) => CommandResult::reply(text),
            Err(e) => {
                tracing::warn!(error = %e, ?intent, "response generation failed");
                CommandResult::reply(format!(
                    "I encountered an error processing your request: {e}"
                ))
            }
        }
    }

    fn dispatch(&mut self, intent: Intent, utterance: &str) -> Result<String> {
        let text = match intent {
            Intent::QueryTime => current_time(),
            Intent::QueryWeather => WEATHER_APOLOGY.to_string(),
            Intent::SaveNote => self.save_note(utterance),
            Intent::OpenApplication => self.open_application(utterance),
            Intent::PlaceCall => CALL_APOLOGY.to_string(),
            Intent::GeneralQuestion => self.general_question(utterance),
            Intent::Greeting => GREETING.to_string(),
            Intent::Unrecognized => UNRECOGNIZED.to_string(),
            // Handled before dispatch
            Intent::Exit => FAREWELL.to_string(),
        };
        Ok(text)
    }

    fn save_note(&self, utterance: &str) -> String {
        let Some(text) = note_text(utterance).filter(|t| !t.is_empty()) else {
            return NOTE_PROMPT.to_string();
        };

        match self.notes.append(text) {
            Ok(()) => format!("Note saved successfully: {text}"),
            Err(e) => {
                tracing::warn!(error = %e, "note append failed");
                format!("Error saving note: {e}")
            }
        }
    }

    fn open_application(&self, utterance: &str) -> String {
        // Every occurrence of the literal substring goes, not just a prefix
        let stripped = utterance.replace("open", "");
        let name = stripped.trim();

        if name.is_empty() {
            return OPEN_PROMPT.to_string();
        }

        let Some(identifier) = launcher::resolve(name) else {
            return format!(
                "I don't know how to open {name}. You can teach me by updating my application list."
            );
        };

        match self.launcher.launch(identifier) {
            Ok(()) => format!("Opening {name}"),
            Err(e) => {
                tracing::warn!(error = %e, identifier, "application launch failed");
                format!("Error opening application: {e}")
            }
        }
    }

    fn general_question(&mut self, utterance: &str) -> String {
        if utterance.contains("should i") {
            return ADVICE
                .choose(&mut *self.rng)
                .map_or_else(|| GENERIC_DEFLECTION.to_string(), ToString::to_string);
        }

        if utterance.contains("what is") || utterance.contains("what are") {
            LOOKUP_DEFLECTION.to_string()
        } else if utterance.contains("how to") || utterance.contains("how do") {
            HOWTO_DEFLECTION.to_string()
        } else {
            GENERIC_DEFLECTION.to_string()
        }
    }
}

/// Current local time, phrased for speech
fn current_time() -> String {
    let now = Local::now();
    format!(
        "The current time is {}",
        now.format("%I:%M %p on %B %d, %Y")
    )
}
