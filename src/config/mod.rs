//! Configuration management for Valet

pub mod file;

use std::path::PathBuf;

use crate::{Error, Result};

/// Default STT model (OpenAI Whisper)
const DEFAULT_STT_MODEL: &str = "whisper-1";

/// Default TTS model (OpenAI)
const DEFAULT_TTS_MODEL: &str = "tts-1";

/// Default TTS voice
const DEFAULT_TTS_VOICE: &str = "alloy";

/// Default Firestore collection for interaction logs
const DEFAULT_LOG_COLLECTION: &str = "assistantLogs";

/// Valet configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to data directory (database, service account key)
    pub data_dir: PathBuf,

    /// Voice configuration
    pub voice: VoiceConfig,

    /// API keys
    pub api_keys: ApiKeys,

    /// Interaction journal configuration
    pub journal: JournalConfig,
}

/// Voice processing configuration
#[derive(Debug, Clone)]
pub struct VoiceConfig {
    /// Voice input/output enabled (false = text mode)
    pub enabled: bool,

    /// STT model ("whisper-1" or "deepgram/<model>")
    pub stt_model: String,

    /// TTS model ("tts-1" or "elevenlabs/<model>")
    pub tts_model: String,

    /// TTS voice identifier
    pub tts_voice: String,

    /// TTS speed multiplier (0.25 to 4.0)
    pub tts_speed: f32,

    /// Seconds to wait for speech to start before giving up a listen
    pub listen_timeout_secs: u64,

    /// Seconds of ambient noise sampled at startup
    pub calibration_secs: u64,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            stt_model: DEFAULT_STT_MODEL.to_string(),
            tts_model: DEFAULT_TTS_MODEL.to_string(),
            tts_voice: DEFAULT_TTS_VOICE.to_string(),
            tts_speed: 1.0,
            listen_timeout_secs: 5,
            calibration_secs: 1,
        }
    }
}

/// API keys for external services
#[derive(Debug, Clone, Default)]
pub struct ApiKeys {
    /// `OpenAI` API key (Whisper STT and TTS)
    pub openai: Option<String>,

    /// `ElevenLabs` API key (optional TTS)
    pub elevenlabs: Option<String>,

    /// `Deepgram` API key (optional STT)
    pub deepgram: Option<String>,
}

/// Interaction journal configuration
#[derive(Debug, Clone, Default)]
pub struct JournalConfig {
    /// Path to the Google service account key; `None` disables logging
    pub service_account_path: Option<PathBuf>,

    /// Firestore collection name
    pub collection: String,
}

impl Config {
    /// Load configuration: env vars over the config file over defaults
    ///
    /// # Errors
    ///
    /// Returns error if no data directory can be determined
    pub fn load(text_mode: bool) -> Result<Self> {
        let fc = file::load_config_file();

        let data_dir = std::env::var("VALET_DATA_DIR").map_or_else(
            |_| default_data_dir(),
            |dir| Ok(PathBuf::from(dir)),
        )?;
        std::fs::create_dir_all(&data_dir)?;

        let api_keys = ApiKeys {
            openai: std::env::var("OPENAI_API_KEY").ok().or(fc.api_keys.openai),
            elevenlabs: std::env::var("ELEVENLABS_API_KEY")
                .ok()
                .or(fc.api_keys.elevenlabs),
            deepgram: std::env::var("DEEPGRAM_API_KEY")
                .ok()
                .or(fc.api_keys.deepgram),
        };

        let defaults = VoiceConfig::default();
        let voice = VoiceConfig {
            enabled: !text_mode && fc.voice.enabled.unwrap_or(defaults.enabled),
            stt_model: fc.voice.stt_model.unwrap_or(defaults.stt_model),
            tts_model: fc.voice.tts_model.unwrap_or(defaults.tts_model),
            tts_voice: fc.voice.tts_voice.unwrap_or(defaults.tts_voice),
            tts_speed: fc.voice.tts_speed.unwrap_or(defaults.tts_speed),
            listen_timeout_secs: fc
                .voice
                .listen_timeout_secs
                .unwrap_or(defaults.listen_timeout_secs),
            calibration_secs: fc
                .voice
                .calibration_secs
                .unwrap_or(defaults.calibration_secs),
        };

        let journal = JournalConfig {
            service_account_path: resolve_service_account(&data_dir, fc.journal.service_account),
            collection: fc
                .journal
                .collection
                .unwrap_or_else(|| DEFAULT_LOG_COLLECTION.to_string()),
        };

        Ok(Self {
            data_dir,
            voice,
            api_keys,
            journal,
        })
    }

    /// Path to the assistant's `SQLite` database
    #[must_use]
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("valet.db")
    }
}

/// Service account resolution: env var, config file, then the
/// conventional key location in the data directory
fn resolve_service_account(data_dir: &std::path::Path, configured: Option<String>) -> Option<PathBuf> {
    if let Ok(path) = std::env::var("VALET_SERVICE_ACCOUNT") {
        return Some(PathBuf::from(path));
    }

    if let Some(path) = configured {
        return Some(PathBuf::from(path));
    }

    let conventional = data_dir.join("serviceAccountKey.json");
    conventional.exists().then_some(conventional)
}

/// Default data directory (e.g. `~/.local/share/valet`)
fn default_data_dir() -> Result<PathBuf> {
    directories::ProjectDirs::from("", "", "valet")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| Error::Config("could not determine data directory".to_string()))
}
