//! TOML configuration file loading
//!
//! Supports `~/.config/valet/config.toml` as a persistent config source.
//! All fields are optional — the file is a partial overlay on top of
//! defaults, and env vars override both.

use std::path::PathBuf;

use serde::Deserialize;

/// Top-level TOML configuration file schema
#[derive(Debug, Default, Deserialize)]
pub struct ValetConfigFile {
    /// Voice/audio configuration
    #[serde(default)]
    pub voice: VoiceFileConfig,

    /// API keys for external services
    #[serde(default)]
    pub api_keys: ApiKeysFileConfig,

    /// Interaction journal configuration
    #[serde(default)]
    pub journal: JournalFileConfig,
}

/// Voice processing configuration
#[derive(Debug, Default, Deserialize)]
pub struct VoiceFileConfig {
    /// Enable voice input/output
    pub enabled: Option<bool>,

    /// STT model (e.g. "whisper-1", "deepgram/nova-2")
    pub stt_model: Option<String>,

    /// TTS model (e.g. "tts-1", "elevenlabs/eleven_monolingual_v1")
    pub tts_model: Option<String>,

    /// TTS voice identifier (e.g. "alloy")
    pub tts_voice: Option<String>,

    /// TTS speed multiplier
    pub tts_speed: Option<f32>,

    /// Seconds to wait for speech to start
    pub listen_timeout_secs: Option<u64>,

    /// Seconds of ambient noise sampled at startup
    pub calibration_secs: Option<u64>,
}

/// API keys configuration
#[derive(Debug, Default, Deserialize)]
pub struct ApiKeysFileConfig {
    pub openai: Option<String>,
    pub elevenlabs: Option<String>,
    pub deepgram: Option<String>,
}

/// Interaction journal configuration
#[derive(Debug, Default, Deserialize)]
pub struct JournalFileConfig {
    /// Path to the Google service account key file
    pub service_account: Option<String>,

    /// Firestore collection name
    pub collection: Option<String>,
}

/// Load the TOML config file from the standard path
///
/// Returns `ValetConfigFile::default()` if the file doesn't exist or can't
/// be parsed.
#[must_use]
pub fn load_config_file() -> ValetConfigFile {
    let Some(path) = config_file_path() else {
        return ValetConfigFile::default();
    };

    if !path.exists() {
        return ValetConfigFile::default();
    }

    match std::fs::read_to_string(&path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "loaded config file");
                config
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to parse config file, using defaults"
                );
                ValetConfigFile::default()
            }
        },
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "failed to read config file"
            );
            ValetConfigFile::default()
        }
    }
}

/// Return the config file path: `~/.config/valet/config.toml`
#[must_use]
pub fn config_file_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.config_dir().join("valet").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_partial_file() {
        let content = r#"
            [voice]
            enabled = false
            stt_model = "deepgram/nova-2"

            [api_keys]
            deepgram = "dg-key"

            [journal]
            collection = "assistantLogs"
        "#;

        let config: ValetConfigFile = toml::from_str(content).unwrap();
        assert_eq!(config.voice.enabled, Some(false));
        assert_eq!(config.voice.stt_model.as_deref(), Some("deepgram/nova-2"));
        assert_eq!(config.api_keys.deepgram.as_deref(), Some("dg-key"));
        assert!(config.api_keys.openai.is_none());
        assert_eq!(config.journal.collection.as_deref(), Some("assistantLogs"));
    }

    #[test]
    fn test_parse_empty_file() {
        let config: ValetConfigFile = toml::from_str("").unwrap();
        assert!(config.voice.enabled.is_none());
        assert!(config.journal.service_account.is_none());
    }
}
