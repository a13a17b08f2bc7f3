//! Interactive first-run setup wizard (`valet setup`)

use std::path::PathBuf;

use dialoguer::{Confirm, Input};

use crate::config::file::{
    ApiKeysFileConfig, JournalFileConfig, ValetConfigFile, VoiceFileConfig, load_config_file,
};

/// Run the interactive setup wizard
///
/// # Errors
///
/// Returns error if user input fails or the config cannot be written
pub fn run_setup() -> anyhow::Result<()> {
    println!("Valet Setup\n");

    let existing = load_config_file();
    let config_path = crate::config::file::config_file_path()
        .unwrap_or_else(|| PathBuf::from("~/.config/valet/config.toml"));

    if config_path.exists() {
        println!("Existing config found at {}\n", config_path.display());
    }

    // 1. Voice mode
    let voice_enabled = Confirm::new()
        .with_prompt("Enable voice input/output? (requires a microphone and speakers)")
        .default(existing.voice.enabled.unwrap_or(true))
        .interact()?;

    // 2. API keys
    let mut api_keys = ApiKeysFileConfig {
        openai: existing.api_keys.openai,
        elevenlabs: existing.api_keys.elevenlabs,
        deepgram: existing.api_keys.deepgram,
    };

    if voice_enabled {
        let openai: String = Input::new()
            .with_prompt(prompt_with_existing(
                "OpenAI API key (Whisper STT + TTS)",
                api_keys.openai.as_deref(),
            ))
            .allow_empty(true)
            .interact_text()?;
        if !openai.is_empty() {
            api_keys.openai = Some(openai);
        }

        let elevenlabs: String = Input::new()
            .with_prompt(prompt_with_existing(
                "ElevenLabs API key (optional, for elevenlabs/* TTS models)",
                api_keys.elevenlabs.as_deref(),
            ))
            .allow_empty(true)
            .interact_text()?;
        if !elevenlabs.is_empty() {
            api_keys.elevenlabs = Some(elevenlabs);
        }

        let deepgram: String = Input::new()
            .with_prompt(prompt_with_existing(
                "Deepgram API key (optional, for deepgram/* STT models)",
                api_keys.deepgram.as_deref(),
            ))
            .allow_empty(true)
            .interact_text()?;
        if !deepgram.is_empty() {
            api_keys.deepgram = Some(deepgram);
        }
    }

    // 3. Firestore journal
    let enable_journal = Confirm::new()
        .with_prompt("Log interactions to Firestore?")
        .default(existing.journal.service_account.is_some())
        .interact()?;

    let journal = if enable_journal {
        let service_account: String = Input::new()
            .with_prompt(prompt_with_existing(
                "Path to the service account key file",
                existing.journal.service_account.as_deref(),
            ))
            .allow_empty(true)
            .interact_text()?;

        JournalFileConfig {
            service_account: if service_account.is_empty() {
                existing.journal.service_account
            } else {
                Some(service_account)
            },
            collection: existing.journal.collection,
        }
    } else {
        JournalFileConfig::default()
    };

    // 4. Build and write config
    let config_file = ValetConfigFile {
        voice: VoiceFileConfig {
            enabled: Some(voice_enabled),
            stt_model: existing.voice.stt_model,
            tts_model: existing.voice.tts_model,
            tts_voice: existing.voice.tts_voice,
            tts_speed: existing.voice.tts_speed,
            listen_timeout_secs: existing.voice.listen_timeout_secs,
            calibration_secs: existing.voice.calibration_secs,
        },
        api_keys,
        journal,
    };

    write_config(&config_path, &config_file)?;
    println!("\nConfig written to {}", config_path.display());
    println!("\nSetup complete! Run `valet -v` to start.");

    Ok(())
}

/// Show a masked hint for an already-configured value
fn prompt_with_existing(label: &str, existing: Option<&str>) -> String {
    existing.map_or_else(
        || label.to_string(),
        |value| {
            let masked = if value.len() > 8 {
                format!("{}...{}", &value[..4], &value[value.len() - 4..])
            } else {
                "****".to_string()
            };
            format!("{label} [{masked}]")
        },
    )
}

/// Serialize and write the config file
fn write_config(path: &PathBuf, config: &ValetConfigFile) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    std::fs::write(path, serialize_config(config))?;
    Ok(())
}

/// Serialize config to a readable TOML string
fn serialize_config(config: &ValetConfigFile) -> String {
    let mut out = String::new();

    // [voice]
    out.push_str("[voice]\n");
    if let Some(enabled) = config.voice.enabled {
        out.push_str(&format!("enabled = {enabled}\n"));
    }
    if let Some(ref m) = config.voice.stt_model {
        out.push_str(&format!("stt_model = \"{m}\"\n"));
    }
    if let Some(ref m) = config.voice.tts_model {
        out.push_str(&format!("tts_model = \"{m}\"\n"));
    }
    if let Some(ref v) = config.voice.tts_voice {
        out.push_str(&format!("tts_voice = \"{v}\"\n"));
    }
    if let Some(s) = config.voice.tts_speed {
        out.push_str(&format!("tts_speed = {s}\n"));
    }
    if let Some(t) = config.voice.listen_timeout_secs {
        out.push_str(&format!("listen_timeout_secs = {t}\n"));
    }
    if let Some(c) = config.voice.calibration_secs {
        out.push_str(&format!("calibration_secs = {c}\n"));
    }
    out.push('\n');

    // [api_keys]
    let ak = &config.api_keys;
    if ak.openai.is_some() || ak.elevenlabs.is_some() || ak.deepgram.is_some() {
        out.push_str("[api_keys]\n");
        for (key, val) in [
            ("openai", &ak.openai),
            ("elevenlabs", &ak.elevenlabs),
            ("deepgram", &ak.deepgram),
        ] {
            if let Some(v) = val {
                out.push_str(&format!("{key} = \"{v}\"\n"));
            }
        }
        out.push('\n');
    }

    // [journal]
    let journal = &config.journal;
    if journal.service_account.is_some() || journal.collection.is_some() {
        out.push_str("[journal]\n");
        if let Some(ref path) = journal.service_account {
            out.push_str(&format!("service_account = \"{path}\"\n"));
        }
        if let Some(ref collection) = journal.collection {
            out.push_str(&format!("collection = \"{collection}\"\n"));
        }
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_round_trips() {
        let config = ValetConfigFile {
            voice: VoiceFileConfig {
                enabled: Some(true),
                stt_model: Some("whisper-1".to_string()),
                tts_model: None,
                tts_voice: Some("alloy".to_string()),
                tts_speed: None,
                listen_timeout_secs: Some(5),
                calibration_secs: None,
            },
            api_keys: ApiKeysFileConfig {
                openai: Some("sk-test".to_string()),
                elevenlabs: None,
                deepgram: None,
            },
            journal: JournalFileConfig {
                service_account: Some("/tmp/key.json".to_string()),
                collection: None,
            },
        };

        let serialized = serialize_config(&config);
        let parsed: ValetConfigFile = toml::from_str(&serialized).unwrap();

        assert_eq!(parsed.voice.enabled, Some(true));
        assert_eq!(parsed.voice.stt_model.as_deref(), Some("whisper-1"));
        assert_eq!(parsed.api_keys.openai.as_deref(), Some("sk-test"));
        assert_eq!(
            parsed.journal.service_account.as_deref(),
            Some("/tmp/key.json")
        );
    }

    #[test]
    fn test_masked_prompt() {
        assert_eq!(prompt_with_existing("Key", None), "Key");
        assert_eq!(
            prompt_with_existing("Key", Some("sk-1234567890abcd")),
            "Key [sk-1...abcd]"
        );
        assert_eq!(prompt_with_existing("Key", Some("short")), "Key [****]");
    }
}
