//! Text-to-speech (TTS) processing

use crate::config::ApiKeys;
use crate::{Error, Result};

/// TTS provider backend, keyed off the configured model string
#[derive(Clone, Debug)]
enum TtsProvider {
    /// `OpenAI` speech API (e.g. "tts-1")
    OpenAi { model: String },
    /// ElevenLabs (configured as "elevenlabs/<model>", voice is a voice id)
    ElevenLabs { model: String },
}

/// Synthesizes speech from text
pub struct TextToSpeech {
    client: reqwest::Client,
    api_key: String,
    voice: String,
    speed: f32,
    provider: TtsProvider,
}

impl TextToSpeech {
    /// Create a TTS client from the configured model string
    ///
    /// An `elevenlabs/` prefix selects ElevenLabs (with `voice` holding the
    /// voice id); anything else is an `OpenAI` speech model.
    ///
    /// # Errors
    ///
    /// Returns error if the selected provider's API key is missing
    pub fn from_config(model: &str, voice: &str, speed: f32, keys: &ApiKeys) -> Result<Self> {
        if let Some(elevenlabs_model) = model.strip_prefix("elevenlabs/") {
            let api_key = keys.elevenlabs.clone().ok_or_else(|| {
                Error::Config("ELEVENLABS_API_KEY required for ElevenLabs TTS".to_string())
            })?;

            Ok(Self {
                client: reqwest::Client::new(),
                api_key,
                voice: voice.to_string(),
                speed: 1.0, // ElevenLabs does not take a speed parameter
                provider: TtsProvider::ElevenLabs {
                    model: elevenlabs_model.to_string(),
                },
            })
        } else {
            let api_key = keys
                .openai
                .clone()
                .ok_or_else(|| Error::Config("OPENAI_API_KEY required for TTS".to_string()))?;

            Ok(Self {
                client: reqwest::Client::new(),
                api_key,
                voice: voice.to_string(),
                speed,
                provider: TtsProvider::OpenAi {
                    model: model.to_string(),
                },
            })
        }
    }

    /// Synthesize text to MP3 audio bytes
    ///
    /// # Errors
    ///
    /// Returns error if the synthesis request fails
    pub async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        match &self.provider {
            TtsProvider::OpenAi { model } => self.synthesize_openai(text, model).await,
            TtsProvider::ElevenLabs { model } => self.synthesize_elevenlabs(text, model).await,
        }
    }

    async fn synthesize_openai(&self, text: &str, model: &str) -> Result<Vec<u8>> {
        #[derive(serde::Serialize)]
        struct TtsRequest<'a> {
            model: &'a str,
            input: &'a str,
            voice: &'a str,
            speed: f32,
        }

        let request = TtsRequest {
            model,
            input: text,
            voice: &self.voice,
            speed: self.speed,
        };

        let response = self
            .client
            .post("https://api.openai.com/v1/audio/speech")
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Tts(format!("OpenAI TTS error {status}: {body}")));
        }

        let audio = response.bytes().await?;
        Ok(audio.to_vec())
    }

    async fn synthesize_elevenlabs(&self, text: &str, model: &str) -> Result<Vec<u8>> {
        #[derive(serde::Serialize)]
        struct ElevenLabsRequest<'a> {
            text: &'a str,
            model_id: &'a str,
        }

        let url = format!("https://api.elevenlabs.io/v1/text-to-speech/{}", self.voice);

        let request = ElevenLabsRequest {
            text,
            model_id: model,
        };

        let response = self
            .client
            .post(&url)
            .header("xi-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Tts(format!("ElevenLabs TTS error {status}: {body}")));
        }

        let audio = response.bytes().await?;
        Ok(audio.to_vec())
    }
}
