//! Speech-to-text (STT) processing

use crate::config::ApiKeys;
use crate::{Error, Result};

/// Response from OpenAI Whisper transcription API
#[derive(serde::Deserialize)]
struct WhisperResponse {
    text: String,
}

/// Response from Deepgram transcription API
#[derive(serde::Deserialize)]
struct DeepgramResponse {
    results: DeepgramResults,
}

#[derive(serde::Deserialize)]
struct DeepgramResults {
    channels: Vec<DeepgramChannel>,
}

#[derive(serde::Deserialize)]
struct DeepgramChannel {
    alternatives: Vec<DeepgramAlternative>,
}

#[derive(serde::Deserialize)]
struct DeepgramAlternative {
    transcript: String,
}

/// STT provider backend, keyed off the configured model string
#[derive(Clone, Debug)]
enum SttProvider {
    /// `OpenAI` Whisper (e.g. "whisper-1")
    Whisper { model: String },
    /// Deepgram (configured as "deepgram/<model>")
    Deepgram { model: String },
}

/// Transcribes speech to text
pub struct SpeechToText {
    client: reqwest::Client,
    api_key: String,
    provider: SttProvider,
}

impl SpeechToText {
    /// Create an STT client from the configured model string
    ///
    /// A `deepgram/` prefix selects Deepgram; anything else is treated as
    /// an `OpenAI` Whisper model.
    ///
    /// # Errors
    ///
    /// Returns error if the selected provider's API key is missing
    pub fn from_config(model: &str, keys: &ApiKeys) -> Result<Self> {
        if let Some(deepgram_model) = model.strip_prefix("deepgram/") {
            let api_key = keys
                .deepgram
                .clone()
                .ok_or_else(|| Error::Config("DEEPGRAM_API_KEY required for Deepgram STT".to_string()))?;

            Ok(Self {
                client: reqwest::Client::new(),
                api_key,
                provider: SttProvider::Deepgram {
                    model: deepgram_model.to_string(),
                },
            })
        } else {
            let api_key = keys
                .openai
                .clone()
                .ok_or_else(|| Error::Config("OPENAI_API_KEY required for Whisper STT".to_string()))?;

            Ok(Self {
                client: reqwest::Client::new(),
                api_key,
                provider: SttProvider::Whisper {
                    model: model.to_string(),
                },
            })
        }
    }

    /// Transcribe WAV audio bytes to text
    ///
    /// # Errors
    ///
    /// Returns error if the transcription request fails
    pub async fn transcribe(&self, audio: &[u8]) -> Result<String> {
        match &self.provider {
            SttProvider::Whisper { model } => self.transcribe_whisper(audio, model).await,
            SttProvider::Deepgram { model } => self.transcribe_deepgram(audio, model).await,
        }
    }

    async fn transcribe_whisper(&self, audio: &[u8], model: &str) -> Result<String> {
        tracing::debug!(audio_bytes = audio.len(), "starting Whisper transcription");

        let form = reqwest::multipart::Form::new()
            .part(
                "file",
                reqwest::multipart::Part::bytes(audio.to_vec())
                    .file_name("audio.wav")
                    .mime_str("audio/wav")
                    .map_err(|e| Error::Stt(e.to_string()))?,
            )
            .text("model", model.to_string());

        let response = self
            .client
            .post("https://api.openai.com/v1/audio/transcriptions")
            .header("Authorization", format!("Bearer {}", self.api_key))
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Stt(format!("Whisper API error {status}: {body}")));
        }

        let result: WhisperResponse = response.json().await?;

        tracing::info!(transcript = %result.text, "transcription complete");
        Ok(result.text)
    }

    async fn transcribe_deepgram(&self, audio: &[u8], model: &str) -> Result<String> {
        tracing::debug!(audio_bytes = audio.len(), "starting Deepgram transcription");

        let url = format!("https://api.deepgram.com/v1/listen?model={model}&punctuate=true");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Token {}", self.api_key))
            .header("Content-Type", "audio/wav")
            .body(audio.to_vec())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Stt(format!("Deepgram API error {status}: {body}")));
        }

        let result: DeepgramResponse = response.json().await?;

        let transcript = result
            .results
            .channels
            .first()
            .and_then(|c| c.alternatives.first())
            .map(|a| a.transcript.clone())
            .unwrap_or_default();

        tracing::info!(transcript = %transcript, "transcription complete");
        Ok(transcript)
    }
}
