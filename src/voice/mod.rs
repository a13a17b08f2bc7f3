//! Voice processing module
//!
//! Microphone capture, utterance segmentation, and playback, glued to the
//! hosted STT/TTS services to implement the session's transcriber and
//! speaker collaborators.

mod capture;
mod playback;
mod segment;
mod stt;
mod tts;

pub use capture::{MicCapture, SAMPLE_RATE, samples_to_wav};
pub use playback::AudioPlayback;
pub use segment::{DEFAULT_ENERGY_THRESHOLD, Segmenter, SegmenterState, rms};
pub use stt::SpeechToText;
pub use tts::TextToSpeech;

use std::time::{Duration, Instant};

use crate::config::{ApiKeys, VoiceConfig};
use crate::session::{Heard, Speaker, Transcriber};
use crate::Result;

/// How often the listen loop drains the capture buffer
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Microphone-backed transcriber: capture -> segment -> STT
pub struct VoiceTranscriber {
    capture: MicCapture,
    segmenter: Segmenter,
    stt: SpeechToText,
    listen_window: Duration,
}

impl VoiceTranscriber {
    /// Open the microphone, calibrate against ambient noise, and connect
    /// the transcription service
    ///
    /// # Errors
    ///
    /// Returns error if the microphone cannot be opened or the STT
    /// provider is not configured
    pub async fn new(voice: &VoiceConfig, keys: &ApiKeys) -> Result<Self> {
        let stt = SpeechToText::from_config(&voice.stt_model, keys)?;

        let mut capture = MicCapture::new()?;
        capture.start()?;

        tracing::info!("adjusting for ambient noise");
        capture.clear_buffer();
        tokio::time::sleep(Duration::from_secs(voice.calibration_secs)).await;

        let ambient = capture.take_buffer();
        let threshold = Segmenter::threshold_from_noise_floor(rms(&ambient));
        tracing::info!(threshold = %threshold, "calibration complete, ready to listen");

        Ok(Self {
            capture,
            segmenter: Segmenter::with_threshold(threshold),
            stt,
            listen_window: Duration::from_secs(voice.listen_timeout_secs),
        })
    }

    async fn transcribe_segment(&self, speech: &[f32]) -> Heard {
        let wav = match samples_to_wav(speech, SAMPLE_RATE) {
            Ok(wav) => wav,
            Err(e) => {
                tracing::error!(error = %e, "WAV encoding failed");
                return Heard::ServiceError;
            }
        };

        match self.stt.transcribe(&wav).await {
            Ok(text) if text.trim().is_empty() => Heard::Unintelligible,
            Ok(text) => {
                tracing::info!(transcript = %text, "command received");
                Heard::Utterance(text)
            }
            Err(e) => {
                tracing::warn!(error = %e, "transcription failed");
                Heard::ServiceError
            }
        }
    }
}

#[async_trait::async_trait(?Send)]
impl Transcriber for VoiceTranscriber {
    async fn listen(&mut self) -> Heard {
        self.segmenter.reset();
        self.capture.clear_buffer();
        let started = Instant::now();

        loop {
            tokio::time::sleep(POLL_INTERVAL).await;

            let samples = self.capture.take_buffer();
            if self.segmenter.feed(&samples) {
                let speech = self.segmenter.take_segment();
                return self.transcribe_segment(&speech).await;
            }

            // The window bounds waiting for speech to START; once an
            // utterance is underway the segmenter's phrase cap takes over
            if !self.segmenter.is_capturing() && started.elapsed() > self.listen_window {
                return Heard::NoSpeech;
            }
        }
    }
}

/// Speaker-backed response delivery: TTS -> playback
pub struct VoiceSpeaker {
    tts: TextToSpeech,
    playback: AudioPlayback,
}

impl VoiceSpeaker {
    /// Open the output device and connect the synthesis service
    ///
    /// # Errors
    ///
    /// Returns error if the output device cannot be opened or the TTS
    /// provider is not configured
    pub fn new(voice: &VoiceConfig, keys: &ApiKeys) -> Result<Self> {
        let tts = TextToSpeech::from_config(&voice.tts_model, &voice.tts_voice, voice.tts_speed, keys)?;
        let playback = AudioPlayback::new()?;

        Ok(Self { tts, playback })
    }
}

#[async_trait::async_trait(?Send)]
impl Speaker for VoiceSpeaker {
    async fn speak(&mut self, text: &str) -> Result<()> {
        println!("Assistant: {text}");

        let audio = self.tts.synthesize(text).await?;
        self.playback.play_mp3(&audio).await
    }
}
