//! Utterance segmentation
//!
//! Cuts the microphone stream into single utterances by energy: speech
//! starts when the signal rises above the calibrated noise floor, and the
//! utterance ends after a run of trailing silence (or at the phrase length
//! cap). There is no wake word; every segment is treated as a command.

/// Default energy threshold when no calibration has run
pub const DEFAULT_ENERGY_THRESHOLD: f32 = 0.03;

/// Minimum speech length for a usable utterance (0.3s at 16kHz)
const MIN_SPEECH_SAMPLES: usize = 4800;

/// Trailing silence that ends an utterance (0.5s at 16kHz)
const TRAILING_SILENCE_SAMPLES: usize = 8000;

/// Phrase length cap (10s at 16kHz)
const MAX_UTTERANCE_SAMPLES: usize = 160_000;

/// State of the segmenter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmenterState {
    /// Waiting for speech to start
    Waiting,
    /// Accumulating an utterance
    Capturing,
}

/// Energy-based utterance segmenter
pub struct Segmenter {
    threshold: f32,
    state: SegmenterState,
    segment: Vec<f32>,
    speech_len: usize,
    silence_run: usize,
}

impl Segmenter {
    /// Create a segmenter with the default threshold
    #[must_use]
    pub const fn new() -> Self {
        Self::with_threshold(DEFAULT_ENERGY_THRESHOLD)
    }

    /// Create a segmenter with a calibrated threshold
    #[must_use]
    pub const fn with_threshold(threshold: f32) -> Self {
        Self {
            threshold,
            state: SegmenterState::Waiting,
            segment: Vec::new(),
            speech_len: 0,
            silence_run: 0,
        }
    }

    /// Derive a threshold from a measured ambient noise floor
    ///
    /// The floor is scaled up with a small absolute margin so room tone
    /// stays below it; the default threshold acts as a lower bound.
    #[must_use]
    pub fn threshold_from_noise_floor(floor: f32) -> f32 {
        (floor * 1.5 + 0.01).max(DEFAULT_ENERGY_THRESHOLD)
    }

    /// Feed captured samples; returns true when an utterance is complete
    pub fn feed(&mut self, samples: &[f32]) -> bool {
        if samples.is_empty() {
            return false;
        }

        let is_speech = rms(samples) > self.threshold;

        match self.state {
            SegmenterState::Waiting => {
                if is_speech {
                    self.state = SegmenterState::Capturing;
                    self.segment.clear();
                    self.segment.extend_from_slice(samples);
                    self.speech_len = samples.len();
                    self.silence_run = 0;
                    tracing::trace!("speech started");
                }
            }
            SegmenterState::Capturing => {
                self.segment.extend_from_slice(samples);

                if is_speech {
                    self.speech_len += samples.len();
                    self.silence_run = 0;
                } else {
                    self.silence_run += samples.len();
                }

                if self.segment.len() >= MAX_UTTERANCE_SAMPLES {
                    tracing::debug!(samples = self.segment.len(), "phrase limit reached");
                    return true;
                }

                if self.silence_run > TRAILING_SILENCE_SAMPLES {
                    // Length gate counts speech only, not the trailing silence
                    if self.speech_len > MIN_SPEECH_SAMPLES {
                        tracing::debug!(samples = self.segment.len(), "utterance complete");
                        return true;
                    }
                    // Too short to transcribe, likely a pop or door slam
                    tracing::trace!("segment too short, discarding");
                    self.reset();
                }
            }
        }

        false
    }

    /// Take the completed segment, resetting the segmenter
    pub fn take_segment(&mut self) -> Vec<f32> {
        let segment = std::mem::take(&mut self.segment);
        self.reset();
        segment
    }

    /// Whether an utterance is currently being accumulated
    #[must_use]
    pub fn is_capturing(&self) -> bool {
        self.state == SegmenterState::Capturing
    }

    /// Current state
    #[must_use]
    pub const fn state(&self) -> SegmenterState {
        self.state
    }

    /// Return to the waiting state, dropping any partial segment
    pub fn reset(&mut self) {
        self.state = SegmenterState::Waiting;
        self.segment.clear();
        self.speech_len = 0;
        self.silence_run = 0;
    }
}

impl Default for Segmenter {
    fn default() -> Self {
        Self::new()
    }
}

/// RMS energy of audio samples
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }

    let sum_squares: f32 = samples.iter().map(|s| s * s).sum();
    (sum_squares / samples.len() as f32).sqrt()
}
