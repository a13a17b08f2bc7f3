//! Voice pipeline tests
//!
//! Tests segmentation and WAV encoding without audio hardware.

use std::io::Cursor;

use valet::voice::{
    DEFAULT_ENERGY_THRESHOLD, SAMPLE_RATE, Segmenter, SegmenterState, rms, samples_to_wav,
};

mod common;

/// Generate sine wave audio samples
#[allow(clippy::cast_precision_loss, clippy::cast_sign_loss, clippy::cast_possible_truncation)]
fn sine(frequency: f32, duration_secs: f32, amplitude: f32) -> Vec<f32> {
    let num_samples = (SAMPLE_RATE as f32 * duration_secs) as usize;
    (0..num_samples)
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE as f32;
            amplitude * (2.0 * std::f32::consts::PI * frequency * t).sin()
        })
        .collect()
}

/// Generate silence
#[allow(clippy::cast_precision_loss, clippy::cast_sign_loss, clippy::cast_possible_truncation)]
fn silence(duration_secs: f32) -> Vec<f32> {
    vec![0.0; (SAMPLE_RATE as f32 * duration_secs) as usize]
}

#[test]
fn segmenter_starts_waiting() {
    let segmenter = Segmenter::new();
    assert_eq!(segmenter.state(), SegmenterState::Waiting);
    assert!(!segmenter.is_capturing());
}

#[test]
fn silence_does_not_start_a_segment() {
    let mut segmenter = Segmenter::new();
    assert!(!segmenter.feed(&silence(0.5)));
    assert_eq!(segmenter.state(), SegmenterState::Waiting);
}

#[test]
fn speech_then_silence_completes_an_utterance() {
    let mut segmenter = Segmenter::new();

    // Speech starts capturing
    assert!(!segmenter.feed(&sine(440.0, 0.5, 0.3)));
    assert!(segmenter.is_capturing());

    // Trailing silence ends the utterance
    assert!(segmenter.feed(&silence(0.6)));

    let segment = segmenter.take_segment();
    assert!(!segment.is_empty());
    assert_eq!(segmenter.state(), SegmenterState::Waiting);
}

#[test]
fn short_blip_is_discarded() {
    let mut segmenter = Segmenter::new();

    // 0.1s of speech is below the minimum utterance length
    segmenter.feed(&sine(440.0, 0.1, 0.3));
    let complete = segmenter.feed(&silence(0.6));

    assert!(!complete);
    assert_eq!(segmenter.state(), SegmenterState::Waiting);
}

#[test]
fn phrase_cap_force_completes() {
    let mut segmenter = Segmenter::new();

    // Continuous speech with no silence still terminates at the cap
    let mut complete = false;
    for _ in 0..12 {
        if segmenter.feed(&sine(440.0, 1.0, 0.3)) {
            complete = true;
            break;
        }
    }

    assert!(complete);
    let segment = segmenter.take_segment();
    assert!(segment.len() >= SAMPLE_RATE as usize * 10);
}

#[test]
fn segment_accumulates_across_feeds() {
    let mut segmenter = Segmenter::new();

    let chunk1 = sine(440.0, 0.2, 0.3);
    let chunk2 = sine(440.0, 0.2, 0.3);
    segmenter.feed(&chunk1);
    segmenter.feed(&chunk2);

    assert_eq!(segmenter.take_segment().len(), chunk1.len() + chunk2.len());
}

#[test]
fn reset_drops_partial_segment() {
    let mut segmenter = Segmenter::new();

    segmenter.feed(&sine(440.0, 0.5, 0.3));
    assert!(segmenter.is_capturing());

    segmenter.reset();
    assert_eq!(segmenter.state(), SegmenterState::Waiting);
    assert!(segmenter.take_segment().is_empty());
}

#[test]
fn calibrated_threshold_rises_with_noise() {
    let quiet = Segmenter::threshold_from_noise_floor(0.001);
    let noisy = Segmenter::threshold_from_noise_floor(0.2);

    assert!((quiet - DEFAULT_ENERGY_THRESHOLD).abs() < f32::EPSILON);
    assert!(noisy > 0.2);

    // A segmenter calibrated for a noisy room ignores that noise level
    let mut segmenter = Segmenter::with_threshold(noisy);
    assert!(!segmenter.feed(&sine(440.0, 0.5, 0.15)));
    assert_eq!(segmenter.state(), SegmenterState::Waiting);
}

#[test]
fn rms_scales_with_amplitude() {
    assert!(rms(&silence(0.1)) < 0.001);
    assert!(rms(&sine(440.0, 0.1, 0.5)) > 0.3);
}

#[test]
fn wav_encoding_has_riff_header() {
    let samples = sine(440.0, 0.1, 0.5);
    let wav = samples_to_wav(&samples, SAMPLE_RATE).unwrap();

    assert_eq!(&wav[0..4], b"RIFF");
    assert_eq!(&wav[8..12], b"WAVE");
    assert!(wav.len() > 44);
}

#[test]
fn wav_round_trip_preserves_shape() {
    let original: Vec<f32> = vec![0.0, 0.5, -0.5, 1.0, -1.0, 0.25];
    let wav = samples_to_wav(&original, SAMPLE_RATE).unwrap();

    let mut reader = hound::WavReader::new(Cursor::new(wav)).unwrap();
    let spec = reader.spec();
    assert_eq!(spec.sample_rate, SAMPLE_RATE);
    assert_eq!(spec.channels, 1);

    let read: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
    assert_eq!(read.len(), original.len());
}
