//! # Waveform Synthesis Module
//!
//! This module converts a requested repelling frequency into a raw PCM
//! sample buffer. It is a pure function of its inputs: no storage, no
//! playback, no hidden state.
//!
//! ## Features
//! - Half-amplitude sine synthesis to avoid clipping
//! - Fixed 44.1 kHz sample rate (CD quality)
//! - Bit-exact reproducibility for identical inputs
//! - Input validation for non-positive frequency or duration

use crate::error::{Error, Result};

/// Sample rate used for every synthesized tone, in Hz.
///
/// Tone assets are always materialized at this rate; the playback seam
/// falls back to the device default only when the hardware cannot open
/// a stream at 44.1 kHz.
pub const SAMPLE_RATE: u32 = 44100;

/// Peak amplitude factor applied to the sine wave.
///
/// Half scale keeps the signal well clear of 16-bit clipping even after
/// rounding, so every sample lands in [-16384, 16384].
const AMPLITUDE: f64 = 0.5;

/// Synthesizes a mono sine tone at the given frequency.
///
/// The sample at time `t` is `round(32767 * 0.5 * sin(2π * f_hz * t))`,
/// where `f_hz` is the requested frequency converted from kHz. Phase is
/// accumulated in f64 so the buffer is reproducible bit-for-bit across
/// calls and platforms.
///
/// # Arguments
/// * `frequency_khz` - Tone frequency in kilohertz (must be > 0)
/// * `duration_seconds` - Tone length in seconds (must be > 0)
///
/// # Returns
/// * `Ok(samples)` - Signed 16-bit sample buffer, `round(44100 * duration)` entries
/// * `Err(Error::InvalidParameter)` - Non-positive frequency/duration, or a
///   duration so short the sample count rounds to zero
pub fn synthesize(frequency_khz: f32, duration_seconds: f32) -> Result<Vec<i16>> {
    if !(frequency_khz > 0.0) {
        return Err(Error::InvalidParameter(format!(
            "frequency must be positive, got {frequency_khz} kHz"
        )));
    }
    if !(duration_seconds > 0.0) {
        return Err(Error::InvalidParameter(format!(
            "duration must be positive, got {duration_seconds} s"
        )));
    }

    let sample_count = (SAMPLE_RATE as f64 * duration_seconds as f64).round() as usize;
    if sample_count == 0 {
        return Err(Error::InvalidParameter(format!(
            "duration {duration_seconds} s rounds to zero samples"
        )));
    }

    let frequency_hz = frequency_khz as f64 * 1000.0;
    let omega = 2.0 * std::f64::consts::PI * frequency_hz;

    let samples = (0..sample_count)
        .map(|i| {
            let t = i as f64 / SAMPLE_RATE as f64;
            (32767.0 * AMPLITUDE * (omega * t).sin()).round() as i16
        })
        .collect();

    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_inputs_yield_identical_buffers() {
        let a = synthesize(25.0, 1.0).unwrap();
        let b = synthesize(25.0, 1.0).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn sample_count_matches_rate_times_duration() {
        assert_eq!(synthesize(25.0, 1.0).unwrap().len(), 44100);
        assert_eq!(synthesize(40.0, 0.5).unwrap().len(), 22050);
        assert_eq!(synthesize(42.0, 1.5).unwrap().len(), 66150);
    }

    #[test]
    fn samples_stay_within_half_scale() {
        let samples = synthesize(19.5, 1.0).unwrap();
        assert!(samples.iter().all(|&s| (-16384..=16384).contains(&(s as i32))));
    }

    #[test]
    fn rejects_non_positive_frequency() {
        assert!(matches!(
            synthesize(0.0, 1.0),
            Err(Error::InvalidParameter(_))
        ));
        assert!(matches!(
            synthesize(-5.0, 1.0),
            Err(Error::InvalidParameter(_))
        ));
    }

    #[test]
    fn rejects_non_positive_duration() {
        assert!(matches!(
            synthesize(25.0, 0.0),
            Err(Error::InvalidParameter(_))
        ));
        assert!(matches!(
            synthesize(25.0, -1.0),
            Err(Error::InvalidParameter(_))
        ));
    }

    #[test]
    fn rejects_duration_that_rounds_to_zero_samples() {
        assert!(matches!(
            synthesize(25.0, 1.0e-6),
            Err(Error::InvalidParameter(_))
        ));
    }

    #[test]
    fn first_sample_is_silence() {
        // sin(0) == 0, so every tone starts at a zero crossing.
        let samples = synthesize(25.0, 0.1).unwrap();
        assert_eq!(samples[0], 0);
    }
}
