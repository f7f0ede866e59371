//! # Frequency Safety Scoring Module
//!
//! Pure computations over a current repelling frequency: how effective it
//! is against a pest's tolerance range and how safe it is for human ears.
//! Everything here is recomputed on demand by the caller whenever an input
//! changes; nothing is persisted or cached.
//!
//! ## Features
//! - Gaussian-style effectiveness falloff centered on the optimal frequency
//! - Piecewise-linear safety score across the audible/borderline/ultrasonic bands
//! - Zone classification driving the caller's warning presentation

use crate::error::{Error, Result};
use crate::pest::PestProfile;

/// Frequencies at or below this are considered audible to humans, in kHz.
pub const AUDIBLE_THRESHOLD_KHZ: f32 = 23.0;

/// Frequencies at or above this are considered fully ultrasonic, in kHz.
pub const SAFE_THRESHOLD_KHZ: f32 = 25.0;

/// The pair of global safety thresholds, in kHz.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    /// Upper bound of the human-audible band
    pub audible_khz: f32,
    /// Lower bound of the fully ultrasonic band
    pub safe_khz: f32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            audible_khz: AUDIBLE_THRESHOLD_KHZ,
            safe_khz: SAFE_THRESHOLD_KHZ,
        }
    }
}

/// Classification of a frequency relative to human hearing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    /// At or below the audible threshold
    Audible,
    /// Between the audible and safe thresholds
    Borderline,
    /// Above the safe threshold
    Ultrasonic,
}

impl Zone {
    /// Returns the user-facing warning line for this zone.
    pub fn warning_text(&self) -> &'static str {
        match self {
            Zone::Audible => "May be audible to humans (especially children)",
            Zone::Borderline => "Borderline range - some people may hear this",
            Zone::Ultrasonic => "Ultrasonic - safe for human ears",
        }
    }
}

/// Derived effectiveness/safety snapshot for one frequency against one pest.
///
/// Stateless value recomputed whenever the frequency or range changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SafetyAssessment {
    /// Effectiveness against the pest, 0-100
    pub effectiveness: u8,
    /// Human safety score, 0.0-100.0
    pub safety: f32,
    /// Audibility classification
    pub zone: Zone,
}

impl SafetyAssessment {
    /// Evaluates a frequency against a pest profile and the global thresholds.
    pub fn evaluate(
        current_khz: f32,
        profile: &PestProfile,
        thresholds: Thresholds,
    ) -> Result<Self> {
        Ok(Self {
            effectiveness: effectiveness(
                current_khz,
                profile.min_khz,
                profile.max_khz,
                profile.optimal_khz,
            )?,
            safety: safety_score(current_khz, thresholds.audible_khz, thresholds.safe_khz),
            zone: zone(current_khz, thresholds.audible_khz, thresholds.safe_khz),
        })
    }
}

/// Computes repelling effectiveness for a frequency within a pest's range.
///
/// Models effectiveness as a Gaussian falloff centered on the optimal
/// frequency, normalized by the range size. The falloff factor of 5 is
/// deliberately steep: effectiveness collapses quickly away from the
/// optimal point, favoring precise tuning over broad tolerance.
///
/// A degenerate single-point range (`max == min`) is defined as fully
/// effective.
///
/// # Arguments
/// * `current_khz` - Frequency being evaluated
/// * `min_khz` / `max_khz` - Pest tolerance range bounds
/// * `optimal_khz` - Most effective frequency for the pest
///
/// # Returns
/// * `Ok(score)` - Effectiveness truncated to an integer in 0-100
/// * `Err(Error::InvalidRange)` - `max_khz` is below `min_khz`
pub fn effectiveness(current_khz: f32, min_khz: f32, max_khz: f32, optimal_khz: f32) -> Result<u8> {
    if max_khz < min_khz {
        return Err(Error::InvalidRange {
            min: min_khz,
            max: max_khz,
        });
    }

    let range_size = max_khz - min_khz;
    if range_size == 0.0 {
        return Ok(100);
    }

    let position = (current_khz - min_khz) / range_size;
    let optimal_pos = (optimal_khz - min_khz) / range_size;
    let intensity = 100.0 * (-((position - optimal_pos) * 5.0).powi(2)).exp();
    Ok(intensity as u8)
}

/// Computes the human safety score for a frequency, 0.0-100.0.
///
/// Piecewise linear across three bands:
/// - at or above `safe_khz`: 100 (fully ultrasonic)
/// - at or below `audible_khz`: linear ramp from 0 at 0 kHz to 50 at the boundary
/// - between the thresholds: linear ramp from 50 to 100
///
/// The score is exactly 50 at the audible threshold and exactly 100 at the
/// safe threshold, so the three pieces join without discontinuities.
pub fn safety_score(current_khz: f32, audible_khz: f32, safe_khz: f32) -> f32 {
    if current_khz >= safe_khz {
        100.0
    } else if current_khz <= audible_khz {
        ((current_khz / audible_khz) * 50.0).max(0.0)
    } else {
        let range_size = safe_khz - audible_khz;
        let position = current_khz - audible_khz;
        50.0 + (position / range_size) * 50.0
    }
}

/// Classifies a frequency relative to the audibility thresholds.
pub fn zone(current_khz: f32, audible_khz: f32, safe_khz: f32) -> Zone {
    if current_khz <= audible_khz {
        Zone::Audible
    } else if current_khz <= safe_khz {
        Zone::Borderline
    } else {
        Zone::Ultrasonic
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effectiveness_peaks_at_optimal() {
        assert_eq!(effectiveness(42.0, 38.0, 44.0, 42.0).unwrap(), 100);
        assert_eq!(effectiveness(28.0, 20.0, 35.0, 28.0).unwrap(), 100);
    }

    #[test]
    fn effectiveness_collapses_at_range_edge() {
        // Mosquito range: at the bottom edge the Gaussian term is
        // exp(-(5 * 4/6)^2) ~= 1.5e-5, which truncates to zero.
        assert_eq!(effectiveness(38.0, 38.0, 44.0, 42.0).unwrap(), 0);
    }

    #[test]
    fn degenerate_range_is_fully_effective() {
        assert_eq!(effectiveness(10.0, 30.0, 30.0, 30.0).unwrap(), 100);
        assert_eq!(effectiveness(30.0, 30.0, 30.0, 30.0).unwrap(), 100);
    }

    #[test]
    fn inverted_range_is_rejected() {
        assert!(matches!(
            effectiveness(30.0, 44.0, 38.0, 42.0),
            Err(Error::InvalidRange { .. })
        ));
    }

    #[test]
    fn safety_score_is_exact_at_thresholds() {
        assert_eq!(safety_score(23.0, 23.0, 25.0), 50.0);
        assert_eq!(safety_score(25.0, 23.0, 25.0), 100.0);
        // Holds for arbitrary threshold pairs as well
        assert_eq!(safety_score(17.5, 17.5, 31.0), 50.0);
        assert_eq!(safety_score(31.0, 17.5, 31.0), 100.0);
    }

    #[test]
    fn safety_score_midpoint_of_borderline_band() {
        assert_eq!(safety_score(24.0, 23.0, 25.0), 75.0);
        assert_eq!(zone(24.0, 23.0, 25.0), Zone::Borderline);
    }

    #[test]
    fn safety_score_is_monotonic() {
        let thresholds = Thresholds::default();
        let mut previous = safety_score(0.0, thresholds.audible_khz, thresholds.safe_khz);
        for step in 1..=700 {
            let current = step as f32 * 0.1;
            let score = safety_score(current, thresholds.audible_khz, thresholds.safe_khz);
            assert!(
                score >= previous,
                "score dropped from {previous} to {score} at {current} kHz"
            );
            previous = score;
        }
    }

    #[test]
    fn safety_score_stays_clamped() {
        assert_eq!(safety_score(0.0, 23.0, 25.0), 0.0);
        assert_eq!(safety_score(200.0, 23.0, 25.0), 100.0);
    }

    #[test]
    fn zone_boundaries_are_inclusive_below() {
        assert_eq!(zone(23.0, 23.0, 25.0), Zone::Audible);
        assert_eq!(zone(23.1, 23.0, 25.0), Zone::Borderline);
        assert_eq!(zone(25.0, 23.0, 25.0), Zone::Borderline);
        assert_eq!(zone(25.1, 23.0, 25.0), Zone::Ultrasonic);
    }

    #[test]
    fn assessment_bundles_all_three_scores() {
        let profile = PestProfile {
            name: "Mosquitoes".into(),
            icon: "bug".into(),
            min_khz: 38.0,
            max_khz: 44.0,
            optimal_khz: 42.0,
        };
        let assessment =
            SafetyAssessment::evaluate(42.0, &profile, Thresholds::default()).unwrap();
        assert_eq!(assessment.effectiveness, 100);
        assert_eq!(assessment.safety, 100.0);
        assert_eq!(assessment.zone, Zone::Ultrasonic);
    }
}
