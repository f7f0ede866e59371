// repeller-core/src/lib.rs

//! The core logic for the ultrasonic pest repeller simulator.
//! This crate is responsible for tone synthesis, tone asset lifecycle
//! management, and frequency safety scoring. It is completely headless
//! and contains no GUI code.

pub mod error;
pub mod pest;
pub mod playback;
pub mod scoring;
pub mod synth;
pub mod tone;

pub use error::{Error, Result};
pub use pest::PestProfile;
pub use playback::{CpalPlayback, Playback, PlaybackHandle};
pub use scoring::{SafetyAssessment, Thresholds, Zone};
pub use synth::SAMPLE_RATE;
pub use tone::ToneAssetManager;
