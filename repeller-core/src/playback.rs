//! # Playback Seam Module
//!
//! This module defines the narrow interface through which the core talks to
//! the system audio playback subsystem, plus the production implementation
//! built on CPAL (Cross-Platform Audio Library).
//!
//! ## Features
//! - `Playback`/`PlaybackHandle` traits mirroring the load/play/stop contract
//! - CPAL-backed handle with atomic playhead, playing flag and volume
//! - Automatic output device selection with sample-rate fallback
//! - Load failures are reported as `None`, never as a panic

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::SupportedStreamConfigRange;

/// Loads materialized tone assets into playable handles.
///
/// This is the seam between the core and the external playback subsystem.
/// The production implementation is [`CpalPlayback`]; tests substitute a
/// recording double.
pub trait Playback {
    type Handle: PlaybackHandle;

    /// Loads the audio file at `path`.
    ///
    /// Returns `None` when the subsystem cannot play the file (no output
    /// device, unreadable container). This is a recoverable condition for
    /// the caller, not an error.
    fn load(&self, path: &Path) -> Option<Self::Handle>;
}

/// Control surface for one loaded tone asset.
///
/// A handle plays its asset at most once per `play` call; dropping the
/// handle releases the underlying audio resources.
pub trait PlaybackHandle {
    /// Starts (or restarts) playback from the beginning of the asset.
    fn play(&mut self);

    /// Stops playback. Idempotent.
    fn stop(&mut self);

    /// Reports whether the asset is still audibly playing.
    fn is_playing(&self) -> bool;

    /// Sets the playback volume as a fraction in 0.0-1.0.
    fn set_volume(&mut self, volume: f32);
}

/// State shared between a [`CpalHandle`] and its audio callback.
struct SharedState {
    /// Decoded mono samples, normalized to -1.0..1.0
    samples: Vec<f32>,
    /// Next sample index to emit
    position: AtomicUsize,
    /// Whether the callback should emit samples or silence
    playing: AtomicBool,
    /// Volume fraction, stored as f32 bits
    volume_bits: AtomicU32,
}

impl SharedState {
    fn volume(&self) -> f32 {
        f32::from_bits(self.volume_bits.load(Ordering::Relaxed))
    }
}

/// CPAL-backed playback subsystem.
///
/// Each loaded asset gets its own output stream; the stream runs for the
/// lifetime of the handle and emits silence whenever the handle is stopped
/// or the asset has run out.
#[derive(Debug, Default)]
pub struct CpalPlayback;

impl CpalPlayback {
    pub fn new() -> Self {
        Self
    }
}

impl Playback for CpalPlayback {
    type Handle = CpalHandle;

    fn load(&self, path: &Path) -> Option<CpalHandle> {
        let mut reader = match hound::WavReader::open(path) {
            Ok(reader) => reader,
            Err(e) => {
                eprintln!("[PLAYBACK] Failed to open {}: {}", path.display(), e);
                return None;
            }
        };
        let file_rate = reader.spec().sample_rate;
        let samples: Vec<f32> = reader
            .samples::<i16>()
            .filter_map(|s| s.ok())
            .map(|s| s as f32 / 32768.0)
            .collect();
        if samples.is_empty() {
            eprintln!("[PLAYBACK] {} contains no samples", path.display());
            return None;
        }

        CpalHandle::open(samples, file_rate)
    }
}

/// A single playable tone asset backed by a CPAL output stream.
pub struct CpalHandle {
    /// The cpal output stream (must be kept alive while the handle exists)
    _stream: cpal::Stream,
    shared: Arc<SharedState>,
}

impl CpalHandle {
    /// Opens an output stream for the decoded samples.
    ///
    /// Targets the asset's own sample rate and falls back to the closest
    /// rate the device supports. No resampling is performed; the audible
    /// proxy tone tolerates a small device-rate mismatch.
    fn open(samples: Vec<f32>, target_rate: u32) -> Option<Self> {
        let host = cpal::default_host();
        let device = match host.default_output_device() {
            Some(device) => device,
            None => {
                eprintln!("[PLAYBACK] No audio output device available");
                return None;
            }
        };

        let configs = match device.supported_output_configs() {
            Ok(configs) => configs.collect::<Vec<_>>(),
            Err(e) => {
                eprintln!("[PLAYBACK] Failed to query output configs: {}", e);
                return None;
            }
        };
        let range = match find_supported_config(configs, target_rate) {
            Some(range) => range,
            None => {
                eprintln!("[PLAYBACK] No suitable f32 output format found");
                return None;
            }
        };

        let rate = target_rate.clamp(range.min_sample_rate().0, range.max_sample_rate().0);
        let config = range.with_sample_rate(cpal::SampleRate(rate));
        let channels = config.channels() as usize;
        let config: cpal::StreamConfig = config.into();

        let shared = Arc::new(SharedState {
            samples,
            position: AtomicUsize::new(0),
            playing: AtomicBool::new(false),
            volume_bits: AtomicU32::new(1.0f32.to_bits()),
        });
        let callback_state = Arc::clone(&shared);

        let err_fn = |err| eprintln!("[PLAYBACK] Audio stream error: {}", err);

        let stream = match device
            .build_output_stream(
                &config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    let volume = callback_state.volume();
                    for frame in data.chunks_mut(channels) {
                        let mut value = 0.0;
                        if callback_state.playing.load(Ordering::Relaxed) {
                            let pos = callback_state.position.fetch_add(1, Ordering::Relaxed);
                            match callback_state.samples.get(pos) {
                                Some(&sample) => value = sample * volume,
                                // Asset exhausted: report not-playing from here on.
                                None => callback_state.playing.store(false, Ordering::Relaxed),
                            }
                        }
                        for out in frame.iter_mut() {
                            *out = value;
                        }
                    }
                },
                err_fn,
                None,
            ) {
            Ok(stream) => stream,
            Err(e) => {
                eprintln!("[PLAYBACK] Failed to build output stream: {}", e);
                return None;
            }
        };

        // The stream runs for the handle's whole lifetime and emits
        // silence until play() flips the flag.
        if let Err(e) = stream.play() {
            eprintln!("[PLAYBACK] Failed to start output stream: {}", e);
            return None;
        }

        Some(Self {
            _stream: stream,
            shared,
        })
    }
}

impl PlaybackHandle for CpalHandle {
    fn play(&mut self) {
        self.shared.position.store(0, Ordering::Relaxed);
        self.shared.playing.store(true, Ordering::Relaxed);
    }

    fn stop(&mut self) {
        self.shared.playing.store(false, Ordering::Relaxed);
    }

    fn is_playing(&self) -> bool {
        self.shared.playing.load(Ordering::Relaxed)
    }

    fn set_volume(&mut self, volume: f32) {
        self.shared
            .volume_bits
            .store(volume.clamp(0.0, 1.0).to_bits(), Ordering::Relaxed);
    }
}

/// Finds the best supported output configuration for the target sample rate.
///
/// Prefers 32-bit float formats and picks the range whose bounds lie
/// closest to the requested rate.
fn find_supported_config(
    configs: Vec<SupportedStreamConfigRange>,
    target_rate: u32,
) -> Option<SupportedStreamConfigRange> {
    configs
        .into_iter()
        .filter(|c| c.sample_format() == cpal::SampleFormat::F32)
        .min_by_key(|c| {
            let min_diff = (c.min_sample_rate().0 as i32 - target_rate as i32).abs();
            let max_diff = (c.max_sample_rate().0 as i32 - target_rate as i32).abs();
            min_diff.min(max_diff)
        })
}
