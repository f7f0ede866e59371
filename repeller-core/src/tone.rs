//! # Tone Asset Manager Module
//!
//! Owns the mapping from a requested frequency to a materialized WAV asset
//! on disk and to its active playback handle. Enforces at-most-one
//! concurrent playback per frequency and guarantees eventual cleanup of
//! every file it ever created.
//!
//! ## Features
//! - Replace-on-repeat playback: a repeated frequency restarts its tone
//! - Uniquely named WAV assets (mono, 16-bit, 44.1 kHz) via tempfile + hound
//! - Separate bookkeeping for active handles and all-ever-created files
//! - Cleanup that survives individual deletion failures

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::playback::{Playback, PlaybackHandle};
use crate::synth::{self, SAMPLE_RATE};

/// Volume applied to every tone after loading, as a fraction.
const DEFAULT_VOLUME: f32 = 0.5;

/// Manages materialized tone assets and their playback handles.
///
/// The manager keeps two collections with different lifetimes: the active
/// handle per frequency (entries come and go with play/stop) and the list
/// of every file it ever wrote (only drained by [`cleanup`]). A superseded
/// asset leaves the handle map immediately but its file stays on disk
/// until teardown, because the file may still be mapped by the audio
/// backend mid-replacement.
///
/// [`cleanup`]: ToneAssetManager::cleanup
pub struct ToneAssetManager<P: Playback> {
    playback: P,
    /// Active handle per frequency, keyed by the f32 bit pattern of the kHz value
    active: HashMap<u32, P::Handle>,
    /// Every asset file this manager instance has created
    created_files: Vec<PathBuf>,
    /// Directory the assets are written into
    asset_dir: PathBuf,
}

impl<P: Playback> ToneAssetManager<P> {
    /// Creates a manager writing assets into the system temp directory.
    pub fn new(playback: P) -> Self {
        Self::with_asset_dir(playback, std::env::temp_dir())
    }

    /// Creates a manager writing assets into a caller-chosen directory.
    pub fn with_asset_dir(playback: P, asset_dir: impl Into<PathBuf>) -> Self {
        Self {
            playback,
            active: HashMap::new(),
            created_files: Vec::new(),
            asset_dir: asset_dir.into(),
        }
    }

    /// Synthesizes, materializes and plays a tone at the given frequency.
    ///
    /// If a tone for this exact frequency is currently playing it is
    /// stopped first, so a repeated request restarts the tone rather than
    /// overlapping it.
    ///
    /// # Arguments
    /// * `frequency_khz` - Tone frequency in kilohertz (must be > 0)
    /// * `duration_seconds` - Tone length in seconds (must be > 0)
    ///
    /// # Returns
    /// * `Ok(true)` - A handle was obtained and playback started
    /// * `Ok(false)` - The playback subsystem could not load the written
    ///   asset (recoverable; the file is still tracked for cleanup)
    /// * `Err(_)` - Synthesis rejected the parameters, or the asset file
    ///   could not be written
    pub fn play(&mut self, frequency_khz: f32, duration_seconds: f32) -> Result<bool> {
        let key = frequency_khz.to_bits();
        if let Some(handle) = self.active.get_mut(&key) {
            if handle.is_playing() {
                handle.stop();
            }
        }

        let samples = synth::synthesize(frequency_khz, duration_seconds)?;
        let path = self.write_asset(&samples)?;

        match self.playback.load(&path) {
            Some(mut handle) => {
                handle.set_volume(DEFAULT_VOLUME);
                handle.play();
                self.active.insert(key, handle);
                Ok(true)
            }
            None => {
                eprintln!(
                    "[TONE] Playback subsystem could not load {}",
                    path.display()
                );
                Ok(false)
            }
        }
    }

    /// Stops playback for one frequency, or for all of them.
    ///
    /// Stopping a frequency with no active handle is a no-op; the call is
    /// idempotent in every case. Stopped handles are removed from the
    /// active map (their asset files stay tracked until [`cleanup`]).
    ///
    /// [`cleanup`]: ToneAssetManager::cleanup
    pub fn stop(&mut self, frequency_khz: Option<f32>) {
        match frequency_khz {
            Some(f) => {
                if let Some(mut handle) = self.active.remove(&f.to_bits()) {
                    handle.stop();
                }
            }
            None => {
                for (_, mut handle) in self.active.drain() {
                    handle.stop();
                }
            }
        }
    }

    /// Stops every handle and deletes every file this manager created.
    ///
    /// Individual deletion failures are logged and skipped so the rest of
    /// the cleanup proceeds. Safe to call repeatedly and on a manager that
    /// never played anything.
    pub fn cleanup(&mut self) {
        self.stop(None);
        for path in self.created_files.drain(..) {
            if let Err(e) = fs::remove_file(&path) {
                eprintln!("[TONE] Failed to remove {}: {}", path.display(), e);
            }
        }
    }

    /// Reports whether a tone for this exact frequency is playing.
    pub fn is_playing(&self, frequency_khz: f32) -> bool {
        self.active
            .get(&frequency_khz.to_bits())
            .is_some_and(|handle| handle.is_playing())
    }

    /// Number of frequencies with an active handle.
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Paths of every asset file this manager has created so far.
    pub fn created_files(&self) -> &[PathBuf] {
        &self.created_files
    }

    /// Writes a sample buffer to a new uniquely named WAV file and
    /// records the path for cleanup.
    ///
    /// The path enters `created_files` before the first sample is
    /// written: a write that fails partway (disk full) must still leave
    /// the materialized file deletable by [`cleanup`]. The container
    /// header declares mono, 16-bit, 44.1 kHz so the playback subsystem
    /// can introspect the format.
    ///
    /// [`cleanup`]: ToneAssetManager::cleanup
    fn write_asset(&mut self, samples: &[i16]) -> Result<PathBuf> {
        let file = tempfile::Builder::new()
            .prefix("repeller-tone-")
            .suffix(".wav")
            .tempfile_in(&self.asset_dir)?;
        let (file, path) = file.keep().map_err(|e| Error::Storage(e.error))?;
        self.created_files.push(path.clone());

        write_wav(io::BufWriter::new(file), samples)?;
        Ok(path)
    }
}

impl<P: Playback> Drop for ToneAssetManager<P> {
    fn drop(&mut self) {
        self.cleanup();
    }
}

/// Writes mono 16-bit PCM samples to `writer` as a WAV stream.
fn write_wav<W: io::Write + io::Seek>(writer: W, samples: &[i16]) -> Result<()> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::new(writer, spec)?;
    for &sample in samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;
    Ok(())
}
