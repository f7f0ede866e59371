//! # Repeller Sim - Ultrasonic Pest Repeller Console
//!
//! Thin application layer over `repeller-core`. It owns the pest catalog,
//! translates commands into core calls, and drives the periodic repelling
//! cycle.
//!
//! ## Architecture
//! - **Main thread**: command dispatch, tone manager ownership, cycle loop
//! - **Stdin thread**: watches for Enter to stop a running cycle
//! - **Communication**: crossbeam channels for tick and stop signalling

use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use crossbeam_channel::{select, tick, unbounded};
use rand::seq::SliceRandom;

use repeller_core::{
    CpalPlayback, PestProfile, SafetyAssessment, Thresholds, ToneAssetManager, pest, scoring,
};

// Tone timing constants
const DEFAULT_TONE_SECS: f32 = 1.0; // One-shot playback length
const REPEL_TONE_SECS: f32 = 1.5; // Tone length inside the repelling cycle
const TEST_TONE_KHZ: f32 = 25.0; // Frequency of the speaker test tone
const TEST_TONE_SECS: f32 = 0.5;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "repeller-sim")]
#[command(about = "Ultrasonic pest repeller frequency simulator", long_about = None)]
struct Args {
    /// Load the pest catalog from a JSON file instead of the built-in one
    #[arg(long, value_name = "FILE")]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the pest catalog with ranges and optimal-frequency assessments
    List,
    /// Assess a frequency for safety and, against a pest, effectiveness
    Assess {
        /// Frequency to assess, in kHz
        #[arg(long, value_name = "KHZ")]
        frequency: f32,
        /// Pest name for an effectiveness score (e.g. "Rats")
        #[arg(long, value_name = "NAME")]
        pest: Option<String>,
    },
    /// Play a single tone at the given frequency
    Play {
        /// Frequency to play, in kHz
        #[arg(long, value_name = "KHZ")]
        frequency: f32,
        /// Tone length in seconds
        #[arg(long, value_name = "SECONDS", default_value_t = DEFAULT_TONE_SECS)]
        duration: f32,
    },
    /// Play the 25 kHz speaker test tone
    TestSound,
    /// Cycle through the selected pests' frequencies until Enter is pressed
    Repel {
        /// Pest names to repel (defaults to the whole catalog)
        #[arg(long = "pest", value_name = "NAME")]
        pests: Vec<String>,
        /// Seconds between tones
        #[arg(long, value_name = "SECONDS", default_value_t = 2.0)]
        interval: f32,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let catalog = match &args.catalog {
        Some(path) => {
            eprintln!("[MAIN] Loading pest catalog from {}", path.display());
            pest::load_catalog(path)?
        }
        None => pest::default_catalog(),
    };

    match args.command {
        Command::List => cmd_list(&catalog),
        Command::Assess { frequency, pest } => cmd_assess(&catalog, frequency, pest.as_deref())?,
        Command::Play {
            frequency,
            duration,
        } => cmd_play(frequency, duration)?,
        Command::TestSound => cmd_play(TEST_TONE_KHZ, TEST_TONE_SECS)?,
        Command::Repel { pests, interval } => cmd_repel(&catalog, &pests, interval)?,
    }

    Ok(())
}

/// Prints the catalog with each pest assessed at its optimal frequency.
fn cmd_list(catalog: &[PestProfile]) {
    let thresholds = Thresholds::default();
    println!("{:<12} {:>10} {:>8}  {}", "Pest", "Range kHz", "Optimal", "Safety at optimal");
    for pest in catalog {
        let safety = scoring::safety_score(
            pest.optimal_khz,
            thresholds.audible_khz,
            thresholds.safe_khz,
        );
        let zone = scoring::zone(pest.optimal_khz, thresholds.audible_khz, thresholds.safe_khz);
        println!(
            "{:<12} {:>4}-{:<5} {:>8}  {:.0}% ({})",
            pest.name,
            pest.min_khz,
            pest.max_khz,
            pest.optimal_khz,
            safety,
            zone.warning_text()
        );
    }
}

/// Assesses one frequency, optionally against a named pest's range.
fn cmd_assess(catalog: &[PestProfile], frequency: f32, pest_name: Option<&str>) -> Result<()> {
    let thresholds = Thresholds::default();

    match pest_name {
        Some(name) => {
            let profile = catalog
                .iter()
                .find(|p| p.name.eq_ignore_ascii_case(name))
                .ok_or_else(|| anyhow::anyhow!("unknown pest: {name}"))?;
            let assessment = SafetyAssessment::evaluate(frequency, profile, thresholds)?;
            println!("{} at {frequency} kHz", profile.name);
            println!("Effectiveness: {}%", assessment.effectiveness);
            println!("Human safety:  {:.0}%", assessment.safety);
            println!("{}", assessment.zone.warning_text());
        }
        None => {
            let safety =
                scoring::safety_score(frequency, thresholds.audible_khz, thresholds.safe_khz);
            let zone = scoring::zone(frequency, thresholds.audible_khz, thresholds.safe_khz);
            println!("{frequency} kHz");
            println!("Human safety: {safety:.0}%");
            println!("{}", zone.warning_text());
        }
    }
    Ok(())
}

/// Plays one tone and blocks until it has finished.
fn cmd_play(frequency: f32, duration: f32) -> Result<()> {
    let mut manager = ToneAssetManager::new(CpalPlayback::new());

    if manager.play(frequency, duration)? {
        eprintln!("[SIM] Playing {frequency} kHz for {duration} s");
        thread::sleep(Duration::from_secs_f32(duration) + Duration::from_millis(100));
    } else {
        eprintln!("[SIM] Playback unavailable - tone not started");
    }

    manager.cleanup();
    Ok(())
}

/// Runs the repelling cycle: every `interval` seconds, play a randomly
/// chosen active frequency, until the user presses Enter.
fn cmd_repel(catalog: &[PestProfile], pest_names: &[String], interval: f32) -> Result<()> {
    let thresholds = Thresholds::default();

    let active: Vec<&PestProfile> = if pest_names.is_empty() {
        catalog.iter().collect()
    } else {
        let mut selected = Vec::new();
        for name in pest_names {
            let profile = catalog
                .iter()
                .find(|p| p.name.eq_ignore_ascii_case(name))
                .ok_or_else(|| anyhow::anyhow!("unknown pest: {name}"))?;
            selected.push(profile);
        }
        selected
    };

    let frequencies: Vec<f32> = active.iter().map(|p| p.optimal_khz).collect();
    let audible_count = frequencies
        .iter()
        .filter(|&&f| scoring::zone(f, thresholds.audible_khz, thresholds.safe_khz) == scoring::Zone::Audible)
        .count();

    println!("Repelling started for {} pest type(s)", active.len());
    if audible_count > 0 {
        println!("Warning: {audible_count} active repeller(s) may be audible to humans");
    }
    println!("Press Enter to stop.");

    // Stdin watcher thread signalling the main loop to stop.
    let (stop_tx, stop_rx) = unbounded::<()>();
    thread::spawn(move || {
        let mut line = String::new();
        let _ = std::io::stdin().read_line(&mut line);
        let _ = stop_tx.send(());
    });

    let mut manager = ToneAssetManager::new(CpalPlayback::new());
    let mut rng = rand::thread_rng();
    let ticker = tick(Duration::from_secs_f32(interval));

    loop {
        select! {
            recv(ticker) -> _ => {
                if let Some(&frequency) = frequencies.choose(&mut rng) {
                    match manager.play(frequency, REPEL_TONE_SECS) {
                        Ok(true) => eprintln!("[SIM] Emitting {frequency} kHz"),
                        Ok(false) => eprintln!("[SIM] Playback unavailable for {frequency} kHz"),
                        Err(e) => {
                            eprintln!("[SIM] Failed to play {frequency} kHz: {e}");
                            break;
                        }
                    }
                }
            },
            recv(stop_rx) -> _ => {
                eprintln!("[SIM] Stop requested");
                break;
            },
        }
    }

    // cleanup() stops every active handle before deleting the assets.
    manager.cleanup();
    println!("Repelling stopped");
    Ok(())
}
