//! # Pest Catalog Module
//!
//! Immutable descriptive records for the pests the repeller targets, plus
//! the built-in catalog and JSON load/save helpers. The core only consumes
//! these as scoring inputs; ownership of the catalog lies with the
//! application layer.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;

/// Descriptive record for one pest species.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PestProfile {
    /// Display name (e.g. "Mosquitoes")
    pub name: String,
    /// Display icon identifier for the UI layer
    pub icon: String,
    /// Lower bound of the tolerance range, in kHz
    pub min_khz: f32,
    /// Upper bound of the tolerance range, in kHz
    pub max_khz: f32,
    /// Most effective repelling frequency, in kHz
    pub optimal_khz: f32,
}

impl PestProfile {
    fn new(name: &str, icon: &str, min_khz: f32, max_khz: f32, optimal_khz: f32) -> Self {
        Self {
            name: name.to_string(),
            icon: icon.to_string(),
            min_khz,
            max_khz,
            optimal_khz,
        }
    }
}

/// Returns the built-in catalog of supported pests.
pub fn default_catalog() -> Vec<PestProfile> {
    vec![
        PestProfile::new("Mosquitoes", "bug", 38.0, 44.0, 42.0),
        PestProfile::new("Rats", "rat", 20.0, 35.0, 28.0),
        PestProfile::new("Cockroaches", "bug", 25.0, 45.0, 35.0),
        PestProfile::new("Spiders", "spider-web", 30.0, 60.0, 45.0),
        PestProfile::new("Ants", "bug", 40.0, 70.0, 55.0),
        PestProfile::new("Flies", "bug", 45.0, 65.0, 55.0),
    ]
}

/// Loads a pest catalog from a JSON file.
pub fn load_catalog(path: impl AsRef<Path>) -> Result<Vec<PestProfile>> {
    let data = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}

/// Saves a pest catalog to a JSON file.
pub fn save_catalog(path: impl AsRef<Path>, catalog: &[PestProfile]) -> Result<()> {
    let data = serde_json::to_string_pretty(catalog)?;
    std::fs::write(path, data)?;
    Ok(())
}
