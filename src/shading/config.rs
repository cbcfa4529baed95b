use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Default length of every sightline cast by the probe.
pub const DEFAULT_SEARCH_RADIUS: f64 = 99.0;

/// Factor reported before any computation or manual override.
pub const DEFAULT_SHADING_FACTOR: f64 = 0.75;

/// Configuration of the geometry probe.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Length of the sightlines and of the sides of the probing planes.
    pub search_radius: f64,
    /// Depth (along the outward normal) of the plane used to pre-select overhang candidates.
    pub overhang_test_depth: f64,
    /// Distance in front of the glazing centroid where the reveal test rays start.
    pub reveal_test_offset: f64,
    /// How far past the glazing side edge the reveal test rays reach.
    pub reveal_test_reach: f64,
    /// Reveal points further than this from the outward normal are ignored (degrees).
    pub reveal_max_angle_deg: f64,
}

impl ProbeConfig {
    pub fn new() -> Self {
        Self {
            search_radius: DEFAULT_SEARCH_RADIUS,
            overhang_test_depth: 2.0,
            reveal_test_offset: 0.01,
            reveal_test_reach: 1.0,
            reveal_max_angle_deg: 89.9,
        }
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Configuration of the shading engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadingConfig {
    pub probe: ProbeConfig,
    /// Winter factor of a window that has not been computed or overridden yet.
    pub default_winter_factor: f64,
    /// Summer factor of a window that has not been computed or overridden yet.
    pub default_summer_factor: f64,
}

impl ShadingConfig {
    pub fn new() -> Self {
        Self {
            probe: ProbeConfig::new(),
            default_winter_factor: DEFAULT_SHADING_FACTOR,
            default_summer_factor: DEFAULT_SHADING_FACTOR,
        }
    }

    /// Parses a JSON configuration. Missing keys keep their defaults.
    pub fn from_json_str(s: &str) -> Result<Self> {
        serde_json::from_str(s).context("Failed to parse shading configuration")
    }

    /// Reads a JSON configuration file. Missing keys keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open file: {}", path.display()))?;
        let reader = BufReader::new(file);

        let config: ShadingConfig = serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse shading configuration: {}", path.display()))?;

        Ok(config)
    }

    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize shading configuration")
    }
}

impl Default for ShadingConfig {
    fn default() -> Self {
        Self::new()
    }
}
