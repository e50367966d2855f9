// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.

//! Configuration module

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::detection::{DEFAULT_CAPACITY, DEFAULT_MAX_AGE_SECS};
use crate::sensors::ThresholdError;

/// Bounds of the simulation speed multiplier
pub const MIN_SPEED: f64 = 0.1;
pub const MAX_SPEED: f64 = 10.0;

/// Most decimal places a drift step may keep
pub const MAX_ROUND_DECIMALS: u32 = 6;

/// Longest detection retention (one week)
pub const MAX_DETECTION_AGE_SECS: u64 = 7 * 24 * 60 * 60;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("config serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("sensor {sensor}: {source}")]
    Thresholds {
        sensor: String,
        #[source]
        source: ThresholdError,
    },

    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("scenario '{0}': {1}")]
    Scenario(String, String),
}

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Application name
    pub app_name: String,

    /// Log level
    pub log_level: String,

    /// Seed the store with the demo plant
    pub demo_mode: bool,

    /// Sensor drift simulation
    pub simulation: SimulationConfig,

    /// Detection history and synthetic vision feed
    pub detection: DetectionConfig,

    /// Scenario catalog source
    pub scenarios: ScenarioConfig,

    /// AI guide collaborator
    pub guide: GuideConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: "PlantWatch".to_string(),
            log_level: "info".to_string(),
            demo_mode: true,
            simulation: SimulationConfig::default(),
            detection: DetectionConfig::default(),
            scenarios: ScenarioConfig::default(),
            guide: GuideConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Load or create default configuration
    pub fn load_or_create(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            let config = Self::default();

            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }

            config.save(path)?;
            Ok(config)
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.simulation.validate()?;
        self.detection.validate()
    }

    /// Get configuration directory
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("plantwatch"))
            .unwrap_or_else(|| PathBuf::from("./config"))
    }

    /// Get default configuration path
    pub fn default_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }
}

/// Sensor drift simulation.
///
/// `speed` scales the tick period inversely (`tick_interval / speed`); the
/// noise amplitude is never scaled.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Start with the simulation running
    pub enabled_on_start: bool,

    /// Base tick period in milliseconds
    pub tick_interval_ms: u64,

    /// Full width of the uniform noise band (delta ∈ ±amplitude/2)
    pub noise_amplitude: f64,

    /// Speed multiplier
    pub speed: f64,

    /// Decimal places kept after each drift step
    pub round_decimals: u32,

    /// Fixed RNG seed for reproducible runs
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            enabled_on_start: true,
            tick_interval_ms: 2000,
            noise_amplitude: 5.0,
            speed: 1.0,
            round_decimals: 1,
            seed: None,
        }
    }
}

impl SimulationConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_interval_ms == 0 {
            return Err(invalid("simulation.tick_interval_ms", "must be > 0"));
        }
        if !(self.noise_amplitude.is_finite() && self.noise_amplitude > 0.0) {
            return Err(invalid("simulation.noise_amplitude", "must be finite and > 0"));
        }
        if !(self.speed.is_finite() && (MIN_SPEED..=MAX_SPEED).contains(&self.speed)) {
            return Err(invalid(
                "simulation.speed",
                &format!("must be within [{MIN_SPEED}, {MAX_SPEED}]"),
            ));
        }
        if self.round_decimals > MAX_ROUND_DECIMALS {
            return Err(invalid(
                "simulation.round_decimals",
                &format!("must be <= {MAX_ROUND_DECIMALS}"),
            ));
        }
        Ok(())
    }

    /// Tick period at the given speed multiplier
    pub fn period(&self, speed: f64) -> Duration {
        let speed = clamp_speed(speed).unwrap_or(1.0);
        let millis = (self.tick_interval_ms as f64 / speed).round() as u64;
        Duration::from_millis(millis.max(1))
    }
}

/// Clamp a requested speed into range; non-finite requests are rejected.
pub fn clamp_speed(speed: f64) -> Option<f64> {
    speed.is_finite().then(|| speed.clamp(MIN_SPEED, MAX_SPEED))
}

/// Detection history and synthetic feed
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Ring buffer capacity
    pub capacity: usize,

    /// Age after which the maintenance task drops a detection
    pub max_age_secs: u64,

    /// Maintenance task period
    pub prune_interval_ms: u64,

    /// Run the synthetic vision feed while simulating
    pub vision_feed_enabled: bool,

    /// Synthetic feed period
    pub vision_feed_interval_ms: u64,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            max_age_secs: DEFAULT_MAX_AGE_SECS,
            prune_interval_ms: 10_000,
            vision_feed_enabled: true,
            vision_feed_interval_ms: 3000,
        }
    }
}

impl DetectionConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(invalid("detection.capacity", "must be > 0"));
        }
        if self.prune_interval_ms == 0 || self.vision_feed_interval_ms == 0 {
            return Err(invalid("detection intervals", "must be > 0"));
        }
        if self.max_age_secs > MAX_DETECTION_AGE_SECS {
            return Err(invalid(
                "detection.max_age_secs",
                &format!("must be <= {MAX_DETECTION_AGE_SECS}"),
            ));
        }
        Ok(())
    }

    pub fn max_age(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.max_age_secs.min(MAX_DETECTION_AGE_SECS) as i64)
    }
}

/// Scenario catalog source
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    /// TOML catalog replacing the built-in scenarios
    pub catalog_path: Option<PathBuf>,
}

/// AI guide collaborator
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GuideConfig {
    /// Remote text-completion endpoint; the canned guide is used when unset
    pub endpoint: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for GuideConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout_secs: 30,
        }
    }
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        Config::default().validate().unwrap();
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            demo_mode = false

            [simulation]
            speed = 2.0
            seed = 42
            "#,
        )
        .unwrap();
        assert!(!config.demo_mode);
        assert_eq!(config.simulation.speed, 2.0);
        assert_eq!(config.simulation.seed, Some(42));
        assert_eq!(config.simulation.tick_interval_ms, 2000);
        assert_eq!(config.detection.capacity, 50);
    }

    #[test]
    fn test_validate_rejects() {
        let mut config = Config::default();
        config.simulation.speed = 0.0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { field: "simulation.speed", .. })));

        let mut config = Config::default();
        config.simulation.tick_interval_ms = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.detection.capacity = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_unbounded_retention() {
        let mut config = Config::default();
        config.detection.max_age_secs = u64::MAX;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "detection.max_age_secs", .. })
        ));

        config.detection.max_age_secs = MAX_DETECTION_AGE_SECS;
        config.validate().unwrap();
        assert_eq!(config.detection.max_age(), chrono::Duration::days(7));

        // an unvalidated section still yields a usable duration
        let detection = DetectionConfig {
            max_age_secs: u64::MAX,
            ..DetectionConfig::default()
        };
        assert_eq!(detection.max_age(), chrono::Duration::days(7));
    }

    #[test]
    fn test_validate_rejects_excess_round_decimals() {
        let mut config = Config::default();
        config.simulation.round_decimals = 400;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "simulation.round_decimals", .. })
        ));

        config.simulation.round_decimals = MAX_ROUND_DECIMALS;
        config.validate().unwrap();
    }

    #[test]
    fn test_period_scales_inversely_with_speed() {
        let sim = SimulationConfig::default();
        assert_eq!(sim.period(1.0), Duration::from_millis(2000));
        assert_eq!(sim.period(2.0), Duration::from_millis(1000));
        assert_eq!(sim.period(0.5), Duration::from_millis(4000));
        assert_eq!(sim.period(f64::NAN), Duration::from_millis(2000));
    }

    #[test]
    fn test_clamp_speed() {
        assert_eq!(clamp_speed(100.0), Some(MAX_SPEED));
        assert_eq!(clamp_speed(0.0), Some(MIN_SPEED));
        assert_eq!(clamp_speed(f64::INFINITY), None);
    }

    #[test]
    fn test_load_or_create_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let created = Config::load_or_create(&path).unwrap();
        assert!(path.exists());

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.app_name, created.app_name);
        assert_eq!(loaded.simulation.tick_interval_ms, created.simulation.tick_interval_ms);
    }
}
