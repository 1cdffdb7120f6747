//! # Configuration System
//!
//! Settings for the glue around the geometry core: logging, the tick
//! service and the zone simulation. The geometry predicates themselves take
//! no configuration.
//!
//! Files are TOML or RON, chosen by extension.

pub use serde::{Serialize, Deserialize};

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(ConfigError::Io)?;

        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Values that parsed but make no sense
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// # Engine Settings
///
/// Logging and debug behaviour shared by every consumer of the crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Default log filter, overridden by `RUST_LOG`
    pub log_level: String,
    /// Whether to emit per-tick diagnostics
    pub debug_mode: bool,
}

impl EngineSettings {
    /// Create engine settings with the `info` log level
    pub fn new() -> Self {
        Self {
            log_level: "info".to_string(),
            debug_mode: cfg!(debug_assertions),
        }
    }

    /// Set log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Enable debug mode
    pub fn with_debug(mut self, enabled: bool) -> Self {
        self.debug_mode = enabled;
        self
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self::new()
    }
}

/// # Ticker Settings
///
/// Cadence of the tick service. The defaults schedule a tick every
/// millisecond after a one millisecond initial delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TickerSettings {
    /// Milliseconds between ticks
    pub period_ms: u64,
    /// Milliseconds before the first tick
    pub initial_delay_ms: u64,
}

impl TickerSettings {
    /// Create ticker settings with the default cadence
    pub fn new() -> Self {
        Self {
            period_ms: 1,
            initial_delay_ms: 1,
        }
    }

    /// Set the tick period
    pub fn with_period_ms(mut self, period_ms: u64) -> Self {
        self.period_ms = period_ms;
        self
    }

    /// Set the delay before the first tick
    pub fn with_initial_delay_ms(mut self, initial_delay_ms: u64) -> Self {
        self.initial_delay_ms = initial_delay_ms;
        self
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.period_ms == 0 {
            return Err(ConfigError::Invalid("Tick period must be at least 1 ms".to_string()));
        }
        Ok(())
    }
}

impl Default for TickerSettings {
    fn default() -> Self {
        Self::new()
    }
}

/// # Simulation Settings
///
/// Parameters for the zone demo: how many actors wander, how far, and for
/// how many ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    /// Number of wandering actors
    pub actor_count: u32,
    /// Actors stay within `-world_extent..=world_extent` on every axis
    pub world_extent: i32,
    /// Number of ticks before the simulation finishes
    pub tick_limit: u64,
}

impl SimulationSettings {
    /// Create simulation settings with small defaults
    pub fn new() -> Self {
        Self {
            actor_count: 8,
            world_extent: 20,
            tick_limit: 500,
        }
    }

    /// Set the number of actors
    pub fn with_actor_count(mut self, actor_count: u32) -> Self {
        self.actor_count = actor_count;
        self
    }

    /// Set the world extent
    pub fn with_world_extent(mut self, world_extent: i32) -> Self {
        self.world_extent = world_extent;
        self
    }

    /// Set the tick limit
    pub fn with_tick_limit(mut self, tick_limit: u64) -> Self {
        self.tick_limit = tick_limit;
        self
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.world_extent <= 0 {
            return Err(ConfigError::Invalid("World extent must be positive".to_string()));
        }
        if self.tick_limit == 0 {
            return Err(ConfigError::Invalid("Tick limit must be at least 1".to_string()));
        }
        Ok(())
    }
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self::new()
    }
}

/// # Complete Configuration
///
/// Top-level configuration that encompasses all subsystems.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeConfig {
    /// Logging and debug settings
    pub engine: EngineSettings,
    /// Tick service cadence
    pub ticker: TickerSettings,
    /// Zone simulation parameters
    pub simulation: SimulationSettings,
}

impl ShapeConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.ticker.validate()?;
        self.simulation.validate()?;
        Ok(())
    }
}

impl Config for ShapeConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> String {
        let mut path = std::env::temp_dir();
        path.push(format!("shape3d-{}-{}", std::process::id(), name));
        path.to_string_lossy().into_owned()
    }

    fn sample() -> ShapeConfig {
        ShapeConfig {
            engine: EngineSettings::new().with_log_level("debug").with_debug(true),
            ticker: TickerSettings::new().with_period_ms(5).with_initial_delay_ms(0),
            simulation: SimulationSettings::new().with_actor_count(3).with_tick_limit(40),
        }
    }

    #[test]
    fn test_toml_round_trip() {
        let path = temp_path("config.toml");
        sample().save_to_file(&path).unwrap();
        let loaded = ShapeConfig::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, sample());
    }

    #[test]
    fn test_ron_round_trip() {
        let path = temp_path("config.ron");
        sample().save_to_file(&path).unwrap();
        let loaded = ShapeConfig::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, sample());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: ShapeConfig = toml::from_str("[ticker]\nperiod_ms = 20\n").unwrap();
        assert_eq!(config.ticker.period_ms, 20);
        assert_eq!(config.ticker.initial_delay_ms, 1);
        assert_eq!(config.simulation, SimulationSettings::default());
    }

    #[test]
    fn test_unsupported_format() {
        let result = ShapeConfig::default().save_to_file("config.json");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_validation() {
        assert!(ShapeConfig::default().validate().is_ok());

        let mut config = ShapeConfig::default();
        config.ticker.period_ms = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = ShapeConfig::default();
        config.simulation.world_extent = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }
}
