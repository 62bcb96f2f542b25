//! Configuration system for the jubble simulation.
//!
//! Supports YAML configuration files with sensible defaults.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::path::Path;

/// RGB colour triple
pub type Rgb = (u8, u8, u8);

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub arena: ArenaConfig,
    #[serde(default)]
    pub jubble: JubbleConfig,
    #[serde(default)]
    pub population: PopulationConfig,
    #[serde(default)]
    pub combat: CombatConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Playfield dimensions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArenaConfig {
    /// Arena width
    pub width: f64,
    /// Arena height
    pub height: f64,
    /// Margin kept between goals and the literal arena edge
    pub edge_avoidance: f64,
}

/// Per-jubble kinematics, perception and life cycle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JubbleConfig {
    /// Distance moved per tick
    pub speed: f64,
    /// Maximum perception distance
    pub detection_radius: f64,
    /// Half-width of the viewing cone (radians)
    pub detection_half_angle: f64,
    /// Radius at age 0
    pub birth_radius: f64,
    /// Radius from `maturity_age` onward
    pub mature_radius: f64,
    /// Age at which growth stops
    pub maturity_age: u64,
    /// Age at which a jubble dies naturally
    pub death_age: u64,
    /// Largest random heading change per turn (radians)
    pub turn_limit: f64,
    /// Probability of a random turn on a tick without a goal
    pub turn_chance: f64,
    /// Heading of newly spawned jubbles
    pub initial_heading: f64,
    /// Colour applied on death
    pub death_color: Rgb,
}

/// Population floor maintenance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopulationConfig {
    /// Jubbles created with the world
    pub initial_population: usize,
    /// Live jubbles kept in the arena
    pub min_population: usize,
    /// Spawning stops once this many ticks have passed (None = never stops)
    #[serde(default)]
    pub warmup_ticks: Option<u64>,
}

/// Who wins when a pursuer touches its target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WinPolicy {
    /// Older-or-equal age wins, but only if the winner currently sees the loser
    #[default]
    DetectionGated,
    /// Older-or-equal age wins
    AgeOnly,
}

/// Combat configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CombatConfig {
    #[serde(default)]
    pub win_policy: WinPolicy,
}

/// Logging and statistics configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Ticks between recorded stats snapshots
    pub stats_interval: u64,
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            width: 640.0,
            height: 480.0,
            edge_avoidance: 30.0,
        }
    }
}

impl Default for JubbleConfig {
    fn default() -> Self {
        Self {
            speed: 1.0,
            detection_radius: 150.0,
            detection_half_angle: 0.4 * PI, // 144 degree cone
            birth_radius: 5.0,
            mature_radius: 15.0,
            maturity_age: 600,
            death_age: 20_000,
            turn_limit: PI / 7.0,
            turn_chance: 0.1,
            initial_heading: 0.0,
            death_color: (220, 220, 220),
        }
    }
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            initial_population: 1,
            min_population: 10,
            warmup_ticks: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            stats_interval: 100,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a YAML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        let arena = &self.arena;
        let jubble = &self.jubble;

        if !(arena.width > 0.0 && arena.height > 0.0) {
            return Err(ConfigError::Invalid("arena dimensions must be > 0".to_string()));
        }
        if arena.edge_avoidance < 0.0
            || 2.0 * arena.edge_avoidance >= arena.width
            || 2.0 * arena.edge_avoidance >= arena.height
        {
            return Err(ConfigError::Invalid(
                "edge_avoidance must leave a non-empty interior".to_string(),
            ));
        }
        if !(jubble.speed > 0.0) {
            return Err(ConfigError::Invalid("speed must be > 0".to_string()));
        }
        // Edge correction only redirects; the margin has to absorb the overshoot.
        if jubble.speed >= arena.edge_avoidance {
            return Err(ConfigError::Invalid(
                "speed must be smaller than edge_avoidance".to_string(),
            ));
        }
        if jubble.birth_radius < 0.0 || jubble.birth_radius > jubble.mature_radius {
            return Err(ConfigError::Invalid(
                "birth_radius must be between 0 and mature_radius".to_string(),
            ));
        }
        if jubble.maturity_age == 0 {
            return Err(ConfigError::Invalid("maturity_age must be > 0".to_string()));
        }
        if !(jubble.turn_limit >= 0.0) {
            return Err(ConfigError::Invalid("turn_limit must be >= 0".to_string()));
        }
        if !(jubble.detection_radius >= 0.0) {
            return Err(ConfigError::Invalid("detection_radius must be >= 0".to_string()));
        }
        if !(jubble.detection_half_angle >= 0.0) {
            return Err(ConfigError::Invalid(
                "detection_half_angle must be >= 0".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&jubble.turn_chance) {
            return Err(ConfigError::Invalid("turn_chance must be within [0, 1]".to_string()));
        }
        if self.logging.stats_interval == 0 {
            return Err(ConfigError::Invalid("stats_interval must be > 0".to_string()));
        }
        Ok(())
    }
}

/// Errors raised while loading, saving or validating configuration
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_yaml::Error),
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "IO error: {}", e),
            Self::Parse(e) => write!(f, "YAML error: {}", e),
            Self::Invalid(msg) => write!(f, "Invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(e: serde_yaml::Error) -> Self {
        Self::Parse(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_roundtrip() {
        let mut config = Config::default();
        config.combat.win_policy = WinPolicy::AgeOnly;
        config.population.warmup_ticks = Some(10);

        let yaml = serde_yaml::to_string(&config).unwrap();
        let loaded: Config = serde_yaml::from_str(&yaml).unwrap();

        assert_eq!(loaded.arena.width, config.arena.width);
        assert_eq!(loaded.combat.win_policy, WinPolicy::AgeOnly);
        assert_eq!(loaded.population.warmup_ticks, Some(10));
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let yaml = "population:\n  initial_population: 3\n  min_population: 5\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.population.min_population, 5);
        assert_eq!(config.population.warmup_ticks, None);
        assert_eq!(config.arena.width, 640.0);
        assert_eq!(config.combat.win_policy, WinPolicy::DetectionGated);
    }

    #[test]
    fn test_speed_must_fit_inside_margin() {
        let mut config = Config::default();
        config.jubble.speed = config.arena.edge_avoidance;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rejects_negative_or_nan_perception() {
        let mut config = Config::default();
        config.jubble.turn_limit = -0.1;
        config.jubble.turn_chance = 1.0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = Config::default();
        config.jubble.detection_radius = -1.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.jubble.detection_half_angle = f64::NAN;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.jubble.turn_limit = 0.0;
        config.jubble.detection_radius = 0.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_inverted_radii() {
        let mut config = Config::default();
        config.jubble.birth_radius = 20.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_margin_without_interior() {
        let mut config = Config::default();
        config.arena.edge_avoidance = 300.0;
        assert!(config.validate().is_err());
    }
}
