//! Configuration loading and resolution

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Error, Result};

/// Environment variable naming a config file to load.
pub const CONFIG_ENV_VAR: &str = "LEXICAST_CONFIG";

/// Player tuning knobs.
///
/// Every field has a default, so a config file only needs to name the values
/// it overrides. Unknown keys are rejected rather than silently ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlayerConfig {
    /// Playback rate a freshly created player starts at
    pub default_speed: f64,
    /// Lowest playback rate the speed gate will forward
    pub speed_min: f64,
    /// Highest playback rate the speed gate will forward
    pub speed_max: f64,
    /// Seconds moved by one skip-forward or skip-back command
    pub skip_step_seconds: f64,
    /// Event bus buffer size before slow subscribers start lagging
    pub event_capacity: usize,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            default_speed: 1.0,
            speed_min: 0.5,
            speed_max: 2.0,
            skip_step_seconds: 10.0,
            event_capacity: 64,
        }
    }
}

impl PlayerConfig {
    /// Config resolution priority order:
    /// 1. Command-line argument (highest priority)
    /// 2. `LEXICAST_CONFIG` environment variable
    /// 3. Platform config directory (`<config dir>/lexicast/config.toml`), if present
    /// 4. Compiled defaults (fallback)
    ///
    /// A file named by priority 1 or 2 must exist and parse; a missing file
    /// there is an error, not a fallthrough.
    pub fn resolve(cli_path: Option<&Path>) -> Result<Self> {
        // Priority 1: Command-line argument
        if let Some(path) = cli_path {
            debug!("Loading config from command-line path: {}", path.display());
            return Self::from_path(path);
        }

        // Priority 2: Environment variable
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            debug!("Loading config from {}: {}", CONFIG_ENV_VAR, path);
            return Self::from_path(Path::new(&path));
        }

        // Priority 3: Platform config directory
        if let Some(path) = default_config_file() {
            if path.exists() {
                debug!("Loading config from platform path: {}", path.display());
                return Self::from_path(&path);
            }
        }

        // Priority 4: Compiled defaults
        debug!("No config file found, using compiled defaults");
        Ok(Self::default())
    }

    /// Load and validate a config file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the player cannot run under.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("default_speed", self.default_speed),
            ("speed_min", self.speed_min),
            ("speed_max", self.speed_max),
            ("skip_step_seconds", self.skip_step_seconds),
        ] {
            if !value.is_finite() {
                return Err(Error::Config(format!("{} must be a finite number", name)));
            }
        }
        if self.speed_min <= 0.0 {
            return Err(Error::Config(format!(
                "speed_min must be positive, got {}",
                self.speed_min
            )));
        }
        if self.speed_max < self.speed_min {
            return Err(Error::Config(format!(
                "speed_max ({}) must not be below speed_min ({})",
                self.speed_max, self.speed_min
            )));
        }
        if self.default_speed < self.speed_min || self.default_speed > self.speed_max {
            return Err(Error::Config(format!(
                "default_speed ({}) must lie within [{}, {}]",
                self.default_speed, self.speed_min, self.speed_max
            )));
        }
        if self.skip_step_seconds <= 0.0 {
            return Err(Error::Config(format!(
                "skip_step_seconds must be positive, got {}",
                self.skip_step_seconds
            )));
        }
        if self.event_capacity == 0 {
            return Err(Error::Config(
                "event_capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Platform config file path (`<config dir>/lexicast/config.toml`), if the
/// platform exposes a config directory at all.
fn default_config_file() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("lexicast").join("config.toml"))
}
