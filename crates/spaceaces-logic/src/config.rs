//! Campaign configuration: galaxy shape, roll history size and seeding.
//!
//! All structs deserialize with `#[serde(default)]`, so a settings file only
//! needs the fields it changes:
//!
//! ```
//! use spaceaces_logic::config::CampaignConfig;
//!
//! let cfg = CampaignConfig::from_json_str(r#"{ "galaxy": { "max_ring": 3 } }"#).unwrap();
//! assert_eq!(cfg.galaxy.max_ring, 3);
//! assert_eq!(cfg.rolls.capacity, 100);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog;

/// Default number of rolls kept in history.
pub const DEFAULT_ROLL_CAPACITY: usize = 100;

/// Largest accepted `max_ring`. The catalog runs dry long before this.
pub const MAX_RINGS: u32 = 64;

/// Settings for procedural galaxy generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalaxyConfig {
    /// Outermost ring populated around the home sector.
    pub max_ring: u32,
    /// Chance that a sector beyond ring 1 starts discovered.
    pub discovery_chance: f64,
    /// Catalog key of the card placed at the home coordinate.
    pub home_template: String,
    /// Hex radius in pixels used by map layout.
    pub hex_size: f64,
}

impl Default for GalaxyConfig {
    fn default() -> Self {
        Self {
            max_ring: 4,
            discovery_chance: 0.3,
            home_template: catalog::HOME_TEMPLATE.to_string(),
            hex_size: 40.0,
        }
    }
}

impl GalaxyConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_ring == 0 {
            return Err(ConfigError::NoRings);
        }
        if self.max_ring > MAX_RINGS {
            return Err(ConfigError::TooManyRings(self.max_ring));
        }
        if !(0.0..=1.0).contains(&self.discovery_chance) {
            return Err(ConfigError::DiscoveryChance(self.discovery_chance));
        }
        if catalog::get_template(&self.home_template).is_none() {
            return Err(ConfigError::UnknownTemplate(self.home_template.clone()));
        }
        if !(self.hex_size.is_finite() && self.hex_size > 0.0) {
            return Err(ConfigError::HexSize(self.hex_size));
        }
        Ok(())
    }
}

/// Settings for the roll history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RollLogConfig {
    pub capacity: usize,
}

impl Default for RollLogConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_ROLL_CAPACITY,
        }
    }
}

/// Top-level campaign settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CampaignConfig {
    pub galaxy: GalaxyConfig,
    pub rolls: RollLogConfig,
    /// Fixed seed for dice and generation. `None` uses the OS random source.
    pub seed: Option<u64>,
    /// Append a journal entry for every recorded roll.
    pub journal_rolls: bool,
    /// Append a journal entry when travelling to a sector.
    pub journal_travel: bool,
}

impl Default for CampaignConfig {
    fn default() -> Self {
        Self {
            galaxy: GalaxyConfig::default(),
            rolls: RollLogConfig::default(),
            seed: None,
            journal_rolls: true,
            journal_travel: true,
        }
    }
}

impl CampaignConfig {
    /// Parse and validate a JSON settings document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let cfg: CampaignConfig = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.galaxy.validate()?;
        if self.rolls.capacity == 0 {
            return Err(ConfigError::RollCapacity);
        }
        Ok(())
    }
}

/// Invalid configuration value.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("galaxy must have at least one ring")]
    NoRings,
    #[error("galaxy may have at most {max} rings, got {0}", max = MAX_RINGS)]
    TooManyRings(u32),
    #[error("discovery chance {0} is outside 0.0..=1.0")]
    DiscoveryChance(f64),
    #[error("unknown home sector template {0:?}")]
    UnknownTemplate(String),
    #[error("hex size {0} must be a positive number")]
    HexSize(f64),
    #[error("roll history capacity must be at least 1")]
    RollCapacity,
    #[error("config parse error: {0}")]
    Json(#[from] serde_json::Error),
}
