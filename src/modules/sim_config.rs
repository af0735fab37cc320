//! ## Sim Config Module
//! Configuration value consumed when the simulator boots. The authoring
//! service validates richer cross-field rules upstream; the checks here make
//! a locally loaded file fail fast with a usable diagnostic instead.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::modules::controller_functions::controller::ControllerStrategy;
use crate::modules::engine_functions::engine::IdleParkingMode;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not read configuration file {path}: {source}")]
    Unreadable {
        path: String,
        source: std::io::Error,
    },
    #[error("configuration file {path} is not valid JSON: {source}")]
    Malformed {
        path: String,
        source: serde_json::Error,
    },
    #[error("min floor {min} must be strictly below max floor {max}")]
    FloorRange { min: i32, max: i32 },
    #[error("at least one lift is required")]
    NoLifts,
    #[error("{name} must be at least 1")]
    ZeroTickParameter { name: &'static str },
    #[error("door reopen window {window} must not exceed door transition ticks {transition}")]
    ReopenWindowTooLarge { window: u64, transition: u64 },
    #[error("home floor {home} is outside [{min}, {max}]")]
    HomeFloorOutOfRange { home: i32, min: i32, max: i32 },
}

fn default_lifts() -> u32 {
    1
}

/// The published configuration value. Field names follow the wire format of
/// the configuration service.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimConfig {
    pub min_floor: i32,
    pub max_floor: i32,
    /// The core models exactly one lift; the count is carried through for
    /// the configuration surface.
    #[serde(default = "default_lifts")]
    pub lifts: u32,
    pub travel_ticks_per_floor: u64,
    pub door_transition_ticks: u64,
    pub door_dwell_ticks: u64,
    pub door_reopen_window_ticks: u64,
    pub home_floor: i32,
    pub idle_timeout_ticks: u64,
    pub controller_strategy: ControllerStrategy,
    pub idle_parking_mode: IdleParkingMode,
}

impl SimConfig {
    /// Load and validate a configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let shown = path.display().to_string();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Unreadable {
            path: shown.clone(),
            source,
        })?;
        let config: SimConfig =
            serde_json::from_str(&contents).map_err(|source| ConfigError::Malformed {
                path: shown,
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_floor >= self.max_floor {
            return Err(ConfigError::FloorRange {
                min: self.min_floor,
                max: self.max_floor,
            });
        }
        if self.lifts == 0 {
            return Err(ConfigError::NoLifts);
        }
        if self.travel_ticks_per_floor == 0 {
            return Err(ConfigError::ZeroTickParameter {
                name: "travelTicksPerFloor",
            });
        }
        if self.door_transition_ticks == 0 {
            return Err(ConfigError::ZeroTickParameter {
                name: "doorTransitionTicks",
            });
        }
        if self.door_dwell_ticks == 0 {
            return Err(ConfigError::ZeroTickParameter {
                name: "doorDwellTicks",
            });
        }
        if self.door_reopen_window_ticks > self.door_transition_ticks {
            return Err(ConfigError::ReopenWindowTooLarge {
                window: self.door_reopen_window_ticks,
                transition: self.door_transition_ticks,
            });
        }
        if self.home_floor < self.min_floor || self.home_floor > self.max_floor {
            return Err(ConfigError::HomeFloorOutOfRange {
                home: self.home_floor,
                min: self.min_floor,
                max: self.max_floor,
            });
        }
        Ok(())
    }
}
