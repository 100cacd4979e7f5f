//! Data-driven game balance
//!
//! Loaded from JSON so difficulty can be tweaked without a rebuild.
//! Missing fields fall back to the defaults in [`crate::consts`].

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Balance knobs for a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Scroll speed at row zero (units/s)
    pub base_speed: f32,
    /// Speed gained per generated row (units/s)
    pub ramp_factor: f32,
    /// Height of a row in field units
    pub row_height: f32,
    /// Retry ceiling for the row generator
    pub max_row_attempts: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            base_speed: BASE_SPEED,
            ramp_factor: RAMP_FACTOR,
            row_height: ROW_HEIGHT,
            max_row_attempts: MAX_ROW_ATTEMPTS,
        }
    }
}

impl Tuning {
    /// Parse tuning from a JSON document, clamping nonsense values
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let tuning: Tuning = serde_json::from_str(json)?;
        Ok(tuning.sanitized())
    }

    /// Serialize to pretty JSON (for writing a starter file)
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Scroll speed once `row_count` rows have been generated
    #[inline]
    pub fn speed(&self, row_count: u32) -> f32 {
        self.base_speed + row_count as f32 * self.ramp_factor
    }

    /// Replace values that would stall or break the simulation with defaults
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();

        if !(self.base_speed.is_finite() && self.base_speed >= 0.0) {
            log::warn!("Invalid base_speed {}, using {}", self.base_speed, defaults.base_speed);
            self.base_speed = defaults.base_speed;
        }
        if !(self.ramp_factor.is_finite() && self.ramp_factor >= 0.0) {
            log::warn!("Invalid ramp_factor {}, using {}", self.ramp_factor, defaults.ramp_factor);
            self.ramp_factor = defaults.ramp_factor;
        }
        if !(self.row_height.is_finite() && self.row_height > 0.0) {
            log::warn!("Invalid row_height {}, using {}", self.row_height, defaults.row_height);
            self.row_height = defaults.row_height;
        }
        if self.max_row_attempts == 0 {
            log::warn!("max_row_attempts must be positive, using {}", defaults.max_row_attempts);
            self.max_row_attempts = defaults.max_row_attempts;
        }

        self
    }
}
