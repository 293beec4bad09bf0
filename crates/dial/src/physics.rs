use crate::error::DialError;
use serde::{Deserialize, Serialize};
use serde_with::{DurationMilliSeconds, serde_as};
use std::time::Duration;

pub const MAX_SPEED: f64 = 0.8; // rad per touch sample
pub const BRAKE_POWER: f64 = 0.01; // rad per tick
pub const BRAKE_INTERVAL: Duration = Duration::from_millis(100);
pub const CELL_WIDTH: f64 = 40.0;

pub const OFFSET_TRANSITION: Duration = Duration::from_millis(100);
pub const ADD_CELL_TRANSITION: Duration = Duration::from_millis(300);

#[serde_as]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Physics {
    pub max_speed: f64,
    pub brake_power: f64,
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    #[serde(rename = "brake_interval_ms")]
    pub brake_interval: Duration,
    pub cell_width: f64,
}

impl Default for Physics {
    fn default() -> Self {
        Self {
            max_speed: MAX_SPEED,
            brake_power: BRAKE_POWER,
            brake_interval: BRAKE_INTERVAL,
            cell_width: CELL_WIDTH,
        }
    }
}

impl Physics {
    pub fn validate(&self) -> Result<(), DialError> {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !positive(self.max_speed) {
            return Err(DialError::InvalidPhysics("max_speed must be positive"));
        }
        if !positive(self.brake_power) {
            return Err(DialError::InvalidPhysics("brake_power must be positive"));
        }
        if self.brake_interval.is_zero() {
            return Err(DialError::InvalidPhysics("brake_interval_ms must be non-zero"));
        }
        if !self.cell_width.is_finite() || self.cell_width < 0.0 {
            return Err(DialError::InvalidPhysics("cell_width must not be negative"));
        }
        Ok(())
    }
}

/// How the renderer should move cells to their new positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Immediate,
    Animated(Duration),
}
