use serde::{Deserialize, Serialize};

use crate::types::Reading;

/// Alert limits in g.
///
/// `x` and `y` are compared by magnitude. `z` carries gravity, so it is
/// compared by its deviation from `z_baseline`. Every bound is inclusive: a
/// reading exactly on a limit does not alert.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertThresholds {
    pub x_max: f64,
    pub y_max: f64,
    pub z_offset_max: f64,
    pub z_baseline: f64,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            x_max: 1.5,
            y_max: 1.5,
            z_offset_max: 2.5,
            z_baseline: -9.8,
        }
    }
}

impl AlertThresholds {
    pub fn z_offset(&self, z: f64) -> f64 {
        (z - self.z_baseline).abs()
    }

    pub fn within_limits(&self, reading: &Reading) -> bool {
        reading.x.abs() <= self.x_max
            && reading.y.abs() <= self.y_max
            && self.z_offset(reading.z) <= self.z_offset_max
    }

    pub fn is_breached(&self, reading: &Reading) -> bool {
        !self.within_limits(reading)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries_are_inclusive() {
        let limits = AlertThresholds::default();
        assert!(limits.within_limits(&Reading::new(1.5, 0.0, -9.8)));
        assert!(limits.within_limits(&Reading::new(-1.5, -1.5, -7.5)));
        assert!(limits.is_breached(&Reading::new(1.5001, 0.0, -9.8)));
        assert!(limits.is_breached(&Reading::new(0.0, -1.6, -9.8)));
    }

    #[test]
    fn z_is_measured_against_gravity() {
        let limits = AlertThresholds::default();
        assert!(limits.within_limits(&Reading::new(0.0, 0.0, -9.8)));
        assert!(limits.is_breached(&Reading::new(0.0, 0.0, -6.0)));
        assert!(limits.is_breached(&Reading::new(0.0, 0.0, -12.5)));
        assert!(limits.is_breached(&Reading::new(0.0, 0.0, 0.0)));
    }
}
