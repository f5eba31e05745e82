//! Drive Link - Couples a motor bank to the mechanism output
//!
//! Provides:
//! - Gear ratio and radius conversions (motor shaft to output)
//! - Gearbox efficiency losses in torque transfer

use serde::{Deserialize, Serialize};

/// Gearbox plus wheel/pulley/arm between the motor shaft and the output.
///
/// Convention:
/// - `gear_ratio` = motor speed / output shaft speed (e.g. 12.75 for 12.75:1)
/// - `radius` converts output shaft rotation to linear travel. Rotary outputs
///   use a radius of 1.0 so that "force" is torque and "velocity" is angular.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DriveLink {
    pub gear_ratio: f64,
    pub radius: f64,
    pub efficiency: f64,
}

impl Default for DriveLink {
    fn default() -> Self {
        DriveLink {
            gear_ratio: 1.0,
            radius: 1.0,
            efficiency: 1.0,
        }
    }
}

impl DriveLink {
    pub fn new(gear_ratio: f64, radius: f64, efficiency: f64) -> Self {
        DriveLink {
            gear_ratio,
            radius,
            efficiency,
        }
    }

    pub fn with_gear_ratio(mut self, gear_ratio: f64) -> Self {
        self.gear_ratio = gear_ratio;
        self
    }

    /// Motor shaft speed (rad/s) for a given output velocity
    pub fn motor_speed(&self, output_velocity: f64) -> f64 {
        output_velocity / self.radius * self.gear_ratio
    }

    /// Force (or torque, for rotary links) at the output for a given motor
    /// bank torque, after gearbox losses.
    pub fn output_force(&self, motor_torque: f64) -> f64 {
        self.efficiency * motor_torque * self.gear_ratio / self.radius
    }
}
