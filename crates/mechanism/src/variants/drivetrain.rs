use mechanics::GravityLoad;
use serde::{Deserialize, Serialize};
use simcore::units;

use super::{Mechanism, RunParams};
use crate::config::{MechanismConfig, MotorChoice};
use crate::engine::MechanismEngine;
use crate::error::Result;

/// Wheeled robot driving on flat ground or up a ramp. Wheels slip against
/// the robot's weight.
#[derive(Debug, Clone, Copy, Default)]
pub struct Drivetrain;

impl Mechanism for Drivetrain {
    fn name(&self) -> &'static str {
        "drivetrain"
    }

    fn gravity_force(&self, config: &MechanismConfig, position: f64) -> f64 {
        GravityLoad::Incline { angle: config.incline_angle }.force(config.weight(), position)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrivetrainParams {
    pub motor: MotorChoice,
    pub motor_count: u32,
    pub gear_ratio: f64,
    /// m
    pub wheel_radius: f64,
    /// kg
    pub robot_mass: f64,
    /// rad
    pub incline_angle: f64,
    pub gearbox_efficiency: f64,
    pub static_resistance: f64,
    pub viscous_resistance: f64,
    pub check_for_slip: bool,
    pub kinetic_friction: f64,
    pub static_friction: f64,
    #[serde(flatten)]
    pub run: RunParams,
}

impl Default for DrivetrainParams {
    fn default() -> Self {
        DrivetrainParams {
            motor: MotorChoice::from("cim"),
            motor_count: 4,
            gear_ratio: 12.75,
            wheel_radius: units::inches_to_meters(3.0),
            robot_mass: units::pounds_to_kilograms(150.0),
            incline_angle: 0.0,
            gearbox_efficiency: 0.7,
            static_resistance: units::pounds_force_to_newtons(10.0),
            viscous_resistance: 0.0,
            check_for_slip: true,
            kinetic_friction: 0.8,
            static_friction: 1.0,
            run: RunParams::default(),
        }
    }
}

impl DrivetrainParams {
    pub fn config(&self) -> MechanismConfig {
        let config = MechanismConfig {
            motor: self.motor.clone(),
            motor_count: self.motor_count,
            gear_ratio: self.gear_ratio,
            effective_radius: self.wheel_radius,
            effective_mass: self.robot_mass,
            incline_angle: self.incline_angle,
            gearbox_efficiency: self.gearbox_efficiency,
            static_resistance: self.static_resistance,
            viscous_resistance: self.viscous_resistance,
            check_for_slip: self.check_for_slip,
            kinetic_friction: self.kinetic_friction,
            static_friction: self.static_friction,
            ..MechanismConfig::default()
        };
        self.run.apply(config)
    }

    pub fn build(&self) -> Result<MechanismEngine> {
        MechanismEngine::new(self.config(), Drivetrain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_flat_ground_has_no_gravity() {
        let config = DrivetrainParams::default().config();
        assert_eq!(Drivetrain.gravity_force(&config, 3.0), 0.0);
        assert_relative_eq!(Drivetrain.slip_normal_force(&config), config.weight());
    }

    #[test]
    fn test_ramp_pulls_back() {
        let params = DrivetrainParams {
            incline_angle: units::degrees_to_radians(30.0),
            ..Default::default()
        };
        let config = params.config();
        assert_relative_eq!(Drivetrain.gravity_force(&config, 0.0), config.weight() * 0.5, max_relative = 1e-12);
    }

    #[test]
    fn test_stops_at_max_distance() {
        let params = DrivetrainParams {
            check_for_slip: false,
            run: RunParams {
                max_distance: 1.0,
                ..RunParams::default()
            },
            ..Default::default()
        };
        let mut engine = params.build().unwrap();
        engine.calc();

        let points = engine.get_data_points();
        let last = points.last().unwrap();
        assert!(last.position >= 1.0);
        assert!(points[points.len() - 2].position < 1.0);
        assert!(last.time < 10.0);
    }
}
