use control::{ControlLoop, FixedVoltage};
use mechanics::GravityLoad;
use serde::{Deserialize, Serialize};
use simcore::units;

use super::{Mechanism, RunParams};
use crate::config::{MechanismConfig, MotorChoice};
use crate::engine::MechanismEngine;
use crate::error::{ConfigError, Result};

/// Rollers pinching a game piece. The rollers slip against the compression
/// force rather than a weight, and the moved mass is the game piece.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntakeShooter {
    /// Force squeezing the game piece between the rollers (N)
    pub compression_force: f64,
}

impl Mechanism for IntakeShooter {
    fn name(&self) -> &'static str {
        "intake_shooter"
    }

    fn gravity_force(&self, config: &MechanismConfig, position: f64) -> f64 {
        GravityLoad::Incline { angle: config.incline_angle }.force(config.weight(), position)
    }

    fn slip_normal_force(&self, _config: &MechanismConfig) -> f64 {
        self.compression_force
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntakeShooterParams {
    pub motor: MotorChoice,
    pub motor_count: u32,
    pub gear_ratio: f64,
    /// m
    pub roller_radius: f64,
    /// Game piece mass (kg)
    pub element_mass: f64,
    /// N
    pub compression_force: f64,
    /// Travel angle above horizontal (rad)
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

impl Default for IntakeShooterParams {
    fn default() -> Self {
        IntakeShooterParams {
            motor: MotorChoice::from("bag"),
            motor_count: 1,
            gear_ratio: 3.0,
            roller_radius: units::inches_to_meters(1.0),
            element_mass: 0.25,
            compression_force: 40.0,
            incline_angle: 0.0,
            gearbox_efficiency: 0.85,
            static_resistance: 0.0,
            viscous_resistance: 0.0,
            check_for_slip: true,
            kinetic_friction: 0.8,
            static_friction: 1.0,
            run: RunParams::default(),
        }
    }
}

impl IntakeShooterParams {
    pub fn config(&self) -> MechanismConfig {
        let config = MechanismConfig {
            motor: self.motor.clone(),
            motor_count: self.motor_count,
            gear_ratio: self.gear_ratio,
            effective_radius: self.roller_radius,
            effective_mass: self.element_mass,
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

    /// Build the engine driven by `controller`, or by the full battery voltage
    /// when none is given.
    pub fn build(&self, controller: Option<Box<dyn ControlLoop>>) -> Result<MechanismEngine> {
        if !(self.compression_force > 0.0) {
            return Err(ConfigError::NonPositive {
                field: "compression_force",
                value: self.compression_force,
            });
        }
        let config = self.config();
        let controller = controller.unwrap_or_else(|| -> Box<dyn ControlLoop> {
            Box::new(FixedVoltage::new(config.battery_voltage))
        });
        let mechanism = IntakeShooter {
            compression_force: self.compression_force,
        };
        Ok(MechanismEngine::new(config, mechanism)?.with_controller(controller))
    }
}
