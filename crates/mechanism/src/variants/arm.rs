use mechanics::GravityLoad;
use serde::{Deserialize, Serialize};

use super::{Mechanism, RunParams};
use crate::config::{MechanismConfig, MotorChoice};
use crate::engine::MechanismEngine;
use crate::error::Result;

/// Single-jointed arm. Position is the angle above horizontal (rad) and the
/// output is a torque, so the drive radius is 1 and the effective radius is
/// the pivot to centre-of-gravity distance.
#[derive(Debug, Clone, Copy, Default)]
pub struct Arm;

impl Mechanism for Arm {
    fn name(&self) -> &'static str {
        "arm"
    }

    fn drive_radius(&self, _config: &MechanismConfig) -> f64 {
        1.0
    }

    /// Point mass at the centre of gravity
    fn effective_inertia(&self, config: &MechanismConfig) -> f64 {
        config.effective_mass * config.effective_radius.powi(2)
    }

    fn gravity_force(&self, config: &MechanismConfig, position: f64) -> f64 {
        GravityLoad::Rotary { moment_arm: config.effective_radius }.force(config.weight(), position)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArmParams {
    pub motor: MotorChoice,
    pub motor_count: u32,
    pub gear_ratio: f64,
    /// Pivot to centre of gravity (m)
    pub cg_distance: f64,
    /// kg
    pub arm_mass: f64,
    pub gearbox_efficiency: f64,
    /// N·m
    pub static_resistance: f64,
    /// N·m/(rad/s)
    pub viscous_resistance: f64,
    #[serde(flatten)]
    pub run: RunParams,
}

impl Default for ArmParams {
    fn default() -> Self {
        ArmParams {
            motor: MotorChoice::from("775pro"),
            motor_count: 1,
            gear_ratio: 150.0,
            cg_distance: 0.4,
            arm_mass: 4.0,
            gearbox_efficiency: 0.7,
            static_resistance: 0.0,
            viscous_resistance: 0.0,
            run: RunParams::default(),
        }
    }
}

impl ArmParams {
    pub fn config(&self) -> MechanismConfig {
        let config = MechanismConfig {
            motor: self.motor.clone(),
            motor_count: self.motor_count,
            gear_ratio: self.gear_ratio,
            effective_radius: self.cg_distance,
            effective_mass: self.arm_mass,
            incline_angle: 0.0,
            gearbox_efficiency: self.gearbox_efficiency,
            static_resistance: self.static_resistance,
            viscous_resistance: self.viscous_resistance,
            check_for_slip: false,
            ..MechanismConfig::default()
        };
        self.run.apply(config)
    }

    pub fn build(&self) -> Result<MechanismEngine> {
        MechanismEngine::new(self.config(), Arm)
    }
}
