use std::f64::consts::FRAC_PI_2;

use mechanics::GravityLoad;
use serde::{Deserialize, Serialize};

use super::{Mechanism, RunParams};
use crate::config::{MechanismConfig, MotorChoice};
use crate::engine::MechanismEngine;
use crate::error::Result;

/// Carriage lifted along a straight rail by a spool or pulley. Nothing can
/// slip, and gravity is constant along the rail.
#[derive(Debug, Clone, Copy, Default)]
pub struct Elevator;

impl Mechanism for Elevator {
    fn name(&self) -> &'static str {
        "elevator"
    }

    fn gravity_force(&self, config: &MechanismConfig, position: f64) -> f64 {
        GravityLoad::Incline { angle: config.incline_angle }.force(config.weight(), position)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElevatorParams {
    pub motor: MotorChoice,
    pub motor_count: u32,
    pub gear_ratio: f64,
    /// Spool or pulley radius (m)
    pub pulley_radius: f64,
    /// kg
    pub carriage_mass: f64,
    /// Rail angle above horizontal; vertical by default (rad)
    pub incline_angle: f64,
    pub gearbox_efficiency: f64,
    pub static_resistance: f64,
    pub viscous_resistance: f64,
    #[serde(flatten)]
    pub run: RunParams,
}

impl Default for ElevatorParams {
    fn default() -> Self {
        ElevatorParams {
            motor: MotorChoice::from("775pro"),
            motor_count: 2,
            gear_ratio: 20.0,
            pulley_radius: 0.02,
            carriage_mass: 5.0,
            incline_angle: FRAC_PI_2,
            gearbox_efficiency: 0.8,
            static_resistance: 0.0,
            viscous_resistance: 0.0,
            run: RunParams::default(),
        }
    }
}

impl ElevatorParams {
    pub fn config(&self) -> MechanismConfig {
        let config = MechanismConfig {
            motor: self.motor.clone(),
            motor_count: self.motor_count,
            gear_ratio: self.gear_ratio,
            effective_radius: self.pulley_radius,
            effective_mass: self.carriage_mass,
            incline_angle: self.incline_angle,
            gearbox_efficiency: self.gearbox_efficiency,
            static_resistance: self.static_resistance,
            viscous_resistance: self.viscous_resistance,
            check_for_slip: false,
            ..MechanismConfig::default()
        };
        self.run.apply(config)
    }

    pub fn build(&self) -> Result<MechanismEngine> {
        MechanismEngine::new(self.config(), Elevator)
    }
}
