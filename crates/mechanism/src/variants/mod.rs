//! Mechanism variants.
//!
//! A variant only decides what the engine cannot know on its own: which way
//! gravity pulls, what presses a driven contact together, how output motion
//! maps to the gearbox, and (for shifting gearboxes) which gear is engaged.

mod arm;
mod drivetrain;
mod elevator;
mod intake_shooter;
mod shifting;

pub use arm::{Arm, ArmParams};
pub use drivetrain::{Drivetrain, DrivetrainParams};
pub use elevator::{Elevator, ElevatorParams};
pub use intake_shooter::{IntakeShooter, IntakeShooterParams};
pub use shifting::{Gear, ShiftingDrivetrain, ShiftingDrivetrainParams};

use control::ControlLoop;
use electrical::DEFAULT_WINDOW;
use serde::{Deserialize, Serialize};
use simcore::IntegrationMethod;

use crate::config::MechanismConfig;
use crate::engine::MechanismEngine;
use crate::error::Result;

/// Gear state requested by a mechanism for the next force evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GearSelection {
    pub gear_ratio: f64,
    pub sustained_limit: Option<f64>,
    /// Drop the sustained-current latch (a fresh gear gets a fresh budget)
    pub clear_latch: bool,
}

pub trait Mechanism: std::fmt::Debug {
    fn name(&self) -> &'static str;

    /// Radius converting output shaft rotation to output travel
    fn drive_radius(&self, config: &MechanismConfig) -> f64 {
        config.effective_radius
    }

    /// Mass (kg) or moment of inertia (kg·m²) being accelerated
    fn effective_inertia(&self, config: &MechanismConfig) -> f64 {
        config.effective_mass
    }

    /// Gravity force or torque opposing forward motion at `position`
    fn gravity_force(&self, config: &MechanismConfig, position: f64) -> f64;

    /// Force pressing the driven contact together, scaled by the friction
    /// coefficients to get the slip ceilings
    fn slip_normal_force(&self, config: &MechanismConfig) -> f64 {
        config.weight()
    }

    /// Called at the start of every force evaluation with the last committed
    /// velocity. `None` keeps the configured gearing.
    fn select_gear(&mut self, _velocity: f64) -> Option<GearSelection> {
        None
    }

    fn reset(&mut self) {}
}

/// Supply, limits, timing and start state shared by every variant's
/// parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunParams {
    pub sustained_current_limit: Option<f64>,
    pub peak_current_limit: Option<f64>,
    pub voltage_limit: Option<f64>,
    pub battery_voltage: f64,
    pub resistance_common: f64,
    pub resistance_branch: f64,
    pub time_step: f64,
    pub simulation_time: f64,
    pub max_distance: f64,
    pub initial_position: f64,
    pub initial_velocity: f64,
    pub current_window: usize,
    pub integration: IntegrationMethod,
}

impl Default for RunParams {
    fn default() -> Self {
        RunParams {
            sustained_current_limit: None,
            peak_current_limit: None,
            voltage_limit: None,
            battery_voltage: 12.7,
            resistance_common: 0.013,
            resistance_branch: 0.002,
            time_step: 0.001,
            simulation_time: 10.0,
            max_distance: 0.0,
            initial_position: 0.0,
            initial_velocity: 0.0,
            current_window: DEFAULT_WINDOW,
            integration: IntegrationMethod::Heun,
        }
    }
}

impl RunParams {
    /// Copy these settings over `config`.
    pub fn apply(&self, mut config: MechanismConfig) -> MechanismConfig {
        config.sustained_current_limit = self.sustained_current_limit;
        config.peak_current_limit = self.peak_current_limit;
        config.voltage_limit = self.voltage_limit;
        config.battery_voltage = self.battery_voltage;
        config.resistance_common = self.resistance_common;
        config.resistance_branch = self.resistance_branch;
        config.time_step = self.time_step;
        config.simulation_time = self.simulation_time;
        config.max_distance = self.max_distance;
        config.initial_position = self.initial_position;
        config.initial_velocity = self.initial_velocity;
        config.current_window = self.current_window;
        config.integration = self.integration;
        config
    }

    pub fn with_timing(mut self, time_step: f64, simulation_time: f64) -> Self {
        self.time_step = time_step;
        self.simulation_time = simulation_time;
        self
    }

    pub fn with_current_limits(mut self, sustained: Option<f64>, peak: Option<f64>) -> Self {
        self.sustained_current_limit = sustained;
        self.peak_current_limit = peak;
        self
    }

    pub fn with_initial_state(mut self, position: f64, velocity: f64) -> Self {
        self.initial_position = position;
        self.initial_velocity = velocity;
        self
    }
}

/// Any variant's parameters, tagged by `"type"` in scenario documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MechanismParams {
    Drivetrain(DrivetrainParams),
    Elevator(ElevatorParams),
    Arm(ArmParams),
    ShiftingDrivetrain(ShiftingDrivetrainParams),
    IntakeShooter(IntakeShooterParams),
}

impl MechanismParams {
    /// Build the engine, attaching `controller` when given.
    pub fn build(&self, controller: Option<Box<dyn ControlLoop>>) -> Result<MechanismEngine> {
        let engine = match self {
            MechanismParams::Drivetrain(p) => p.build()?,
            MechanismParams::Elevator(p) => p.build()?,
            MechanismParams::Arm(p) => p.build()?,
            MechanismParams::ShiftingDrivetrain(p) => p.build()?,
            MechanismParams::IntakeShooter(p) => return p.build(controller),
        };
        Ok(match controller {
            Some(controller) => engine.with_controller(controller),
            None => engine,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_params_tagged_by_type() {
        let params: MechanismParams = serde_json::from_str(
            r#"{ "type": "elevator", "motor": "775pro", "motor_count": 2, "gear_ratio": 20.0,
                 "carriage_mass": 5.0, "simulation_time": 2.0 }"#,
        )
        .unwrap();
        let MechanismParams::Elevator(elevator) = &params else {
            panic!("expected elevator, got {params:?}");
        };
        assert_eq!(elevator.carriage_mass, 5.0);
        assert_eq!(elevator.run.simulation_time, 2.0);
        assert_eq!(elevator.incline_angle, FRAC_PI_2);

        let engine = params.build(None).unwrap();
        assert_eq!(engine.mechanism().name(), "elevator");
        assert!(!engine.config().check_for_slip);
    }

    #[test]
    fn test_run_params_overwrite_config() {
        let run = RunParams::default()
            .with_timing(0.002, 3.0)
            .with_current_limits(Some(40.0), Some(60.0))
            .with_initial_state(0.5, -1.0);
        let config = run.apply(MechanismConfig::default());
        assert_eq!(config.time_step, 0.002);
        assert_eq!(config.simulation_time, 3.0);
        assert_eq!(config.sustained_current_limit, Some(40.0));
        assert_eq!(config.peak_current_limit, Some(60.0));
        assert_eq!(config.initial_position, 0.5);
        assert_eq!(config.initial_velocity, -1.0);
        assert_eq!(config.max_distance, 0.0);
    }
}
