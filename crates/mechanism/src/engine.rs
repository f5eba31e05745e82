//! Fixed-step simulation of one motor bank driving one mechanism.
//!
//! Every evaluation of the force balance runs the same pipeline:
//! gear selection, applied voltage, motor current, sustained and peak current
//! limits, output force, slip ceiling, bus sag and brownout, resistive and
//! gravity loads, and finally acceleration.

use control::ControlLoop;
use electrical::{CurrentLimiter, MotorModel, PowerSupply, is_brownout, limit_peak};
use log::{debug, info};
use mechanics::{ResistiveLoad, SlipDetector};
use serde_json::json;
use simcore::{Integrator, Kinematics, Model, SimContext};

use crate::config::MechanismConfig;
use crate::error::Result;
use crate::state::{DataField, DataPoint, MechanismState, RunSummary};
use crate::variants::Mechanism;

#[derive(Debug)]
pub struct MechanismEngine {
    config: MechanismConfig,
    motor: MotorModel,
    supply: PowerSupply,
    resistance: ResistiveLoad,
    mechanism: Box<dyn Mechanism>,
    controller: Option<Box<dyn ControlLoop>>,
    state: MechanismState,
    data_points: Vec<DataPoint>,
}

impl MechanismEngine {
    pub fn new(config: MechanismConfig, mechanism: impl Mechanism + 'static) -> Result<Self> {
        Self::from_boxed(config, Box::new(mechanism))
    }

    pub fn from_boxed(config: MechanismConfig, mechanism: Box<dyn Mechanism>) -> Result<Self> {
        config.validate()?;
        let motor = MotorModel::new(config.motor.resolve()?, config.motor_count);
        let state = Self::initial_state(&config);

        Ok(MechanismEngine {
            supply: config.supply(),
            resistance: config.resistance(),
            motor,
            mechanism,
            controller: None,
            state,
            data_points: Vec::new(),
            config,
        })
    }

    fn initial_state(config: &MechanismConfig) -> MechanismState {
        MechanismState {
            time: 0.0,
            kinematics: Kinematics::at_rest(config.initial_position).with_velocity(config.initial_velocity),
            branch_voltage: config.battery_voltage,
            desired_voltage: f64::INFINITY,
            applied_voltage: 0.0,
            current_per_motor: 0.0,
            drive_force: 0.0,
            gravity_force: 0.0,
            limiter: CurrentLimiter::new(config.current_window),
            slip: SlipDetector::new(config.friction()),
            brownout: false,
            step_energy: 0.0,
            total_energy: 0.0,
            gear_ratio: config.gear_ratio,
            sustained_limit: config.sustained_current_limit,
        }
    }

    /// Attach a controller; its output becomes the requested motor voltage.
    pub fn with_controller(mut self, controller: Box<dyn ControlLoop>) -> Self {
        self.set_controller(Some(controller));
        self
    }

    pub fn set_controller(&mut self, controller: Option<Box<dyn ControlLoop>>) {
        self.controller = controller;
        self.reset();
    }

    /// The same engine re-geared, with all run state cleared.
    pub fn with_gear_ratio(mut self, gear_ratio: f64) -> Result<Self> {
        self.config.gear_ratio = gear_ratio;
        self.config.validate()?;
        self.reset();
        Ok(self)
    }

    pub fn config(&self) -> &MechanismConfig {
        &self.config
    }

    pub fn motor(&self) -> &MotorModel {
        &self.motor
    }

    pub fn state(&self) -> &MechanismState {
        &self.state
    }

    pub fn mechanism(&self) -> &dyn Mechanism {
        self.mechanism.as_ref()
    }

    pub fn controller(&self) -> Option<&dyn ControlLoop> {
        self.controller.as_deref()
    }

    pub fn get_data_points(&self) -> &[DataPoint] {
        &self.data_points
    }

    pub fn final_point(&self) -> Option<&DataPoint> {
        self.data_points.last()
    }

    /// Last logged value of a column.
    pub fn get_final(&self, field: DataField) -> Option<f64> {
        self.final_point()?.get(field)
    }

    /// True once an attached controller reports it is on its goal.
    pub fn is_done(&self) -> bool {
        self.controller.as_ref().is_some_and(|c| c.is_done())
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary::from_points(&self.data_points)
    }

    /// Configuration plus the derived motor constants, for export.
    pub fn config_snapshot(&self) -> serde_json::Value {
        json!({
            "mechanism": self.mechanism.name(),
            "config": self.config,
            "motor": self.motor,
            "drive_radius": self.mechanism.drive_radius(&self.config),
            "effective_inertia": self.mechanism.effective_inertia(&self.config),
        })
    }

    /// Clear the log and all run state; configuration, mechanism parameters
    /// and controller gains are kept.
    pub fn reset(&mut self) {
        self.state = Self::initial_state(&self.config);
        self.data_points.clear();
        self.mechanism.reset();
        if let Some(controller) = self.controller.as_mut() {
            controller.reset();
        }
    }

    /// Run from t = 0 until the duration or travel limit is reached.
    ///
    /// Always starts from a freshly reset state, so repeated calls produce the
    /// same log.
    pub fn calc(&mut self) {
        self.reset();
        let dt = self.config.time_step;
        info!(
            "simulating {}: {}x {} @ {:.3}:1 for {} s",
            self.mechanism.name(),
            self.motor.motor_count(),
            self.motor.spec().name,
            self.config.gear_ratio,
            self.config.simulation_time
        );

        self.update_controller();
        let Kinematics { position, velocity, .. } = self.state.kinematics;
        self.state.kinematics.acceleration = self.calc_accel(position, velocity);
        self.add_data_point();

        while self.should_continue() {
            self.state.time += dt;
            self.update_controller();

            let ctx = SimContext::new(dt, self.state.time);
            let method = self.config.integration;
            let start = self.state.kinematics;
            let (position, velocity) = method.advance(&ctx, start, &mut |x, v| self.calc_accel(x, v));

            self.state.kinematics.position = position;
            self.state.kinematics.velocity = velocity;
            self.state.kinematics.acceleration = self.calc_accel(position, velocity);

            self.state.step_energy = self.state.current_per_motor * dt * 1000.0 / 3600.0;
            self.state.total_energy += self.state.step_energy * self.motor.motor_count() as f64;
            self.state.limiter.record(self.state.current_per_motor);

            self.add_data_point();
        }

        let summary = self.summary();
        info!(
            "{} finished at t={:.3} s: position {:.4}, velocity {:.4}, peak current {:.1} A, min voltage {:.2} V, {:.1} mAh",
            self.mechanism.name(),
            summary.final_time,
            summary.final_position,
            summary.final_velocity,
            summary.peak_current,
            summary.min_branch_voltage,
            summary.total_energy
        );
    }

    fn should_continue(&self) -> bool {
        let travel = self.state.position() - self.config.initial_position;
        self.state.time < self.config.simulation_time
            && (self.config.max_distance <= 0.0 || travel < self.config.max_distance)
    }

    fn update_controller(&mut self) {
        if let Some(controller) = self.controller.as_mut() {
            let k = self.state.kinematics;
            self.state.desired_voltage = controller.update(
                k.position,
                k.velocity,
                k.acceleration,
                self.state.branch_voltage,
                self.state.current_per_motor,
            );
        }
    }

    /// Net acceleration at `(position, velocity)`.
    ///
    /// Updates the electrical side of the state (current, bus voltage, slip,
    /// brownout) as a side effect; the bus voltage computed here feeds the
    /// next evaluation.
    fn calc_accel(&mut self, position: f64, velocity: f64) -> f64 {
        let config = &self.config;
        let state = &mut self.state;

        if let Some(gear) = self.mechanism.select_gear(state.kinematics.velocity) {
            if gear.clear_latch {
                state.limiter.clear_latch();
            }
            state.gear_ratio = gear.gear_ratio;
            state.sustained_limit = gear.sustained_limit;
        }

        let link = config
            .drive_link(self.mechanism.drive_radius(config))
            .with_gear_ratio(state.gear_ratio);
        let motor_speed = link.motor_speed(velocity);

        let available_voltage = match config.voltage_limit {
            Some(limit) => state.branch_voltage.min(limit),
            None => state.branch_voltage,
        };
        state.applied_voltage = state.desired_voltage.min(available_voltage);

        let current = self.motor.current(state.applied_voltage, motor_speed);
        let current = state.limiter.limit(current, velocity, state.sustained_limit);
        let current = limit_peak(current, config.peak_current_limit);
        state.current_per_motor = current;

        let mut force = link.output_force(self.motor.torque(current));
        state.drive_force = force;

        if config.check_for_slip {
            let was_slipping = state.slip.is_slipping();
            force = state.slip.update(force, self.mechanism.slip_normal_force(config));
            if state.slip.is_slipping() != was_slipping {
                debug!(
                    "slip {} at t={:.3} s (drive force {:.1})",
                    if was_slipping { "cleared" } else { "onset" },
                    state.time,
                    state.drive_force
                );
            }
        }

        state.branch_voltage = self.supply.branch_voltage(current, self.motor.motor_count());
        let brownout = is_brownout(state.branch_voltage);
        if brownout && !state.brownout {
            debug!("brownout at t={:.3} s ({:.2} V)", state.time, state.branch_voltage);
        }
        state.brownout = brownout;

        state.gravity_force = self.mechanism.gravity_force(config, position);
        let mut net_force = force - self.resistance.force(velocity) - state.gravity_force;

        // a mechanism resting on its start point is not dragged backwards
        if net_force < 0.0 && position <= config.initial_position {
            net_force = 0.0;
        }

        net_force / self.mechanism.effective_inertia(config)
    }

    fn add_data_point(&mut self) {
        let state = &self.state;
        let current = state.current_per_motor;
        self.data_points.push(DataPoint {
            time: state.time,
            position: state.position(),
            velocity: state.velocity(),
            acceleration: state.acceleration(),
            voltage: state.applied_voltage,
            current,
            total_current: current * self.motor.motor_count() as f64,
            branch_voltage: state.branch_voltage,
            drive_force: state.drive_force,
            energy: state.step_energy,
            total_energy: state.total_energy,
            slipping: state.slip.is_slipping(),
            brownout: state.brownout,
            current_limited: state.limiter.is_latched(),
            gravity: state.gravity_force,
            gear_ratio: state.gear_ratio,
            controller: self.controller.as_ref().map(|c| c.snapshot()),
        });
    }
}

impl Model for MechanismEngine {
    fn reset(&mut self) {
        MechanismEngine::reset(self);
    }
}
