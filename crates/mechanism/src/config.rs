//! Mechanism configuration, in SI units.

use electrical::{MotorSpec, PowerSupply, DEFAULT_WINDOW};
use mechanics::{ContactFriction, DriveLink, ResistiveLoad};
use serde::{Deserialize, Serialize};
use simcore::units;
use simcore::IntegrationMethod;

use crate::error::{ConfigError, Result};

/// A motor from the catalog by id (`"cim"`, `"775pro"`, ...) or a full
/// nameplate for anything else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MotorChoice {
    Catalog(String),
    Custom(MotorSpec),
}

impl MotorChoice {
    pub fn resolve(&self) -> Result<MotorSpec> {
        match self {
            MotorChoice::Catalog(id) => {
                MotorSpec::lookup(id).ok_or_else(|| ConfigError::UnknownMotor(id.clone()))
            }
            MotorChoice::Custom(spec) => Ok(spec.clone()),
        }
    }
}

impl From<&str> for MotorChoice {
    fn from(id: &str) -> Self {
        MotorChoice::Catalog(id.to_string())
    }
}

impl From<MotorSpec> for MotorChoice {
    fn from(spec: MotorSpec) -> Self {
        MotorChoice::Custom(spec)
    }
}

/// Everything that stays fixed for one simulation run.
///
/// Linear mechanisms use metres, kilograms and newtons; rotary ones use
/// radians and newton-metres for the same fields (see the mechanism variants).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MechanismConfig {
    pub motor: MotorChoice,
    pub motor_count: u32,
    /// Motor speed / output shaft speed
    pub gear_ratio: f64,
    /// Wheel, pulley or arm length (m)
    pub effective_radius: f64,
    /// Moved mass (kg)
    pub effective_mass: f64,
    /// Angle of travel above horizontal (rad)
    pub incline_angle: f64,
    pub gearbox_efficiency: f64,
    /// Constant tuned resistance (N)
    pub static_resistance: f64,
    /// Velocity-proportional tuned resistance (N/(m/s))
    pub viscous_resistance: f64,
    pub check_for_slip: bool,
    pub kinetic_friction: f64,
    pub static_friction: f64,
    /// Per-motor sustained current limit (A)
    pub sustained_current_limit: Option<f64>,
    /// Per-motor peak current limit (A)
    pub peak_current_limit: Option<f64>,
    /// Cap on the voltage applied to each motor (V)
    pub voltage_limit: Option<f64>,
    /// Fully-charged open-circuit battery voltage (V)
    pub battery_voltage: f64,
    /// Battery to distribution board resistance (Ω)
    pub resistance_common: f64,
    /// Distribution board to motor resistance (Ω)
    pub resistance_branch: f64,
    /// Integration step (s)
    pub time_step: f64,
    /// Run duration (s)
    pub simulation_time: f64,
    /// Stop once the output has travelled this far; <= 0 never stops early
    pub max_distance: f64,
    pub initial_position: f64,
    pub initial_velocity: f64,
    /// Samples in the sustained-current averaging window
    pub current_window: usize,
    pub integration: IntegrationMethod,
}

impl Default for MechanismConfig {
    /// A 150 lb robot on four CIMs through 12.75:1 to 6 in wheels.
    fn default() -> Self {
        MechanismConfig {
            motor: MotorChoice::from("cim"),
            motor_count: 4,
            gear_ratio: 12.75,
            effective_radius: units::inches_to_meters(3.0),
            effective_mass: units::pounds_to_kilograms(150.0),
            incline_angle: 0.0,
            gearbox_efficiency: 0.7,
            static_resistance: units::pounds_force_to_newtons(10.0),
            viscous_resistance: 0.0,
            check_for_slip: true,
            kinetic_friction: 0.8,
            static_friction: 1.0,
            sustained_current_limit: None,
            peak_current_limit: None,
            voltage_limit: None,
            battery_voltage: 12.7,
            resistance_common: 0.013,
            resistance_branch: 0.002,
            time_step: 0.001,
            simulation_time: 100.0,
            max_distance: units::feet_to_meters(30.0),
            initial_position: 0.0,
            initial_velocity: 0.0,
            current_window: DEFAULT_WINDOW,
            integration: IntegrationMethod::Heun,
        }
    }
}

pub(crate) fn positive(field: &'static str, value: f64) -> Result<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

pub(crate) fn positive_limit(field: &'static str, limit: Option<f64>) -> Result<()> {
    match limit {
        Some(value) => positive(field, value),
        None => Ok(()),
    }
}

impl MechanismConfig {
    /// Parse a JSON document (missing fields take their defaults) and validate it.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: MechanismConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let spec = self.motor.resolve()?;
        if !spec.is_physical() {
            return Err(ConfigError::OutOfRange {
                field: "motor",
                value: spec.free_current,
                reason: "ratings must be positive and free current below stall current",
            });
        }
        if self.motor_count == 0 {
            return Err(ConfigError::OutOfRange {
                field: "motor_count",
                value: 0.0,
                reason: "at least one motor is required",
            });
        }

        positive("gear_ratio", self.gear_ratio)?;
        positive("effective_radius", self.effective_radius)?;
        positive("effective_mass", self.effective_mass)?;
        positive("battery_voltage", self.battery_voltage)?;
        positive("time_step", self.time_step)?;
        positive("simulation_time", self.simulation_time)?;
        positive_limit("sustained_current_limit", self.sustained_current_limit)?;
        positive_limit("peak_current_limit", self.peak_current_limit)?;
        positive_limit("voltage_limit", self.voltage_limit)?;

        if !(self.gearbox_efficiency > 0.0 && self.gearbox_efficiency <= 1.0) {
            return Err(ConfigError::OutOfRange {
                field: "gearbox_efficiency",
                value: self.gearbox_efficiency,
                reason: "must be in (0, 1]",
            });
        }
        if self.resistance_common < 0.0 || self.resistance_branch < 0.0 {
            return Err(ConfigError::OutOfRange {
                field: "resistance",
                value: self.resistance_common.min(self.resistance_branch),
                reason: "wiring resistance cannot be negative",
            });
        }
        if self.check_for_slip && self.kinetic_friction > self.static_friction {
            return Err(ConfigError::OutOfRange {
                field: "kinetic_friction",
                value: self.kinetic_friction,
                reason: "must not exceed static friction",
            });
        }
        if self.current_window == 0 {
            return Err(ConfigError::OutOfRange {
                field: "current_window",
                value: 0.0,
                reason: "window needs at least one sample",
            });
        }
        Ok(())
    }

    /// Weight of the moved mass (N)
    pub fn weight(&self) -> f64 {
        units::weight_of(self.effective_mass)
    }

    pub fn supply(&self) -> PowerSupply {
        PowerSupply::new(self.battery_voltage, self.resistance_common, self.resistance_branch)
    }

    pub fn resistance(&self) -> ResistiveLoad {
        ResistiveLoad::new(self.static_resistance, self.viscous_resistance)
    }

    pub fn friction(&self) -> ContactFriction {
        ContactFriction {
            kinetic: self.kinetic_friction,
            r#static: self.static_friction,
        }
    }

    /// Gearbox between the motors and the output, for a given drive radius.
    pub fn drive_link(&self, radius: f64) -> DriveLink {
        DriveLink::new(self.gear_ratio, radius, self.gearbox_efficiency)
    }

    pub fn with_motor(mut self, motor: impl Into<MotorChoice>, count: u32) -> Self {
        self.motor = motor.into();
        self.motor_count = count;
        self
    }

    pub fn with_gear_ratio(mut self, gear_ratio: f64) -> Self {
        self.gear_ratio = gear_ratio;
        self
    }

    pub fn with_radius(mut self, radius: f64) -> Self {
        self.effective_radius = radius;
        self
    }

    pub fn with_mass(mut self, mass: f64) -> Self {
        self.effective_mass = mass;
        self
    }

    pub fn with_incline(mut self, angle: f64) -> Self {
        self.incline_angle = angle;
        self
    }

    pub fn with_efficiency(mut self, efficiency: f64) -> Self {
        self.gearbox_efficiency = efficiency;
        self
    }

    pub fn with_resistance(mut self, static_force: f64, viscous_coeff: f64) -> Self {
        self.static_resistance = static_force;
        self.viscous_resistance = viscous_coeff;
        self
    }

    pub fn with_slip(mut self, kinetic: f64, r#static: f64) -> Self {
        self.check_for_slip = true;
        self.kinetic_friction = kinetic;
        self.static_friction = r#static;
        self
    }

    pub fn without_slip(mut self) -> Self {
        self.check_for_slip = false;
        self
    }

    pub fn with_current_limits(mut self, sustained: Option<f64>, peak: Option<f64>) -> Self {
        self.sustained_current_limit = sustained;
        self.peak_current_limit = peak;
        self
    }

    pub fn with_voltage_limit(mut self, limit: Option<f64>) -> Self {
        self.voltage_limit = limit;
        self
    }

    pub fn with_supply(mut self, battery_voltage: f64, resistance_common: f64, resistance_branch: f64) -> Self {
        self.battery_voltage = battery_voltage;
        self.resistance_common = resistance_common;
        self.resistance_branch = resistance_branch;
        self
    }

    pub fn with_timing(mut self, time_step: f64, simulation_time: f64) -> Self {
        self.time_step = time_step;
        self.simulation_time = simulation_time;
        self
    }

    pub fn with_max_distance(mut self, max_distance: f64) -> Self {
        self.max_distance = max_distance;
        self
    }

    pub fn with_initial_state(mut self, position: f64, velocity: f64) -> Self {
        self.initial_position = position;
        self.initial_velocity = velocity;
        self
    }

    pub fn with_current_window(mut self, samples: usize) -> Self {
        self.current_window = samples;
        self
    }

    pub fn with_integration(mut self, method: IntegrationMethod) -> Self {
        self.integration = method;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = MechanismConfig::default();
        assert!(config.validate().is_ok());
        assert!((config.effective_radius - 0.0762).abs() < 1e-12);
        assert!((config.max_distance - 9.144).abs() < 1e-9);
    }

    #[test]
    fn test_drive_link_follows_config() {
        let config = MechanismConfig::default().with_gear_ratio(10.0).with_efficiency(0.9);
        let link = config.drive_link(0.05);
        assert_eq!(link.gear_ratio, 10.0);
        assert_eq!(link.efficiency, 0.9);
        // 1 N·m through 10:1 onto a 5 cm radius at 90 %
        assert!((link.output_force(1.0) - 180.0).abs() < 1e-9);
        assert!((link.with_gear_ratio(5.0).output_force(1.0) - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_from_json_fills_defaults() {
        let config = MechanismConfig::from_json(r#"{ "motor": "775pro", "motor_count": 2 }"#).unwrap();
        assert_eq!(config.motor, MotorChoice::from("775pro"));
        assert_eq!(config.motor_count, 2);
        assert_eq!(config.gear_ratio, 12.75);
        assert_eq!(config.current_window, 20);
    }

    #[test]
    fn test_custom_motor_from_json() {
        let config = MechanismConfig::from_json(
            r#"{ "motor": { "name": "test", "max_voltage": 12.0, "free_speed": 500.0,
                 "stall_torque": 2.0, "stall_current": 100.0, "free_current": 2.0 } }"#,
        )
        .unwrap();
        let spec = config.motor.resolve().unwrap();
        assert_eq!(spec.name, "test");
        assert_eq!(spec.free_speed, 500.0);
    }

    #[test]
    fn test_unknown_motor_rejected() {
        let err = MechanismConfig::default().with_motor("warp drive", 1).validate().unwrap_err();
        assert!(matches!(err, ConfigError::UnknownMotor(id) if id == "warp drive"));
    }

    #[test]
    fn test_non_positive_fields_rejected() {
        let err = MechanismConfig::default().with_radius(0.0).validate().unwrap_err();
        assert!(matches!(err, ConfigError::NonPositive { field: "effective_radius", .. }));

        let err = MechanismConfig::default().with_timing(-0.001, 1.0).validate().unwrap_err();
        assert!(matches!(err, ConfigError::NonPositive { field: "time_step", .. }));

        let err = MechanismConfig::default()
            .with_current_limits(Some(0.0), None)
            .validate()
            .unwrap_err();
        assert!(matches!(err, ConfigError::NonPositive { field: "sustained_current_limit", .. }));
    }

    #[test]
    fn test_out_of_range_fields_rejected() {
        let err = MechanismConfig::default().with_efficiency(1.2).validate().unwrap_err();
        assert!(matches!(err, ConfigError::OutOfRange { field: "gearbox_efficiency", .. }));

        let err = MechanismConfig::default().with_slip(1.2, 1.0).validate().unwrap_err();
        assert!(matches!(err, ConfigError::OutOfRange { field: "kinetic_friction", .. }));

        // without slip checking the friction pair is never used
        assert!(MechanismConfig::default().with_slip(1.2, 1.0).without_slip().validate().is_ok());

        let err = MechanismConfig::default().with_motor("cim", 0).validate().unwrap_err();
        assert!(matches!(err, ConfigError::OutOfRange { field: "motor_count", .. }));
    }

    #[test]
    fn test_malformed_json_is_a_config_error() {
        let err = MechanismConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }
}
