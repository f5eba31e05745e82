use log::debug;
use mechanics::GravityLoad;
use serde::{Deserialize, Serialize};
use simcore::units;

use super::{GearSelection, Mechanism, RunParams};
use crate::config::{MechanismConfig, MotorChoice, positive, positive_limit};
use crate::engine::MechanismEngine;
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gear {
    #[default]
    Low,
    High,
}

/// Two-speed drivetrain that upshifts above a fixed velocity.
///
/// Each gear carries its own sustained current limit. Entering high gear
/// clears the sustained-current latch; there is no hysteresis band, so the
/// gearbox downshifts as soon as velocity is back at or below the threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct ShiftingDrivetrain {
    pub low_gear_ratio: f64,
    pub high_gear_ratio: f64,
    /// m/s
    pub shift_velocity: f64,
    pub low_gear_current_limit: Option<f64>,
    pub high_gear_current_limit: Option<f64>,
    gear: Gear,
}

impl ShiftingDrivetrain {
    pub fn new(low_gear_ratio: f64, high_gear_ratio: f64, shift_velocity: f64) -> Self {
        ShiftingDrivetrain {
            low_gear_ratio,
            high_gear_ratio,
            shift_velocity,
            low_gear_current_limit: None,
            high_gear_current_limit: None,
            gear: Gear::Low,
        }
    }

    pub fn with_current_limits(mut self, low: Option<f64>, high: Option<f64>) -> Self {
        self.low_gear_current_limit = low;
        self.high_gear_current_limit = high;
        self
    }

    pub fn gear(&self) -> Gear {
        self.gear
    }
}

impl Mechanism for ShiftingDrivetrain {
    fn name(&self) -> &'static str {
        "shifting_drivetrain"
    }

    fn gravity_force(&self, config: &MechanismConfig, position: f64) -> f64 {
        GravityLoad::Incline { angle: config.incline_angle }.force(config.weight(), position)
    }

    fn select_gear(&mut self, velocity: f64) -> Option<GearSelection> {
        let previous = self.gear;
        self.gear = if velocity > self.shift_velocity { Gear::High } else { Gear::Low };
        if self.gear != previous {
            debug!("shifted {:?} -> {:?} at {:.3} m/s", previous, self.gear, velocity);
        }

        Some(match self.gear {
            Gear::High => GearSelection {
                gear_ratio: self.high_gear_ratio,
                sustained_limit: self.high_gear_current_limit,
                clear_latch: previous == Gear::Low,
            },
            Gear::Low => GearSelection {
                gear_ratio: self.low_gear_ratio,
                sustained_limit: self.low_gear_current_limit,
                clear_latch: false,
            },
        })
    }

    fn reset(&mut self) {
        self.gear = Gear::Low;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShiftingDrivetrainParams {
    pub motor: MotorChoice,
    pub motor_count: u32,
    pub low_gear_ratio: f64,
    pub high_gear_ratio: f64,
    /// m/s
    pub shift_velocity: f64,
    pub low_gear_current_limit: Option<f64>,
    pub high_gear_current_limit: Option<f64>,
    /// m
    pub wheel_radius: f64,
    /// kg
    pub robot_mass: f64,
    /// rad
    pub incline_angle: f64,
    pub gearbox_efficiency: f64,
    pub static_resistance: f64,
    pub viscous_resistance: f64,
    pub kinetic_friction: f64,
    pub static_friction: f64,
    #[serde(flatten)]
    pub run: RunParams,
}

impl Default for ShiftingDrivetrainParams {
    fn default() -> Self {
        ShiftingDrivetrainParams {
            motor: MotorChoice::from("cim"),
            motor_count: 4,
            low_gear_ratio: 15.0,
            high_gear_ratio: 8.0,
            shift_velocity: 2.0,
            low_gear_current_limit: None,
            high_gear_current_limit: None,
            wheel_radius: units::inches_to_meters(3.0),
            robot_mass: units::pounds_to_kilograms(150.0),
            incline_angle: 0.0,
            gearbox_efficiency: 0.7,
            static_resistance: 0.0,
            viscous_resistance: 0.0,
            kinetic_friction: 0.8,
            static_friction: 1.0,
            run: RunParams::default(),
        }
    }
}

impl ShiftingDrivetrainParams {
    /// Configuration as it stands in low gear
    pub fn config(&self) -> MechanismConfig {
        let config = MechanismConfig {
            motor: self.motor.clone(),
            motor_count: self.motor_count,
            gear_ratio: self.low_gear_ratio,
            effective_radius: self.wheel_radius,
            effective_mass: self.robot_mass,
            incline_angle: self.incline_angle,
            gearbox_efficiency: self.gearbox_efficiency,
            static_resistance: self.static_resistance,
            viscous_resistance: self.viscous_resistance,
            check_for_slip: true,
            kinetic_friction: self.kinetic_friction,
            static_friction: self.static_friction,
            ..MechanismConfig::default()
        };
        let mut config = self.run.apply(config);
        config.sustained_current_limit = self.low_gear_current_limit;
        config
    }

    pub fn mechanism(&self) -> ShiftingDrivetrain {
        ShiftingDrivetrain::new(self.low_gear_ratio, self.high_gear_ratio, self.shift_velocity)
            .with_current_limits(self.low_gear_current_limit, self.high_gear_current_limit)
    }

    /// Build the engine. The low gear is checked through the engine
    /// configuration; the high gear and shift point are checked here.
    pub fn build(&self) -> Result<MechanismEngine> {
        positive("high_gear_ratio", self.high_gear_ratio)?;
        positive("shift_velocity", self.shift_velocity)?;
        positive_limit("high_gear_current_limit", self.high_gear_current_limit)?;
        MechanismEngine::new(self.config(), self.mechanism())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;

    fn limited_params() -> ShiftingDrivetrainParams {
        ShiftingDrivetrainParams {
            low_gear_current_limit: Some(40.0),
            high_gear_current_limit: Some(40.0),
            run: RunParams::default().with_timing(0.001, 4.0),
            ..Default::default()
        }
    }

    #[test]
    fn test_gear_follows_velocity() {
        let mut shifter = ShiftingDrivetrain::new(15.0, 8.0, 2.0).with_current_limits(Some(60.0), Some(40.0));

        let low = shifter.select_gear(1.0).unwrap();
        assert_eq!(low.gear_ratio, 15.0);
        assert_eq!(low.sustained_limit, Some(60.0));
        assert!(!low.clear_latch);

        // exactly at the threshold stays low
        assert_eq!(shifter.select_gear(2.0).unwrap().gear_ratio, 15.0);

        let high = shifter.select_gear(2.1).unwrap();
        assert_eq!(high.gear_ratio, 8.0);
        assert_eq!(high.sustained_limit, Some(40.0));
        assert!(high.clear_latch);
        assert_eq!(shifter.gear(), Gear::High);

        // only the transition clears the latch
        assert!(!shifter.select_gear(2.5).unwrap().clear_latch);

        assert_eq!(shifter.select_gear(1.9).unwrap().gear_ratio, 15.0);
        shifter.select_gear(3.0);
        shifter.reset();
        assert_eq!(shifter.gear(), Gear::Low);
    }

    #[test]
    fn test_upshift_clears_latch_once() {
        let mut engine = limited_params().build().unwrap();
        engine.calc();
        let points = engine.get_data_points();

        let shift = points.iter().position(|p| p.gear_ratio == 8.0).unwrap();
        assert!(shift > 0);
        assert!(points[shift].velocity > 2.0);
        assert!(points[..shift].iter().all(|p| p.gear_ratio == 15.0));
        assert!(points[shift..].iter().all(|p| p.gear_ratio == 8.0));

        // latched in low gear, fresh in high gear, latched again shortly after
        assert!(points[shift - 1].current_limited);
        assert!(!points[shift].current_limited);
        assert!(points[shift..].iter().any(|p| p.current_limited));
    }

    #[test]
    fn test_rejects_bad_high_gear() {
        let zero_ratio = ShiftingDrivetrainParams {
            high_gear_ratio: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            zero_ratio.build(),
            Err(ConfigError::NonPositive { field: "high_gear_ratio", .. })
        ));

        let negative_limit = ShiftingDrivetrainParams {
            high_gear_current_limit: Some(-5.0),
            ..Default::default()
        };
        assert!(matches!(
            negative_limit.build(),
            Err(ConfigError::NonPositive { field: "high_gear_current_limit", .. })
        ));

        let no_shift_point = ShiftingDrivetrainParams {
            shift_velocity: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            no_shift_point.build(),
            Err(ConfigError::NonPositive { field: "shift_velocity", .. })
        ));

        // the low gear goes through the engine's own validation
        let negative_low_limit = ShiftingDrivetrainParams {
            low_gear_current_limit: Some(-5.0),
            ..Default::default()
        };
        assert!(matches!(
            negative_low_limit.build(),
            Err(ConfigError::NonPositive { field: "sustained_current_limit", .. })
        ));
        assert!(ShiftingDrivetrainParams::default().build().is_ok());
    }

    #[test]
    fn test_wheels_slip_at_launch() {
        let mut engine = limited_params().build().unwrap();
        engine.calc();
        let points = engine.get_data_points();

        assert!(points[0].slipping);
        assert!(!points[50].slipping);
        assert!(engine.summary().slip_occurred);
    }
}
