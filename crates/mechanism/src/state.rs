use control::ControllerSnapshot;
use electrical::CurrentLimiter;
use mechanics::SlipDetector;
use serde::{Deserialize, Serialize};
use simcore::Kinematics;

/// Mutable simulation state, owned by one engine.
#[derive(Debug, Clone, PartialEq)]
pub struct MechanismState {
    pub time: f64,
    pub kinematics: Kinematics,
    /// Voltage available at each motor's terminals for the next evaluation (V)
    pub branch_voltage: f64,
    /// Controller output, unbounded when no controller is attached (V)
    pub desired_voltage: f64,
    /// Voltage actually applied to each motor in the last evaluation (V)
    pub applied_voltage: f64,
    pub current_per_motor: f64,
    /// Force the motors deliver at the output, before slip (N or N·m)
    pub drive_force: f64,
    pub gravity_force: f64,
    pub limiter: CurrentLimiter,
    pub slip: SlipDetector,
    pub brownout: bool,
    /// Charge drawn per motor during the last step (mAh)
    pub step_energy: f64,
    /// Charge drawn by the whole bank so far (mAh)
    pub total_energy: f64,
    pub gear_ratio: f64,
    pub sustained_limit: Option<f64>,
}

impl MechanismState {
    pub fn position(&self) -> f64 {
        self.kinematics.position
    }

    pub fn velocity(&self) -> f64 {
        self.kinematics.velocity
    }

    pub fn acceleration(&self) -> f64 {
        self.kinematics.acceleration
    }
}

/// One logged sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub time: f64,
    pub position: f64,
    pub velocity: f64,
    pub acceleration: f64,
    /// Voltage applied to each motor: the controller request capped by what
    /// the branch can deliver
    pub voltage: f64,
    pub current: f64,
    pub total_current: f64,
    pub branch_voltage: f64,
    pub drive_force: f64,
    pub energy: f64,
    pub total_energy: f64,
    pub slipping: bool,
    pub brownout: bool,
    pub current_limited: bool,
    pub gravity: f64,
    pub gear_ratio: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub controller: Option<ControllerSnapshot>,
}

/// Scalar columns of a [`DataPoint`], for plotting and export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataField {
    Time,
    Position,
    Velocity,
    Acceleration,
    Voltage,
    Current,
    TotalCurrent,
    BranchVoltage,
    DriveForce,
    Energy,
    TotalEnergy,
    Slipping,
    Brownout,
    CurrentLimited,
    Gravity,
    GearRatio,
    ControllerGoal,
    ControllerError,
    OnGoal,
}

impl DataField {
    pub const ALL: [DataField; 19] = [
        DataField::Time,
        DataField::Position,
        DataField::Velocity,
        DataField::Acceleration,
        DataField::Voltage,
        DataField::Current,
        DataField::TotalCurrent,
        DataField::BranchVoltage,
        DataField::DriveForce,
        DataField::Energy,
        DataField::TotalEnergy,
        DataField::Slipping,
        DataField::Brownout,
        DataField::CurrentLimited,
        DataField::Gravity,
        DataField::GearRatio,
        DataField::ControllerGoal,
        DataField::ControllerError,
        DataField::OnGoal,
    ];

    pub fn is_controller_field(&self) -> bool {
        matches!(self, DataField::ControllerGoal | DataField::ControllerError | DataField::OnGoal)
    }
}

fn flag(value: bool) -> f64 {
    if value { 1.0 } else { 0.0 }
}

impl DataPoint {
    /// Value of one column. Flags read as 0/1; controller columns are `None`
    /// when no controller was attached.
    pub fn get(&self, field: DataField) -> Option<f64> {
        let value = match field {
            DataField::Time => self.time,
            DataField::Position => self.position,
            DataField::Velocity => self.velocity,
            DataField::Acceleration => self.acceleration,
            DataField::Voltage => self.voltage,
            DataField::Current => self.current,
            DataField::TotalCurrent => self.total_current,
            DataField::BranchVoltage => self.branch_voltage,
            DataField::DriveForce => self.drive_force,
            DataField::Energy => self.energy,
            DataField::TotalEnergy => self.total_energy,
            DataField::Slipping => flag(self.slipping),
            DataField::Brownout => flag(self.brownout),
            DataField::CurrentLimited => flag(self.current_limited),
            DataField::Gravity => self.gravity,
            DataField::GearRatio => self.gear_ratio,
            DataField::ControllerGoal => self.controller?.goal,
            DataField::ControllerError => self.controller?.error,
            DataField::OnGoal => flag(self.controller?.on_goal),
        };
        Some(value)
    }
}

/// Headline numbers of a finished run.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RunSummary {
    pub samples: usize,
    pub final_time: f64,
    pub final_position: f64,
    pub final_velocity: f64,
    pub peak_current: f64,
    pub min_branch_voltage: f64,
    pub total_energy: f64,
    pub brownout_occurred: bool,
    pub slip_occurred: bool,
    pub current_limited: bool,
    pub on_goal: Option<bool>,
}

impl RunSummary {
    pub fn from_points(points: &[DataPoint]) -> Self {
        let Some(last) = points.last() else {
            return RunSummary::default();
        };
        RunSummary {
            samples: points.len(),
            final_time: last.time,
            final_position: last.position,
            final_velocity: last.velocity,
            peak_current: points.iter().map(|p| p.current).fold(f64::NEG_INFINITY, f64::max),
            min_branch_voltage: points.iter().map(|p| p.branch_voltage).fold(f64::INFINITY, f64::min),
            total_energy: last.total_energy,
            brownout_occurred: points.iter().any(|p| p.brownout),
            slip_occurred: points.iter().any(|p| p.slipping),
            current_limited: last.current_limited,
            on_goal: last.controller.map(|c| c.on_goal),
        }
    }
}
