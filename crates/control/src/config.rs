use serde::{Deserialize, Serialize};

use crate::bang_bang::{BangBang, BangBangConfig};
use crate::control_loop::ControlLoop;
use crate::fixed_voltage::{FixedVoltage, FixedVoltageConfig};
use crate::pidf::{Pidf, PidfConfig};

/// Which controller to build, with its gains.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ControllerKind {
    FixedVoltage(FixedVoltageConfig),
    BangBang(BangBangConfig),
    Pidf(PidfConfig),
}

/// A controller as it appears in a scenario document.
///
/// ```json
/// { "type": "pidf", "kp": 50.0, "ki": 0.1, "goal": 1.0, "deadband": 0.01 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControllerConfig {
    #[serde(default)]
    pub goal: f64,
    #[serde(default)]
    pub deadband: f64,
    #[serde(flatten)]
    pub kind: ControllerKind,
}

impl ControllerConfig {
    pub fn new(kind: ControllerKind, goal: f64, deadband: f64) -> Self {
        ControllerConfig { goal, deadband, kind }
    }

    pub fn build(&self) -> Box<dyn ControlLoop> {
        let mut controller: Box<dyn ControlLoop> = match &self.kind {
            ControllerKind::FixedVoltage(cfg) => Box::new(FixedVoltage::new(cfg.voltage)),
            ControllerKind::BangBang(cfg) => Box::new(BangBang::new(*cfg)),
            ControllerKind::Pidf(cfg) => Box::new(Pidf::new(cfg.clone())),
        };
        controller.set_goal(self.goal);
        controller.set_deadband(self.deadband);
        controller
    }
}
