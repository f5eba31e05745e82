use serde::{Deserialize, Serialize};
use simcore::Model;

use crate::control_loop::{ControlLoop, ControllerCore, Feedback};

/// Open-loop controller: always commands the same voltage.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedVoltage {
    core: ControllerCore,
    voltage: f64,
}

impl FixedVoltage {
    pub fn new(voltage: f64) -> Self {
        FixedVoltage {
            core: ControllerCore::default(),
            voltage,
        }
    }

    pub fn voltage(&self) -> f64 {
        self.voltage
    }

    pub fn set_voltage(&mut self, voltage: f64) {
        self.voltage = voltage;
    }
}

/// Serializable form of [`FixedVoltage`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FixedVoltageConfig {
    pub voltage: f64,
}

impl Model for FixedVoltage {
    fn reset(&mut self) {
        self.core.reset();
    }
}

impl ControlLoop for FixedVoltage {
    fn core(&self) -> &ControllerCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ControllerCore {
        &mut self.core
    }

    fn command(&mut self, _feedback: &Feedback) -> f64 {
        self.voltage
    }
}
