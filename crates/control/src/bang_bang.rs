use serde::{Deserialize, Serialize};
use simcore::Model;

use crate::control_loop::{ControlLoop, ControllerCore, Feedback};

/// Output levels for a [`BangBang`] controller (V)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BangBangConfig {
    pub forward_voltage: f64,
    pub reverse_voltage: f64,
    pub neutral_voltage: f64,
}

impl Default for BangBangConfig {
    fn default() -> Self {
        BangBangConfig {
            forward_voltage: 12.0,
            reverse_voltage: -12.0,
            neutral_voltage: 0.0,
        }
    }
}

/// Three-level controller: full forward below the deadband, full reverse
/// above it, neutral inside it (edges included).
#[derive(Debug, Clone, PartialEq)]
pub struct BangBang {
    core: ControllerCore,
    config: BangBangConfig,
}

impl BangBang {
    pub fn new(config: BangBangConfig) -> Self {
        BangBang {
            core: ControllerCore::default(),
            config,
        }
    }

    pub fn config(&self) -> &BangBangConfig {
        &self.config
    }
}

impl Model for BangBang {
    fn reset(&mut self) {
        self.core.reset();
    }
}

impl ControlLoop for BangBang {
    fn core(&self) -> &ControllerCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ControllerCore {
        &mut self.core
    }

    fn command(&mut self, feedback: &Feedback) -> f64 {
        let deadband = self.core.deadband();
        if feedback.position < feedback.goal - deadband {
            self.config.forward_voltage
        } else if feedback.position > feedback.goal + deadband {
            self.config.reverse_voltage
        } else {
            self.config.neutral_voltage
        }
    }
}
