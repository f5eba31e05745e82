//! PIDF (Proportional-Integral-Derivative-Feedforward) Controller
//!
//! A discrete, per-step position controller. The integral accumulates raw
//! error samples (no time scaling) and only inside a small band around the
//! goal, so the mechanism does not wind up while travelling.

use serde::{Deserialize, Serialize};
use simcore::Model;

use crate::control_loop::{ControlLoop, ControllerCore, Feedback};

/// Configuration for a PIDF controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PidfConfig {
    /// Proportional gain
    pub kp: f64,
    /// Integral gain
    pub ki: f64,
    /// Derivative gain
    pub kd: f64,
    /// Feedforward gain (multiplies the goal)
    pub kf: f64,
    /// Integral band: only accumulate while |error| < min_i_error
    pub min_i_error: f64,
    /// Drop the integral whenever the error changes sign
    pub reset_integral_on_overshoot: bool,
    /// Minimum output value
    pub output_min: f64,
    /// Maximum output value
    pub output_max: f64,
}

impl Default for PidfConfig {
    fn default() -> Self {
        Self {
            kp: 0.0,
            ki: 0.0,
            kd: 0.0,
            kf: 0.0,
            min_i_error: 0.1,
            reset_integral_on_overshoot: false,
            output_min: f64::NEG_INFINITY,
            output_max: f64::INFINITY,
        }
    }
}

impl PidfConfig {
    /// Create a P-only controller
    pub fn p(kp: f64) -> Self {
        Self { kp, ..Default::default() }
    }

    /// Create a PI controller
    pub fn pi(kp: f64, ki: f64) -> Self {
        Self { kp, ki, ..Default::default() }
    }

    /// Create a PID controller
    pub fn pid(kp: f64, ki: f64, kd: f64) -> Self {
        Self { kp, ki, kd, ..Default::default() }
    }

    /// Create a PIDF controller with all gains
    pub fn pidf(kp: f64, ki: f64, kd: f64, kf: f64) -> Self {
        Self { kp, ki, kd, kf, ..Default::default() }
    }

    /// Set output limits
    pub fn with_limits(mut self, min: f64, max: f64) -> Self {
        self.output_min = min;
        self.output_max = max;
        self
    }

    /// Set the integral band
    pub fn with_min_i_error(mut self, min_i_error: f64) -> Self {
        self.min_i_error = min_i_error;
        self
    }

    pub fn with_overshoot_reset(mut self, enabled: bool) -> Self {
        self.reset_integral_on_overshoot = enabled;
        self
    }
}

/// PIDF controller with state
#[derive(Debug, Clone, PartialEq)]
pub struct Pidf {
    core: ControllerCore,
    config: PidfConfig,
    error_sum: f64,
}

impl Pidf {
    /// Create a new controller with the given configuration
    pub fn new(config: PidfConfig) -> Self {
        Self {
            core: ControllerCore::default(),
            config,
            error_sum: 0.0,
        }
    }

    /// Get the current integral accumulator value
    pub fn integral(&self) -> f64 {
        self.error_sum
    }

    /// Get a reference to the configuration
    pub fn config(&self) -> &PidfConfig {
        &self.config
    }

    /// Update the gains; accumulated state is kept
    pub fn set_config(&mut self, config: PidfConfig) {
        self.config = config;
    }
}

impl Model for Pidf {
    fn reset(&mut self) {
        self.core.reset();
        self.error_sum = 0.0;
    }
}

impl ControlLoop for Pidf {
    fn core(&self) -> &ControllerCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ControllerCore {
        &mut self.core
    }

    fn command(&mut self, feedback: &Feedback) -> f64 {
        let error = feedback.error;
        let previous = feedback.previous_error;

        if error.abs() < self.config.min_i_error {
            self.error_sum += error;
        }

        let p_term = self.config.kp * error;
        let mut i_term = self.config.ki * self.error_sum;
        let d_term = self.config.kd * (error - previous);
        let f_term = self.config.kf * feedback.goal;

        let crossed = (error > 0.0 && previous < 0.0) || (error < 0.0 && previous > 0.0);
        if self.config.reset_integral_on_overshoot && crossed {
            self.error_sum = 0.0;
            i_term = 0.0;
        }

        (p_term + i_term - d_term + f_term).clamp(self.config.output_min, self.config.output_max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_p_only_proportional_output() {
        let mut ctrl = Pidf::new(PidfConfig::p(2.0));
        ctrl.set_goal(10.0);

        // With position=4, error=6, P output should be 12
        let output = ctrl.update(4.0, 0.0, 0.0, 12.0, 0.0);
        assert!((output - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_feedforward_scales_goal() {
        let mut ctrl = Pidf::new(PidfConfig::pidf(0.0, 0.0, 0.0, 0.5));
        ctrl.set_goal(4.0);
        let output = ctrl.update(4.0, 0.0, 0.0, 12.0, 0.0);
        assert!((output - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_integral_only_inside_band() {
        let mut ctrl = Pidf::new(PidfConfig::pi(0.0, 1.0).with_min_i_error(0.5));
        ctrl.set_goal(1.0);

        // Error = 1.0, outside the band
        assert_eq!(ctrl.update(0.0, 0.0, 0.0, 12.0, 0.0), 0.0);
        assert_eq!(ctrl.integral(), 0.0);

        // Error = 0.25 twice, raw samples add up without time scaling
        ctrl.update(0.75, 0.0, 0.0, 12.0, 0.0);
        let output = ctrl.update(0.75, 0.0, 0.0, 12.0, 0.0);
        assert!((ctrl.integral() - 0.5).abs() < 1e-12);
        assert!((output - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_derivative_opposes_error_change() {
        let mut ctrl = Pidf::new(PidfConfig::pid(0.0, 0.0, 2.0));
        ctrl.set_goal(1.0);

        // previous error starts at 0, so the first step sees the full error change
        let first = ctrl.update(0.0, 0.0, 0.0, 12.0, 0.0);
        assert!((first - -2.0).abs() < 1e-12);

        // error 1.0 -> 0.5: output = -2 * (0.5 - 1.0) = 1
        let second = ctrl.update(0.5, 0.0, 0.0, 12.0, 0.0);
        assert!((second - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_overshoot_reset_drops_integral() {
        let config = PidfConfig::pi(0.0, 1.0).with_overshoot_reset(true);
        let mut ctrl = Pidf::new(config);
        ctrl.set_goal(1.0);

        ctrl.update(0.95, 0.0, 0.0, 12.0, 0.0);
        ctrl.update(0.95, 0.0, 0.0, 12.0, 0.0);
        assert!(ctrl.integral() > 0.0);

        // crossing the goal flips the error sign
        let output = ctrl.update(1.05, 0.0, 0.0, 12.0, 0.0);
        assert_eq!(output, 0.0);
        assert_eq!(ctrl.integral(), 0.0);
    }

    #[test]
    fn test_overshoot_keeps_integral_by_default() {
        let mut ctrl = Pidf::new(PidfConfig::pi(0.0, 1.0));
        ctrl.set_goal(1.0);
        ctrl.update(0.95, 0.0, 0.0, 12.0, 0.0);
        ctrl.update(1.05, 0.0, 0.0, 12.0, 0.0);
        // 0.05 + (-0.05)
        assert!(ctrl.integral().abs() < 1e-12);
        ctrl.update(0.95, 0.0, 0.0, 12.0, 0.0);
        assert!((ctrl.integral() - 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_output_saturation() {
        let mut ctrl = Pidf::new(PidfConfig::p(100.0).with_limits(-12.0, 12.0));
        ctrl.set_goal(10.0);
        assert!((ctrl.update(0.0, 0.0, 0.0, 12.0, 0.0) - 12.0).abs() < 1e-9);

        ctrl.set_goal(-10.0);
        assert!((ctrl.update(0.0, 0.0, 0.0, 12.0, 0.0) - -12.0).abs() < 1e-9);
    }

    #[test]
    fn test_reset_clears_state() {
        let mut ctrl = Pidf::new(PidfConfig::pi(1.0, 1.0));
        ctrl.set_goal(1.0);

        // Accumulate some integral
        for _ in 0..10 {
            ctrl.update(0.95, 0.0, 0.0, 12.0, 0.0);
        }
        assert!(ctrl.integral() > 0.0);

        ctrl.reset();
        assert!(ctrl.integral().abs() < 1e-12);
        assert_eq!(ctrl.get_error(), 0.0);
        assert_eq!(ctrl.goal(), 1.0);
        assert_eq!(ctrl.config().kp, 1.0);
    }
}
