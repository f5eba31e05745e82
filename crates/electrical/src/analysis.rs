//! Steady-state motor bank characteristics for comparing designs before
//! running a full time-domain simulation.

use crate::motor::MotorModel;

/// Sampled torque-speed curve of a motor bank at a fixed terminal voltage
#[derive(Debug, Clone)]
pub struct MotorCurve {
    pub speeds: Vec<f64>,
    pub torques: Vec<f64>,
    pub currents: Vec<f64>,
    pub powers: Vec<f64>,
    pub efficiencies: Vec<f64>,
}

impl MotorModel {
    /// Zero-current shaft speed at the given voltage (rad/s)
    pub fn free_speed(&self, voltage: f64) -> f64 {
        voltage * self.k_v()
    }

    /// Per-motor current with the shaft locked (A)
    pub fn stall_current(&self, voltage: f64) -> f64 {
        voltage / self.k_r()
    }

    /// Bank torque with the shaft locked (N·m)
    pub fn stall_torque(&self, voltage: f64) -> f64 {
        self.torque(self.stall_current(voltage))
    }

    /// Per-motor current while driving (never negative)
    pub fn current_at_speed(&self, speed: f64, voltage: f64) -> f64 {
        self.current(voltage, speed).max(0.0)
    }

    /// Bank torque while driving (never negative)
    pub fn torque_at_speed(&self, speed: f64, voltage: f64) -> f64 {
        self.torque(self.current_at_speed(speed, voltage))
    }

    /// Electrical input power of the whole bank (W)
    pub fn electrical_power(&self, speed: f64, voltage: f64) -> f64 {
        voltage * self.current_at_speed(speed, voltage) * self.motor_count() as f64
    }

    /// Mechanical output power of the whole bank (W)
    pub fn mechanical_power(&self, speed: f64, voltage: f64) -> f64 {
        self.torque_at_speed(speed, voltage) * speed
    }

    pub fn efficiency_at_speed(&self, speed: f64, voltage: f64) -> f64 {
        let electrical = self.electrical_power(speed, voltage);
        if electrical <= 0.0 {
            return 0.0;
        }
        (self.mechanical_power(speed, voltage) / electrical).clamp(0.0, 1.0)
    }

    /// Peak mechanical power, reached at half the free speed for a linear
    /// torque-speed line.
    pub fn max_power(&self, voltage: f64) -> f64 {
        self.mechanical_power(self.free_speed(voltage) / 2.0, voltage)
    }

    /// Sample `n_points` evenly spaced speeds from stall to free speed.
    pub fn torque_speed_curve(&self, voltage: f64, n_points: usize) -> MotorCurve {
        let free_speed = self.free_speed(voltage);
        let mut curve = MotorCurve {
            speeds: Vec::with_capacity(n_points),
            torques: Vec::with_capacity(n_points),
            currents: Vec::with_capacity(n_points),
            powers: Vec::with_capacity(n_points),
            efficiencies: Vec::with_capacity(n_points),
        };
        let last = n_points.saturating_sub(1).max(1) as f64;

        for i in 0..n_points {
            let speed = i as f64 / last * free_speed;
            curve.speeds.push(speed);
            curve.torques.push(self.torque_at_speed(speed, voltage));
            curve.currents.push(self.current_at_speed(speed, voltage));
            curve.powers.push(self.mechanical_power(speed, voltage));
            curve.efficiencies.push(self.efficiency_at_speed(speed, voltage));
        }

        curve
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motor::MotorSpec;

    #[test]
    fn test_cim_stall_matches_nameplate() {
        let motor = MotorModel::new(MotorSpec::cim(), 2);
        assert!((motor.stall_current(12.0) - 131.0).abs() < 1e-9);
        assert!((motor.stall_torque(12.0) - 2.0 * 2.41).abs() < 1e-9);
    }

    #[test]
    fn test_curve_length() {
        let motor = MotorModel::new(MotorSpec::pro_775(), 1);
        let curve = motor.torque_speed_curve(12.0, 100);

        assert_eq!(curve.speeds.len(), 100);
        assert_eq!(curve.torques.len(), 100);
        assert_eq!(curve.currents.len(), 100);
        assert_eq!(curve.powers.len(), 100);
        assert_eq!(curve.efficiencies.len(), 100);
    }

    #[test]
    fn test_torque_decreases_with_speed() {
        let motor = MotorModel::new(MotorSpec::cim(), 1);
        let curve = motor.torque_speed_curve(12.0, 10);

        for i in 1..curve.torques.len() {
            assert!(curve.torques[i] <= curve.torques[i - 1], "Torque should decrease with speed");
        }
        assert!(curve.torques.last().copied().unwrap_or(1.0).abs() < 1e-9);
    }

    #[test]
    fn test_power_peaks_mid_range() {
        let motor = MotorModel::new(MotorSpec::bag(), 1);
        let curve = motor.torque_speed_curve(12.0, 101);

        let max_power_idx = curve
            .powers
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
            .map(|(i, _)| i)
            .unwrap();

        assert_eq!(max_power_idx, 50);
        assert!((curve.powers[50] - motor.max_power(12.0)).abs() < 1e-9);
    }

    #[test]
    fn test_efficiency_bounded() {
        let motor = MotorModel::new(MotorSpec::cim(), 4);
        let curve = motor.torque_speed_curve(12.0, 50);
        assert!(curve.efficiencies.iter().all(|e| (0.0..=1.0).contains(e)));
        assert_eq!(curve.efficiencies[0], 0.0);
    }
}
