use serde::{Deserialize, Serialize};

/// Bus voltage below which the robot controller browns out (V)
pub const BROWNOUT_VOLTAGE: f64 = 7.0;

/// Battery plus wiring as seen by one motor branch.
///
/// The battery is modelled as an ideal open-circuit source. All motors share
/// the common path (battery internal resistance, main breaker, distribution
/// board), and each motor has its own branch (breaker and leads).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerSupply {
    /// Fully-charged open-circuit voltage (V)
    pub open_circuit_voltage: f64,
    /// Battery to distribution board resistance, shared by every motor (Ω)
    pub resistance_common: f64,
    /// Distribution board to motor resistance, per motor (Ω)
    pub resistance_branch: f64,
}

impl Default for PowerSupply {
    fn default() -> Self {
        PowerSupply {
            open_circuit_voltage: 12.7,
            resistance_common: 0.013,
            resistance_branch: 0.002,
        }
    }
}

impl PowerSupply {
    pub fn new(open_circuit_voltage: f64, resistance_common: f64, resistance_branch: f64) -> Self {
        PowerSupply {
            open_circuit_voltage,
            resistance_common,
            resistance_branch,
        }
    }

    /// Voltage at a motor's terminals when every motor in the bank draws
    /// `current_per_motor`.
    pub fn branch_voltage(&self, current_per_motor: f64, motor_count: u32) -> f64 {
        self.open_circuit_voltage
            - current_per_motor * self.resistance_branch
            - motor_count as f64 * current_per_motor * self.resistance_common
    }
}

pub fn is_brownout(voltage: f64) -> bool {
    voltage < BROWNOUT_VOLTAGE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_load_is_open_circuit() {
        let supply = PowerSupply::default();
        assert!((supply.branch_voltage(0.0, 4) - 12.7).abs() < 1e-12);
    }

    #[test]
    fn test_common_resistance_scales_with_bank() {
        let supply = PowerSupply::new(12.0, 0.01, 0.0);
        // 4 motors at 50 A each pull 200 A through 10 mΩ
        assert!((supply.branch_voltage(50.0, 4) - 10.0).abs() < 1e-12);
        assert!((supply.branch_voltage(50.0, 1) - 11.5).abs() < 1e-12);
    }

    #[test]
    fn test_brownout_threshold_is_strict() {
        assert!(!is_brownout(7.0));
        assert!(is_brownout(6.999));
        assert!(!is_brownout(12.0));
    }
}
