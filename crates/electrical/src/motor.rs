use serde::{Deserialize, Serialize};
use simcore::units::rpm_to_rad_per_sec;

/// Nameplate ratings of a brushed DC motor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotorSpec {
    pub name: String,
    /// Rated voltage (V)
    pub max_voltage: f64,
    /// Free speed at rated voltage (rad/s)
    pub free_speed: f64,
    /// Stall torque at rated voltage (N·m)
    pub stall_torque: f64,
    /// Stall current at rated voltage (A)
    pub stall_current: f64,
    /// Free-running current at rated voltage (A)
    pub free_current: f64,
}

struct CatalogEntry {
    id: &'static str,
    name: &'static str,
    max_voltage: f64,
    free_speed_rpm: f64,
    stall_torque: f64,
    stall_current: f64,
    free_current: f64,
}

const fn entry(
    id: &'static str,
    name: &'static str,
    free_speed_rpm: f64,
    stall_torque: f64,
    stall_current: f64,
    free_current: f64,
) -> CatalogEntry {
    CatalogEntry {
        id,
        name,
        max_voltage: 12.0,
        free_speed_rpm,
        stall_torque,
        stall_current,
        free_current,
    }
}

const CATALOG: [CatalogEntry; 13] = [
    entry("cim", "CIM", 5330.0, 2.41, 131.0, 2.7),
    entry("minicim", "MiniCIM", 5840.0, 1.41, 89.0, 3.0),
    entry("bag", "BAG", 13180.0, 0.43, 53.0, 1.8),
    entry("775pro", "775pro", 18730.0, 0.71, 134.0, 0.7),
    entry("am9015", "AM-9015", 14270.0, 0.36, 71.0, 3.7),
    entry("amneverest", "AM NeveRest", 5480.0, 0.17, 10.0, 0.4),
    entry("amrs775125", "AM RS775-125", 5800.0, 0.28, 18.0, 1.6),
    entry("bbrs77518v", "BB RS775-18V", 13050.0, 0.72, 97.0, 2.7),
    entry("bbrs550", "BB RS550", 19000.0, 0.38, 84.0, 0.4),
    entry("neo", "NEO", 5676.0, 2.6, 105.0, 1.8),
    entry("neo550", "NEO 550", 11000.0, 0.97, 100.0, 1.4),
    entry("falcon500", "Falcon 500", 6380.0, 4.69, 257.0, 1.5),
    entry("krakenx60", "Kraken X60", 6000.0, 7.09, 366.0, 2.0),
];

fn normalize_id(id: &str) -> String {
    id.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

impl MotorSpec {
    pub fn new(
        name: impl Into<String>,
        max_voltage: f64,
        free_speed: f64,
        stall_torque: f64,
        stall_current: f64,
        free_current: f64,
    ) -> Self {
        MotorSpec {
            name: name.into(),
            max_voltage,
            free_speed,
            stall_torque,
            stall_current,
            free_current,
        }
    }

    /// Build a spec from a datasheet that lists free speed in RPM.
    pub fn from_rpm(
        name: impl Into<String>,
        max_voltage: f64,
        free_speed_rpm: f64,
        stall_torque: f64,
        stall_current: f64,
        free_current: f64,
    ) -> Self {
        Self::new(
            name,
            max_voltage,
            rpm_to_rad_per_sec(free_speed_rpm),
            stall_torque,
            stall_current,
            free_current,
        )
    }

    /// Look a motor up by identifier. Case, spaces, dashes and underscores are
    /// ignored, so `"775 Pro"`, `"775pro"` and `"_775pro"` all resolve.
    pub fn lookup(id: &str) -> Option<Self> {
        let key = normalize_id(id);
        CATALOG.iter().find(|e| e.id == key).map(|e| {
            Self::from_rpm(
                e.name,
                e.max_voltage,
                e.free_speed_rpm,
                e.stall_torque,
                e.stall_current,
                e.free_current,
            )
        })
    }

    /// Identifiers understood by [`MotorSpec::lookup`].
    pub fn catalog_ids() -> impl Iterator<Item = &'static str> {
        CATALOG.iter().map(|e| e.id)
    }

    pub fn cim() -> Self {
        Self::from_rpm("CIM", 12.0, 5330.0, 2.41, 131.0, 2.7)
    }

    pub fn pro_775() -> Self {
        Self::from_rpm("775pro", 12.0, 18730.0, 0.71, 134.0, 0.7)
    }

    pub fn bag() -> Self {
        Self::from_rpm("BAG", 12.0, 13180.0, 0.43, 53.0, 1.8)
    }

    /// True when every rating is strictly positive and the free current is
    /// below the stall current.
    pub fn is_physical(&self) -> bool {
        self.max_voltage > 0.0
            && self.free_speed > 0.0
            && self.stall_torque > 0.0
            && self.stall_current > 0.0
            && self.free_current >= 0.0
            && self.free_current < self.stall_current
    }
}

/// Steady-state electrical model of a bank of identical motors driving one
/// shaft.
///
/// `current = (V - ω / k_v) / k_r` per motor and `τ = k_t · current` for the
/// whole bank.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MotorModel {
    spec: MotorSpec,
    motor_count: u32,
    /// Winding resistance (Ω)
    k_r: f64,
    /// Speed constant ((rad/s)/V)
    k_v: f64,
    /// Bank torque constant (N·m/A)
    k_t: f64,
}

impl MotorModel {
    pub fn new(spec: MotorSpec, motor_count: u32) -> Self {
        let k_r = spec.max_voltage / spec.stall_current;
        let k_v = spec.free_speed / (spec.max_voltage - k_r * spec.free_current);
        let k_t = motor_count as f64 * spec.stall_torque / spec.stall_current;

        MotorModel {
            spec,
            motor_count,
            k_r,
            k_v,
            k_t,
        }
    }

    pub fn k_r(&self) -> f64 {
        self.k_r
    }

    pub fn k_v(&self) -> f64 {
        self.k_v
    }

    pub fn k_t(&self) -> f64 {
        self.k_t
    }

    pub fn motor_count(&self) -> u32 {
        self.motor_count
    }

    pub fn spec(&self) -> &MotorSpec {
        &self.spec
    }

    /// Per-motor current at the given terminal voltage and shaft speed.
    pub fn current(&self, voltage: f64, motor_speed: f64) -> f64 {
        (voltage - motor_speed / self.k_v) / self.k_r
    }

    /// Bank torque produced by the given per-motor current.
    pub fn torque(&self, current_per_motor: f64) -> f64 {
        self.k_t * current_per_motor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_cim_constants() {
        let motor = MotorModel::new(MotorSpec::cim(), 4);

        assert_relative_eq!(motor.k_r(), 12.0 / 131.0, epsilon = 1e-12);
        let free_speed = rpm_to_rad_per_sec(5330.0);
        assert_relative_eq!(motor.k_v(), free_speed / (12.0 - 12.0 / 131.0 * 2.7), epsilon = 1e-12);
        assert_relative_eq!(motor.k_t(), 4.0 * 2.41 / 131.0, epsilon = 1e-12);
    }

    #[test]
    fn test_constants_positive_for_catalog() {
        for id in MotorSpec::catalog_ids() {
            let spec = MotorSpec::lookup(id).expect("catalog id resolves");
            assert!(spec.is_physical(), "{id} should be physical");
            let model = MotorModel::new(spec, 2);
            assert!(model.k_r() > 0.0 && model.k_v() > 0.0 && model.k_t() > 0.0);
        }
    }

    #[test]
    fn test_lookup_normalizes_ids() {
        assert_eq!(MotorSpec::lookup("CIM"), Some(MotorSpec::cim()));
        assert_eq!(MotorSpec::lookup("_775pro"), Some(MotorSpec::pro_775()));
        assert_eq!(MotorSpec::lookup("775 Pro"), Some(MotorSpec::pro_775()));
        assert!(MotorSpec::lookup("Falcon-500").is_some());
        assert!(MotorSpec::lookup("warp drive").is_none());
    }

    #[test]
    fn test_current_at_stall_and_free_speed() {
        let spec = MotorSpec::cim();
        let motor = MotorModel::new(spec.clone(), 1);

        assert_relative_eq!(motor.current(12.0, 0.0), spec.stall_current, epsilon = 1e-9);
        assert_relative_eq!(motor.current(12.0, spec.free_speed), spec.free_current, epsilon = 1e-9);
    }

    #[test]
    fn test_bank_torque_scales_with_count() {
        let single = MotorModel::new(MotorSpec::bag(), 1);
        let triple = MotorModel::new(MotorSpec::bag(), 3);
        assert_relative_eq!(triple.torque(10.0), 3.0 * single.torque(10.0), epsilon = 1e-12);
        assert_relative_eq!(single.torque(53.0), 0.43, epsilon = 1e-12);
    }
}
