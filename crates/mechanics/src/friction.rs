//! Resistive loads and contact slip.

use serde::{Deserialize, Serialize};
use simcore::Model;

/// Tuned resistance opposing forward motion: a constant part plus a part
/// proportional to velocity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ResistiveLoad {
    /// Constant resistance (N, or N·m for rotary outputs)
    pub static_force: f64,
    /// Velocity-proportional resistance (N/(m/s), or N·m/(rad/s))
    pub viscous_coeff: f64,
}

impl ResistiveLoad {
    pub fn new(static_force: f64, viscous_coeff: f64) -> Self {
        ResistiveLoad {
            static_force,
            viscous_coeff,
        }
    }

    /// Resistance at the given velocity. Never pushes the mechanism forward.
    pub fn force(&self, velocity: f64) -> f64 {
        (self.static_force + self.viscous_coeff * velocity).max(0.0)
    }
}

/// Coulomb friction coefficients of a contact interface
/// (wheel on carpet, roller on game piece).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContactFriction {
    pub kinetic: f64,
    pub r#static: f64,
}

impl Default for ContactFriction {
    fn default() -> Self {
        ContactFriction {
            kinetic: 0.8,
            r#static: 1.0,
        }
    }
}

/// Tracks whether a driven contact is slipping.
///
/// Slip starts once the drive force exceeds the static-friction ceiling and
/// stops only once it falls below the kinetic-friction ceiling; in between
/// the previous state holds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlipDetector {
    friction: ContactFriction,
    slipping: bool,
}

impl SlipDetector {
    pub fn new(friction: ContactFriction) -> Self {
        SlipDetector {
            friction,
            slipping: false,
        }
    }

    pub fn is_slipping(&self) -> bool {
        self.slipping
    }

    pub fn friction(&self) -> ContactFriction {
        self.friction
    }

    /// Kinetic ceiling: the most force the contact transfers while slipping.
    pub fn kinetic_ceiling(&self, normal_force: f64) -> f64 {
        normal_force * self.friction.kinetic
    }

    pub fn static_ceiling(&self, normal_force: f64) -> f64 {
        normal_force * self.friction.r#static
    }

    /// Re-evaluate the slip state and return the force actually transferred.
    pub fn update(&mut self, available_force: f64, normal_force: f64) -> f64 {
        if available_force > self.static_ceiling(normal_force) {
            self.slipping = true;
        } else if available_force < self.kinetic_ceiling(normal_force) {
            self.slipping = false;
        }
        self.applied(available_force, normal_force)
    }

    /// Force transferred under the current slip state, without re-evaluating it.
    pub fn applied(&self, available_force: f64, normal_force: f64) -> f64 {
        if self.slipping {
            self.kinetic_ceiling(normal_force)
        } else {
            available_force
        }
    }
}

impl Model for SlipDetector {
    fn reset(&mut self) {
        self.slipping = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detector() -> SlipDetector {
        SlipDetector::new(ContactFriction { kinetic: 0.8, r#static: 1.0 })
    }

    #[test]
    fn test_resistance_never_negative() {
        let load = ResistiveLoad::new(10.0, 2.0);
        assert!((load.force(1.0) - 12.0).abs() < 1e-12);
        assert_eq!(load.force(-10.0), 0.0);
    }

    #[test]
    fn test_grip_below_static_ceiling() {
        let mut slip = detector();
        assert_eq!(slip.update(90.0, 100.0), 90.0);
        assert!(!slip.is_slipping());
    }

    #[test]
    fn test_slip_caps_at_kinetic_ceiling() {
        let mut slip = detector();
        assert_eq!(slip.update(150.0, 100.0), 80.0);
        assert!(slip.is_slipping());
    }

    #[test]
    fn test_hysteresis_band_holds_state() {
        let mut slip = detector();

        // inside the band from rest: still gripping
        slip.update(90.0, 100.0);
        assert!(!slip.is_slipping());

        // break loose, then fall back into the band: still slipping
        slip.update(101.0, 100.0);
        for force in [99.0, 95.0, 85.0, 80.0] {
            assert_eq!(slip.update(force, 100.0), 80.0);
            assert!(slip.is_slipping());
        }

        // below the kinetic ceiling the contact regains grip
        assert_eq!(slip.update(79.0, 100.0), 79.0);
        assert!(!slip.is_slipping());
        slip.update(95.0, 100.0);
        assert!(!slip.is_slipping());
    }

    #[test]
    fn test_reset_regains_grip() {
        let mut slip = detector();
        slip.update(500.0, 100.0);
        slip.reset();
        assert!(!slip.is_slipping());
    }
}
