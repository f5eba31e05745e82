use serde::{Deserialize, Serialize};

/// Gravity acting against the mechanism output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GravityLoad {
    /// Flat ground, or a horizontal roller/flywheel
    #[default]
    None,
    /// Travel along a straight line inclined from horizontal (rad).
    /// An elevator is an incline of 90°.
    Incline { angle: f64 },
    /// Pivoting arm whose position is its angle above horizontal (rad).
    /// `moment_arm` is the pivot to centre-of-gravity distance (m).
    Rotary { moment_arm: f64 },
}

impl GravityLoad {
    /// Force (N) or torque (N·m, rotary) that gravity applies against forward
    /// motion with the given weight at the given position.
    pub fn force(&self, weight: f64, position: f64) -> f64 {
        match self {
            GravityLoad::None => 0.0,
            GravityLoad::Incline { angle } => weight * angle.sin(),
            GravityLoad::Rotary { moment_arm } => weight * position.cos() * moment_arm,
        }
    }
}
