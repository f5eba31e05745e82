use serde::{Deserialize, Serialize};

/// Position, velocity and acceleration of the mechanism output.
///
/// Units follow the mechanism: metres for linear outputs, radians for
/// rotary ones.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Kinematics {
    pub position: f64,
    pub velocity: f64,
    pub acceleration: f64,
}

impl Kinematics {
    pub fn at_rest(position: f64) -> Self {
        Kinematics {
            position,
            velocity: 0.0,
            acceleration: 0.0,
        }
    }

    pub fn with_velocity(mut self, velocity: f64) -> Self {
        self.velocity = velocity;
        self
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SimContext {
    pub dt: f64,
    pub t: f64,
}

impl SimContext {
    pub fn new(dt: f64, t: f64) -> Self {
        SimContext { dt, t }
    }
}

pub trait Model {
    fn reset(&mut self);
}
