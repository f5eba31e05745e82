//! Shared simulation primitives: kinematic state, the reset capability,
//! fixed-step integrators and unit conversion.

pub mod integrators;
pub mod traits;
pub mod units;

pub use integrators::{ForwardEuler, Heun, IntegrationMethod, Integrator};
pub use traits::*;
