//! Motor-driven mechanism simulation.
//!
//! A [`MechanismEngine`] couples a bank of DC motors, the battery feeding
//! them and an optional controller to one mechanism variant, and integrates
//! the result at a fixed time step into a log of [`DataPoint`]s.

pub mod config;
pub mod engine;
pub mod error;
pub mod state;
pub mod variants;

pub use config::{MechanismConfig, MotorChoice};
pub use engine::MechanismEngine;
pub use error::ConfigError;
pub use state::{DataField, DataPoint, MechanismState, RunSummary};
pub use variants::*;
