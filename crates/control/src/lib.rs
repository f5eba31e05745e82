//! Goal-seeking controllers for mechanism simulation
//!
//! This crate provides:
//! - The `ControlLoop` capability shared by all controllers
//! - Open-loop fixed voltage, bang-bang and PIDF variants
//! - Serializable controller configuration for scenario files

pub mod bang_bang;
pub mod config;
pub mod control_loop;
pub mod fixed_voltage;
pub mod pidf;

pub use bang_bang::*;
pub use config::*;
pub use control_loop::*;
pub use fixed_voltage::*;
pub use pidf::*;
