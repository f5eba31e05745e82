//! Electrical side of an actuator: motor nameplates and derived constants,
//! the battery/wiring supply, and current limiting.

pub mod analysis;
pub mod battery;
pub mod current_limit;
pub mod motor;

pub use analysis::MotorCurve;
pub use battery::{is_brownout, PowerSupply, BROWNOUT_VOLTAGE};
pub use current_limit::{limit_peak, CurrentLimiter, DEFAULT_WINDOW};
pub use motor::{MotorModel, MotorSpec};
