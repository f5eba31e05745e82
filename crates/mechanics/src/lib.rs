pub mod friction;
pub mod link;
pub mod load;

pub use friction::{ContactFriction, ResistiveLoad, SlipDetector};
pub use link::DriveLink;
pub use load::GravityLoad;
