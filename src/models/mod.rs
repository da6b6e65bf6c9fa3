pub mod checkin;
pub mod fasting;
pub mod goal;
pub mod stats;

pub use checkin::{CheckIn, Outcome};
pub use fasting::{FastDay, FastKind};
pub use goal::{Goal, GoalError, LOCK_THRESHOLD};
pub use stats::{Badge, Period, Standing, Summary};
