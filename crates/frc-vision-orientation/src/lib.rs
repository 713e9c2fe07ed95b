//! Orientation sensor collaborator.
//!
//! [`OrientationSensor`] owns an [`AhrsLink`] and, once started, polls it on
//! a named background thread. Every poll publishes one whole
//! [`OrientationSnapshot`], so readers never see a half-updated reading.
//! A link that fails to open is reported through `log::error!` and leaves the
//! sensor stopped with zero values; it never fails the caller.

mod error;
mod link;
mod sensor;

pub use error::OrientationError;
pub use link::{AhrsLink, DisconnectedAhrs, RtcDate, RtcTime};
pub use sensor::{OrientationSensor, OrientationSnapshot, DEFAULT_POLL_PERIOD};
