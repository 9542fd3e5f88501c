//! # cadence-sync
//!
//! Drives many independently timed effects as one unit: wait until they are all
//! ready, seek them to a common logical time, play them together, and freeze them
//! at an exactly computed stop time.

pub mod clock;
pub mod engine;
pub mod synchronizer;
pub mod virtual_engine;

pub use clock::{Clock, TokioClock};
pub use engine::{PlayState, PlaybackHandle};
pub use synchronizer::{resolve_start, StartAt, Synchronizer};
pub use virtual_engine::VirtualAnimation;
