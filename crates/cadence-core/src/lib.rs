//! # cadence-core
//!
//! Core types and primitives for Cadence.
//! This crate contains foundational types shared across all Cadence crates:
//! millisecond time values, the error taxonomy, and configuration.

pub mod config;
pub mod error;
pub mod time;

pub use config::*;

pub use error::{CadenceError, CadenceResult};
pub use time::{Duration, LogicalTime};
