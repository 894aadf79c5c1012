#![warn(clippy::all, missing_docs)]

//! Core domain logic for the wurld world clock.
//!
//! This crate hosts the clock and offset models, the ordered clock
//! registry, and config persistence used by the terminal UI and any
//! future frontends.

pub mod clock;
pub mod config;
pub mod offset;
pub mod registry;

pub use clock::{Clock, DisplaySettings};
pub use config::ConfigStore;
pub use offset::{OffsetParseError, UtcOffset};
pub use registry::ClockRegistry;
