//! Cycle-accurate driver for simulated processor models.
//!
//! This crate drives an RTL processor model one clock edge at a time:
//! 1. **Device boundary:** The [`Device`] trait over clock, reset, preload, and status signals.
//! 2. **Loading:** Hex, raw binary, and ELF program images packed into preload words.
//! 3. **Driver:** Reset sequencing, preload streaming, and a budgeted execution loop.
//! 4. **Soft arithmetic:** Multiply/divide helpers for cores without the M extension.
//! 5. **Support:** Configuration, a reference device model, and run statistics.

/// Common types and constants (word geometry, protocol defaults, errors).
pub mod common;
/// Driver configuration (defaults, hierarchical config structures, validation).
pub mod config;
/// Program loading, session state, and the driver state machine.
pub mod sim;
/// Device trait and the reference device model.
pub mod soc;
/// Shift-and-add multiply and restoring long division.
pub mod softmath;
/// Run statistics collection and reporting.
pub mod stats;

/// Root configuration type; use `Config::default()` or `Config::from_json`.
pub use crate::config::Config;
/// Loaded program: ordered preload words.
pub use crate::sim::ProgramImage;
/// Driver in the loading phase; construct with `Simulator::new`.
pub use crate::sim::Simulator;
/// Signal-level interface of the simulated processor.
pub use crate::soc::Device;
