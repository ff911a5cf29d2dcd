//! Device Boundary.
//!
//! This module defines the signal-level contract between the driver and the
//! simulated processor, and provides the in-crate reference device model.

/// Device model implementations.
pub mod devices;

/// Device trait definition.
pub mod traits;

pub use devices::PreloadRam;
pub use traits::Device;
