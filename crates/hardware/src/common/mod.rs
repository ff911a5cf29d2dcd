//! Common types and constants used throughout the driver.
//!
//! This module provides the building blocks shared across all components. It includes:
//! 1. **Constants:** Word geometry, reset sequencing, and cycle budget defaults.
//! 2. **Error Handling:** Image, arithmetic, and configuration error types.

/// Common constants used throughout the driver.
pub mod constants;

/// Error types.
pub mod error;

pub use constants::{DEFAULT_MAX_CYCLES, RESET_TOGGLES, WORD_BYTES};
pub use error::{ArithError, ConfigError, ImageError};
