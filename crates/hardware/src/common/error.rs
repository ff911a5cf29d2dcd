//! Error definitions.
//!
//! This module defines the error types surfaced by the driver crate. It provides:
//! 1. **Image Errors:** Failures while reading or parsing a program image (hex, binary, or ELF).
//! 2. **Arithmetic Errors:** Fail conditions of the soft multiply/divide routines.
//! 3. **Configuration Errors:** Failures while loading or validating a [`Config`](crate::Config).
//!
//! A timed-out run is not an error; it is reported through
//! [`RunOutcome::TimedOut`](crate::sim::RunOutcome::TimedOut).

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building a [`ProgramImage`](crate::sim::ProgramImage).
///
/// Any of these aborts the load phase before the device sees a single preload word.
#[derive(Debug, Error)]
pub enum ImageError {
    /// The image file could not be read.
    #[error("could not read image '{}': {source}", path.display())]
    Io {
        /// Path that failed to open.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// An `@` line does not hold a valid 32-bit hexadecimal address.
    #[error("line {line}: invalid load address '{text}'")]
    InvalidAddress {
        /// 1-based line number.
        line: usize,
        /// Text following the `@` marker.
        text: String,
    },

    /// A data line token is not exactly two hexadecimal digits.
    #[error("line {line}: invalid byte token '{token}'")]
    InvalidByte {
        /// 1-based line number.
        line: usize,
        /// The offending token.
        token: String,
    },

    /// A word would be placed past the end of the 32-bit address space.
    #[error("line {line}: load address overflows the 32-bit address space")]
    AddressOverflow {
        /// 1-based line number.
        line: usize,
    },

    /// The input could not be read as an ELF executable.
    #[error("invalid ELF image: {0}")]
    Elf(String),
}

/// Fail conditions of the soft arithmetic routines.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum ArithError {
    /// The denominator of a divide or remainder was zero.
    #[error("division by zero")]
    DivisionByZero,
}

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("could not read config '{}': {source}", path.display())]
    Io {
        /// Path that failed to open.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The configuration text is not valid JSON for [`Config`](crate::Config).
    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),

    /// A field holds a value the driver cannot honor.
    #[error("invalid config: {0}")]
    Invalid(String),
}
