//! Device models.
//!
//! This module contains in-crate implementations of the [`Device`] trait.
//! RTL backends live outside this crate and implement the same trait.

/// Edge-triggered preload RAM reference device.
pub mod preload_ram;

pub use preload_ram::PreloadRam;

pub use crate::soc::traits::Device;
