//! Configuration system for the driver.
//!
//! This module defines the configuration structures used to parameterize a run. It provides:
//! 1. **Defaults:** Baseline protocol constants (cycle budget, reset toggles, image path).
//! 2. **Structures:** Hierarchical config for general, driver, and reference-device settings.
//! 3. **Loading:** JSON parsing from a string or file, followed by validation.
//!
//! Every field has a default, so an empty JSON object (`{}`) is a complete configuration.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::common::ConfigError;

/// Default configuration constants.
///
/// These values define the baseline run when not explicitly overridden in a
/// JSON configuration file.
mod defaults {
    use crate::common::constants;

    /// Execution cycle budget before a run is declared timed out.
    pub const MAX_CYCLES: u64 = constants::DEFAULT_MAX_CYCLES;

    /// Clock toggles performed with reset held.
    pub const RESET_TOGGLES: u32 = constants::RESET_TOGGLES;

    /// Program image loaded when no path is given on the command line.
    pub const IMAGE_PATH: &str = "src/main/resources/program.hex";

    /// Cycles between progress log lines (0 disables progress reporting).
    pub const PROGRESS_INTERVAL: u64 = 0;

    /// Base byte address of the reference device RAM.
    pub const RAM_BASE: u32 = 0;

    /// Size of the reference device RAM (64 KiB).
    pub const RAM_SIZE: usize = 64 * 1024;

    /// Address of the word the reference device watches for a termination value.
    ///
    /// The last word of the default RAM window.
    pub const TOHOST: u32 = 0xFFFC;
}

/// Root configuration structure.
///
/// # Examples
///
/// ```
/// use dutsim_core::config::Config;
///
/// let json = r#"{
///     "general": { "trace_cycles": true },
///     "driver": { "max_cycles": 1000 },
///     "device": { "halt_after": 25 }
/// }"#;
///
/// let config = Config::from_json(json).unwrap();
/// assert!(config.general.trace_cycles);
/// assert_eq!(config.driver.max_cycles, 1000);
/// assert_eq!(config.driver.reset_toggles, 10);
/// assert_eq!(config.device.halt_after, Some(25));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General run settings
    pub general: GeneralConfig,
    /// Reset, preload, and execution-loop parameters
    pub driver: DriverConfig,
    /// Reference device geometry
    pub device: DeviceConfig,
}

impl Config {
    /// Parses and validates a JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and
    /// [`ConfigError::Invalid`] when validation fails.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses, and validates a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the file cannot be read, otherwise
    /// the errors of [`Config::from_json`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Checks that every field holds a value the driver can honor.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.driver.validate()?;
        self.device.validate()
    }
}

/// General run settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Emit a trace-level log line for every execution cycle
    pub trace_cycles: bool,

    /// Emit an info-level progress line every N execution cycles (0 disables)
    pub progress_interval: u64,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            trace_cycles: false,
            progress_interval: defaults::PROGRESS_INTERVAL,
        }
    }
}

/// Reset, preload, and execution-loop parameters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DriverConfig {
    /// Execution cycles allowed before the run is declared timed out
    #[serde(default = "DriverConfig::default_max_cycles")]
    pub max_cycles: u64,

    /// Clock toggles performed while reset is held (must be even)
    #[serde(default = "DriverConfig::default_reset_toggles")]
    pub reset_toggles: u32,

    /// Program image loaded when no path is given explicitly
    #[serde(default = "DriverConfig::default_image_path")]
    pub image_path: PathBuf,
}

impl DriverConfig {
    /// Returns the default cycle budget.
    fn default_max_cycles() -> u64 {
        defaults::MAX_CYCLES
    }

    /// Returns the default reset toggle count.
    fn default_reset_toggles() -> u32 {
        defaults::RESET_TOGGLES
    }

    /// Returns the default image path.
    fn default_image_path() -> PathBuf {
        PathBuf::from(defaults::IMAGE_PATH)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_cycles == 0 {
            return Err(ConfigError::Invalid(
                "driver.max_cycles must be at least 1".to_string(),
            ));
        }
        if self.reset_toggles % 2 != 0 {
            return Err(ConfigError::Invalid(format!(
                "driver.reset_toggles must be even so reset releases with the clock low (got {})",
                self.reset_toggles
            )));
        }
        Ok(())
    }
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            max_cycles: defaults::MAX_CYCLES,
            reset_toggles: defaults::RESET_TOGGLES,
            image_path: PathBuf::from(defaults::IMAGE_PATH),
        }
    }
}

/// Geometry of the [`PreloadRam`](crate::soc::devices::PreloadRam) reference device.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DeviceConfig {
    /// Base byte address of device RAM
    #[serde(default = "DeviceConfig::default_ram_base")]
    pub ram_base: u32,

    /// Device RAM size in bytes (positive multiple of 4)
    #[serde(default = "DeviceConfig::default_ram_size")]
    pub ram_size: usize,

    /// Word whose non-zero value asserts `terminated` (word-aligned, inside RAM)
    #[serde(default = "DeviceConfig::default_tohost")]
    pub tohost: u32,

    /// Assert `terminated` after this many post-reset cycles, if set
    #[serde(default)]
    pub halt_after: Option<u64>,
}

impl DeviceConfig {
    /// Returns the default RAM base.
    fn default_ram_base() -> u32 {
        defaults::RAM_BASE
    }

    /// Returns the default RAM size.
    fn default_ram_size() -> usize {
        defaults::RAM_SIZE
    }

    /// Returns the default tohost address.
    fn default_tohost() -> u32 {
        defaults::TOHOST
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.ram_size == 0 || self.ram_size % 4 != 0 {
            return Err(ConfigError::Invalid(format!(
                "device.ram_size must be a positive multiple of 4 (got {})",
                self.ram_size
            )));
        }
        if u64::from(self.ram_base) + self.ram_size as u64 > 1 << 32 {
            return Err(ConfigError::Invalid(
                "device RAM extends past the 32-bit address space".to_string(),
            ));
        }
        if self.tohost % 4 != 0 {
            return Err(ConfigError::Invalid(format!(
                "device.tohost must be word-aligned (got {:#x})",
                self.tohost
            )));
        }
        let in_ram = self
            .tohost
            .checked_sub(self.ram_base)
            .is_some_and(|offset| (offset as usize) < self.ram_size);
        if !in_ram {
            return Err(ConfigError::Invalid(format!(
                "device.tohost {:#x} lies outside RAM [{:#x}, {:#x})",
                self.tohost,
                self.ram_base,
                u64::from(self.ram_base) + self.ram_size as u64
            )));
        }
        Ok(())
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            ram_base: defaults::RAM_BASE,
            ram_size: defaults::RAM_SIZE,
            tohost: defaults::TOHOST,
            halt_after: None,
        }
    }
}
