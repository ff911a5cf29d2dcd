//! Global Driver Constants.
//!
//! This module defines constants shared by the loader, the driver, and the reference device. It includes:
//! 1. **Word Constants:** Preload word width and the byte grouping of the image format.
//! 2. **Protocol Constants:** Reset toggle count and the default cycle budget.
//! 3. **Arithmetic Constants:** Operand width for the soft multiply/divide routines.

/// Size of one preload word in bytes.
pub const WORD_BYTES: u32 = 4;

/// Number of byte tokens packed into one preload word.
pub const BYTES_PER_WORD: usize = WORD_BYTES as usize;

/// Number of clock toggles performed while reset is held.
///
/// Must be even so the clock is left low when reset is released.
pub const RESET_TOGGLES: u32 = 10;

/// Maximum number of execution cycles before a run is declared timed out.
pub const DEFAULT_MAX_CYCLES: u64 = 250_000;

/// Operand width of the soft arithmetic routines.
pub const XLEN_BITS: u32 = 32;

/// Marker character that starts an address line in a hex image.
pub const ADDRESS_MARKER: char = '@';
