//! Preload RAM reference device.
//!
//! An edge-triggered word memory that speaks the driver's signal protocol
//! without modeling any instruction execution. It is used to smoke-test
//! reset sequencing, preload addressing, and the termination handshake
//! before an RTL model is attached.
//!
//! # Behavior
//!
//! State changes only on a rising `clock` edge seen by `eval`:
//! * `reset` asserted: the running-cycle counter is cleared.
//! * `preload_enable` asserted: `preload_data` is stored at `preload_address`.
//! * Otherwise: one running cycle is counted.
//!
//! `terminated` follows the `tohost` word, as in the HTIF exit convention:
//! any non-zero value ends the run and is reported as the return value. An
//! optional `halt_after` limit asserts `terminated` after that many running
//! cycles regardless of memory contents.

use tracing::warn;

use crate::common::WORD_BYTES;
use crate::config::DeviceConfig;
use crate::soc::traits::Device;

/// Edge-triggered reference device backed by a flat word array.
#[derive(Debug, Clone)]
pub struct PreloadRam {
    base: u32,
    words: Vec<u32>,
    tohost: u32,
    halt_after: Option<u64>,

    clock: bool,
    last_clock: bool,
    reset: bool,
    preload_enable: bool,
    preload_address: u32,
    preload_data: u32,

    cycles: u64,
    evals: u64,
    dropped_writes: u64,
}

impl PreloadRam {
    /// Creates a zero-filled device from its configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - RAM base and size, `tohost` address, and optional cycle limit.
    pub fn new(config: &DeviceConfig) -> Self {
        Self {
            base: config.ram_base,
            words: vec![0; config.ram_size / WORD_BYTES as usize],
            tohost: config.tohost,
            halt_after: config.halt_after,
            clock: false,
            last_clock: false,
            reset: false,
            preload_enable: false,
            preload_address: 0,
            preload_data: 0,
            cycles: 0,
            evals: 0,
            dropped_writes: 0,
        }
    }

    /// Reads the word at `addr`, or `None` when it is misaligned or outside RAM.
    pub fn read_word(&self, addr: u32) -> Option<u32> {
        self.index(addr).map(|i| self.words[i])
    }

    /// Running cycles counted since reset was last released.
    pub const fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Total `eval` calls, including those without a clock edge.
    pub const fn evals(&self) -> u64 {
        self.evals
    }

    /// Preload writes discarded for being misaligned or out of range.
    pub const fn dropped_writes(&self) -> u64 {
        self.dropped_writes
    }

    fn index(&self, addr: u32) -> Option<usize> {
        if addr % WORD_BYTES != 0 {
            return None;
        }
        let offset = addr.checked_sub(self.base)?;
        let i = (offset / WORD_BYTES) as usize;
        (i < self.words.len()).then_some(i)
    }

    fn rising_edge(&mut self) {
        if self.reset {
            self.cycles = 0;
        } else if self.preload_enable {
            match self.index(self.preload_address) {
                Some(i) => self.words[i] = self.preload_data,
                None => {
                    self.dropped_writes += 1;
                    warn!(
                        "[PreloadRam] dropped preload write to {:#010x} (outside RAM or misaligned)",
                        self.preload_address
                    );
                }
            }
        } else {
            self.cycles += 1;
        }
    }
}

impl Device for PreloadRam {
    fn name(&self) -> &str {
        "PreloadRam"
    }

    fn set_clock(&mut self, level: bool) {
        self.clock = level;
    }

    fn set_reset(&mut self, asserted: bool) {
        self.reset = asserted;
    }

    fn set_preload_enable(&mut self, enabled: bool) {
        self.preload_enable = enabled;
    }

    fn set_preload_address(&mut self, addr: u32) {
        self.preload_address = addr;
    }

    fn set_preload_data(&mut self, data: u32) {
        self.preload_data = data;
    }

    fn eval(&mut self) {
        self.evals += 1;
        if self.clock && !self.last_clock {
            self.rising_edge();
        }
        self.last_clock = self.clock;
    }

    fn terminated(&self) -> bool {
        self.return_value() != 0 || self.halt_after.is_some_and(|limit| self.cycles >= limit)
    }

    fn return_value(&self) -> u32 {
        self.read_word(self.tohost).unwrap_or(0)
    }
}
