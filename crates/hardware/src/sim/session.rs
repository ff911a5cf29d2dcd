//! Simulation session state.
//!
//! Holds the per-run counters the driver mutates while it clocks the device,
//! the phase the run is in, and the terminal outcome.

use std::fmt;

use serde::Serialize;

/// Observable driver phase.
///
/// Transitions are one-directional:
/// `Loading -> Running -> {Halted | TimedOut}`. Reset runs to completion
/// inside [`Simulator::new`](crate::sim::Simulator::new), so no handle ever
/// observes it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Phase {
    /// Reset is complete; program words are being preloaded.
    Loading,
    /// Preload is closed; the execution loop is clocking the device.
    Running,
    /// The device asserted `terminated`.
    Halted,
    /// The cycle budget ran out without `terminated` being observed.
    TimedOut,
}

impl Phase {
    /// Returns `true` for `Halted` and `TimedOut`.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Halted | Self::TimedOut)
    }
}

/// Terminal outcome of an execution run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunOutcome {
    /// `terminated` was observed within the budget.
    Halted {
        /// Execution cycles clocked before termination was observed.
        cycles: u64,
        /// `return_value` sampled when termination was observed.
        return_value: u32,
    },
    /// The budget was exhausted; exactly `cycles` clock cycles were run.
    TimedOut {
        /// Execution cycles clocked (equal to the budget).
        cycles: u64,
    },
}

impl RunOutcome {
    /// Returns the number of execution cycles clocked.
    pub const fn cycles(self) -> u64 {
        match self {
            Self::Halted { cycles, .. } | Self::TimedOut { cycles } => cycles,
        }
    }

    /// Returns the captured result for a halted run.
    pub const fn return_value(self) -> Option<u32> {
        match self {
            Self::Halted { return_value, .. } => Some(return_value),
            Self::TimedOut { .. } => None,
        }
    }

    /// Returns `true` for a halted run.
    pub const fn is_halted(self) -> bool {
        matches!(self, Self::Halted { .. })
    }
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Halted {
                cycles,
                return_value,
            } => write!(f, "halted at cycle {cycles} with result {return_value}"),
            Self::TimedOut { cycles } => write!(f, "timed out after {cycles} cycles"),
        }
    }
}

/// Mutable state of one simulation run.
///
/// Owned by the driver; nothing here is global.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SimSession {
    /// Execution cycles clocked since preload closed.
    pub cycles: u64,
    /// Simulation time: number of `eval` calls issued, across all phases.
    pub time: u64,
    /// Words written through the preload bus.
    pub preload_words: u64,
    /// Set once `terminated` has been observed.
    pub halted: bool,
    /// `return_value` captured at halt.
    pub result: Option<u32>,
}
