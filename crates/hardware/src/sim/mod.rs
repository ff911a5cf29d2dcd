//! Simulation driver and program loading.
//!
//! Provides the program image loader, the per-run session state, and the
//! phase-typed driver that clocks a [`Device`](crate::soc::Device).

pub mod loader;
pub mod session;
pub mod simulator;

pub use loader::{PreloadWord, ProgramImage};
pub use session::{Phase, RunOutcome, SimSession};
pub use simulator::{Execution, RunReport, Simulator, run_program};
