//! Simulation statistics collection and reporting.
//!
//! This module summarizes a driver run. It provides:
//! 1. **Counters:** Execution cycles, evaluation steps, and preloaded words.
//! 2. **Host timing:** Wall-clock time and simulated cycles per second.
//! 3. **Reporting:** A plain-text report on stdout and a serializable snapshot.

use std::time::Instant;

use serde::Serialize;

use crate::sim::session::SimSession;

/// Statistics for one driver run.
///
/// Created when the driver starts, so `host_seconds` covers reset, preload,
/// and execution.
#[derive(Clone, Debug, Serialize)]
pub struct SimStats {
    #[serde(skip)]
    start_time: Instant,
    /// Wall-clock seconds at the last [`SimStats::capture`].
    pub host_seconds: f64,
    /// Execution cycles clocked.
    pub cycles: u64,
    /// Evaluation steps issued (simulation time).
    pub evals: u64,
    /// Words written through the preload bus.
    pub preload_words: u64,
    /// Clock toggles performed while reset was held.
    pub reset_toggles: u32,
}

impl Default for SimStats {
    fn default() -> Self {
        Self {
            start_time: Instant::now(),
            host_seconds: 0.0,
            cycles: 0,
            evals: 0,
            preload_words: 0,
            reset_toggles: 0,
        }
    }
}

impl SimStats {
    /// Starts the wall clock for a run with the given reset toggle count.
    pub fn start(reset_toggles: u32) -> Self {
        Self {
            reset_toggles,
            ..Self::default()
        }
    }

    /// Copies the session counters and samples the wall clock.
    pub fn capture(&mut self, session: &SimSession) {
        self.cycles = session.cycles;
        self.evals = session.time;
        self.preload_words = session.preload_words;
        self.host_seconds = self.start_time.elapsed().as_secs_f64();
    }

    /// Simulated execution cycles per host second, or 0 before any time has elapsed.
    pub fn cycles_per_second(&self) -> f64 {
        if self.host_seconds > 0.0 {
            self.cycles as f64 / self.host_seconds
        } else {
            0.0
        }
    }

    /// Prints the statistics report to stdout.
    pub fn print(&self) {
        println!("\n==========================================================");
        println!("DRIVER STATISTICS");
        println!("==========================================================");
        println!("host_seconds             {:.4} s", self.host_seconds);
        println!("sim_cycles               {}", self.cycles);
        println!("sim_evals                {}", self.evals);
        println!("sim_freq                 {:.2} kHz", self.cycles_per_second() / 1000.0);
        println!("preload_words            {}", self.preload_words);
        println!("reset_toggles            {}", self.reset_toggles);
        println!("==========================================================");
    }
}
