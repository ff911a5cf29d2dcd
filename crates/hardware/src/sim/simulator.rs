//! Simulator: drives a clocked device through reset, preload, and execution.
//!
//! The phase ordering is carried by the types rather than checked at run time:
//! 1. [`Simulator::new`] sequences reset before returning, so an un-reset device is never exposed.
//! 2. [`Simulator::preload`] streams words while the preload bus is open.
//! 3. [`Simulator::start`] closes the preload bus and consumes the simulator, returning an
//!    [`Execution`]; nothing can be preloaded after execution begins.
//! 4. [`Execution::step`] / [`Execution::run`] clock the device until it halts or the budget runs out.
//!
//! Every signal write is followed by an `eval` before the driver depends on its effect.

use serde::Serialize;
use tracing::{debug, info, trace, warn};

use crate::config::Config;
use crate::sim::loader::ProgramImage;
use crate::sim::session::{Phase, RunOutcome, SimSession};
use crate::soc::traits::Device;
use crate::stats::SimStats;

/// Device plus the session counters that every signal step updates.
#[derive(Debug)]
struct Clocked<D> {
    device: D,
    session: SimSession,
}

impl<D: Device> Clocked<D> {
    fn eval(&mut self) {
        self.device.eval();
        self.session.time += 1;
    }

    /// One full clock cycle: low then high, evaluating after each edge.
    fn cycle(&mut self) {
        self.device.set_clock(false);
        self.eval();
        self.device.set_clock(true);
        self.eval();
    }

    fn reset(&mut self, toggles: u32) {
        self.device.set_reset(true);
        self.device.set_clock(false);
        let mut level = false;
        for _ in 0..toggles {
            level = !level;
            self.device.set_clock(level);
            self.eval();
        }
        self.device.set_reset(false);
    }
}

/// Driver in the loading phase: reset is done and the preload bus is usable.
#[derive(Debug)]
pub struct Simulator<D> {
    core: Clocked<D>,
    stats: SimStats,
    max_cycles: u64,
    trace_cycles: bool,
    progress_interval: u64,
}

impl<D: Device> Simulator<D> {
    /// Takes ownership of `device` and sequences reset.
    ///
    /// Reset asserts `reset`, drives the clock low, toggles it
    /// `config.driver.reset_toggles` times with an `eval` after each change,
    /// then releases `reset`.
    pub fn new(device: D, config: &Config) -> Self {
        let mut core = Clocked {
            device,
            session: SimSession::default(),
        };
        let stats = SimStats::start(config.driver.reset_toggles);

        core.reset(config.driver.reset_toggles);
        info!(
            "[Reset] {} held for {} clock toggles",
            core.device.name(),
            config.driver.reset_toggles
        );

        Self {
            core,
            stats,
            max_cycles: config.driver.max_cycles,
            trace_cycles: config.general.trace_cycles,
            progress_interval: config.general.progress_interval,
        }
    }

    /// Streams every word of `image` into device memory.
    ///
    /// For each word the preload enable, address, and data inputs are set
    /// first, then one full clock cycle lets the device latch the word on the
    /// rising edge. May be called repeatedly to load several images.
    pub fn preload(&mut self, image: &ProgramImage) {
        for word in image {
            self.core.device.set_preload_enable(true);
            self.core.device.set_preload_address(word.addr);
            self.core.device.set_preload_data(word.data);
            self.core.cycle();
            self.core.session.preload_words += 1;
            debug!(
                "[Preload] Load instr {:08x} at addr {:08x}",
                word.data, word.addr
            );
        }
    }

    /// Closes the preload bus and enters the execution phase.
    pub fn start(mut self) -> Execution<D> {
        self.core.device.set_preload_enable(false);
        info!(
            "[Preload] Load complete: {} words",
            self.core.session.preload_words
        );

        Execution {
            core: self.core,
            stats: self.stats,
            max_cycles: self.max_cycles,
            trace_cycles: self.trace_cycles,
            progress_interval: self.progress_interval,
            outcome: None,
        }
    }

    /// Current phase; always [`Phase::Loading`] for a constructed simulator.
    pub const fn phase(&self) -> Phase {
        Phase::Loading
    }

    /// Session counters so far.
    pub const fn session(&self) -> &SimSession {
        &self.core.session
    }

    /// Read-only access to the device.
    pub const fn device(&self) -> &D {
        &self.core.device
    }
}

/// Driver in the execution phase.
#[derive(Debug)]
pub struct Execution<D> {
    core: Clocked<D>,
    stats: SimStats,
    max_cycles: u64,
    trace_cycles: bool,
    progress_interval: u64,
    outcome: Option<RunOutcome>,
}

impl<D: Device> Execution<D> {
    /// Runs one iteration of the execution loop.
    ///
    /// The budget is checked first, then `terminated` is sampled. If it is
    /// asserted the result is captured and no clock edge is issued; otherwise
    /// one full clock cycle is run and the cycle counter advances.
    ///
    /// # Returns
    ///
    /// `Some(outcome)` once the run is terminal (and on every later call),
    /// `None` while it is still running.
    pub fn step(&mut self) -> Option<RunOutcome> {
        if self.outcome.is_some() {
            return self.outcome;
        }

        let cycles = self.core.session.cycles;
        if cycles >= self.max_cycles {
            warn!("[Timeout] no termination after {} cycles", cycles);
            return self.conclude(RunOutcome::TimedOut { cycles });
        }

        if self.core.device.terminated() {
            let return_value = self.core.device.return_value();
            self.core.session.halted = true;
            self.core.session.result = Some(return_value);
            info!("[HALT] Terminated at cycle {}", cycles);
            return self.conclude(RunOutcome::Halted {
                cycles,
                return_value,
            });
        }

        if self.trace_cycles {
            trace!("Cycle {}...", cycles);
        }
        self.core.cycle();
        self.core.session.cycles += 1;

        let cycles = self.core.session.cycles;
        if self.progress_interval != 0 && cycles % self.progress_interval == 0 {
            info!("[Progress] {} cycles", cycles);
        }
        None
    }

    /// Runs the execution loop to completion.
    pub fn run(&mut self) -> RunOutcome {
        loop {
            if let Some(outcome) = self.step() {
                return outcome;
            }
        }
    }

    fn conclude(&mut self, outcome: RunOutcome) -> Option<RunOutcome> {
        self.stats.capture(&self.core.session);
        self.outcome = Some(outcome);
        self.outcome
    }

    /// Current phase: `Running` until the loop reaches a terminal outcome.
    pub const fn phase(&self) -> Phase {
        match self.outcome {
            None => Phase::Running,
            Some(RunOutcome::Halted { .. }) => Phase::Halted,
            Some(RunOutcome::TimedOut { .. }) => Phase::TimedOut,
        }
    }

    /// Terminal outcome, once reached.
    pub const fn outcome(&self) -> Option<RunOutcome> {
        self.outcome
    }

    /// Session counters so far.
    pub const fn session(&self) -> &SimSession {
        &self.core.session
    }

    /// Statistics snapshot taken now.
    pub fn stats(&self) -> SimStats {
        let mut stats = self.stats.clone();
        stats.capture(&self.core.session);
        stats
    }

    /// Read-only access to the device.
    pub const fn device(&self) -> &D {
        &self.core.device
    }

    /// Runs the device's end-of-simulation hook and releases it.
    pub fn finish(mut self) -> (SimSession, D) {
        self.core.device.finish();
        (self.core.session, self.core.device)
    }
}

/// Outcome and statistics of a complete run.
#[derive(Clone, Debug, Serialize)]
pub struct RunReport {
    /// Terminal outcome.
    pub outcome: RunOutcome,
    /// Final session counters.
    pub session: SimSession,
    /// Run statistics.
    pub stats: SimStats,
}

/// Resets `device`, preloads `image`, runs to completion, and finishes the device.
///
/// # Examples
///
/// ```
/// use dutsim_core::config::Config;
/// use dutsim_core::sim::{ProgramImage, RunOutcome, run_program};
/// use dutsim_core::soc::PreloadRam;
///
/// let config = Config::default();
/// // Preload a non-zero tohost word so the reference device halts at once.
/// let image = ProgramImage::parse("@fffc\n2a 00 00 00\n").unwrap();
/// let (report, _ram) = run_program(PreloadRam::new(&config.device), &config, &image);
/// assert_eq!(report.outcome, RunOutcome::Halted { cycles: 0, return_value: 42 });
/// ```
pub fn run_program<D: Device>(device: D, config: &Config, image: &ProgramImage) -> (RunReport, D) {
    let mut sim = Simulator::new(device, config);
    sim.preload(image);
    let mut exec = sim.start();
    let outcome = exec.run();
    let stats = exec.stats();
    let (session, device) = exec.finish();
    (
        RunReport {
            outcome,
            session,
            stats,
        },
        device,
    )
}
