//! Reset and Preload Sequencing Tests.
//!
//! Drives a `SignalRecorder` through `Simulator::new`, `preload`, and `start`
//! and checks the exact signal order the device observes, the words it
//! latches, and the session counters the driver keeps.

use dutsim_core::Simulator;
use dutsim_core::sim::{Phase, ProgramImage};
use pretty_assertions::assert_eq;

use crate::common::harness::{config_with_budget, image_at};
use crate::common::mocks::device::{Signal, SignalRecorder};

/// Signals the reset sequence issues for `toggles` clock changes.
fn reset_signals(toggles: u32) -> Vec<Signal> {
    let mut expected = vec![Signal::Reset(true), Signal::Clock(false)];
    let mut level = false;
    for _ in 0..toggles {
        level = !level;
        expected.push(Signal::Clock(level));
        expected.push(Signal::Eval);
    }
    expected.push(Signal::Reset(false));
    expected
}

fn preload_signals(addr: u32, data: u32) -> Vec<Signal> {
    vec![
        Signal::PreloadEnable(true),
        Signal::PreloadAddress(addr),
        Signal::PreloadData(data),
        Signal::Clock(false),
        Signal::Eval,
        Signal::Clock(true),
        Signal::Eval,
    ]
}

// ══════════════════════════════════════════════════════════
// 1. Reset
// ══════════════════════════════════════════════════════════

#[test]
fn reset_toggles_clock_ten_times_under_reset() {
    let config = config_with_budget(100);
    let sim = Simulator::new(SignalRecorder::new(), &config);

    let dut = sim.device();
    assert_eq!(dut.log, reset_signals(10));
    assert_eq!(dut.evals(), 10);
    assert_eq!(dut.reset_edges, 5);
    assert!(!dut.reset_asserted());
    assert!(!dut.clock_level(), "reset must release with the clock low");
    assert_eq!(sim.session().time, 10);
    assert_eq!(sim.session().cycles, 0);
    assert_eq!(sim.phase(), Phase::Loading);
}

#[test]
fn reset_toggle_count_is_configurable() {
    let mut config = config_with_budget(100);
    config.driver.reset_toggles = 4;
    let sim = Simulator::new(SignalRecorder::new(), &config);

    assert_eq!(sim.device().log, reset_signals(4));
    assert_eq!(sim.session().time, 4);
}

#[test]
fn reset_does_not_latch_or_run() {
    let config = config_with_budget(100);
    let sim = Simulator::new(SignalRecorder::new(), &config);

    assert!(sim.device().latched.is_empty());
    assert_eq!(sim.device().run_edges, 0);
}

// ══════════════════════════════════════════════════════════
// 2. Preload
// ══════════════════════════════════════════════════════════

#[test]
fn each_word_is_presented_then_clocked() {
    let config = config_with_budget(100);
    let mut sim = Simulator::new(SignalRecorder::new(), &config);
    sim.preload(&image_at(0x1000, &[0xAAAA_0001, 0xBBBB_0002]));

    let mut expected = reset_signals(10);
    expected.extend(preload_signals(0x1000, 0xAAAA_0001));
    expected.extend(preload_signals(0x1004, 0xBBBB_0002));
    assert_eq!(sim.device().log, expected);

    assert_eq!(
        sim.device().latched,
        vec![(0x1000, 0xAAAA_0001), (0x1004, 0xBBBB_0002)]
    );
    assert_eq!(sim.session().preload_words, 2);
    assert_eq!(sim.session().time, 14);
    assert_eq!(sim.session().cycles, 0, "preload cycles are not execution cycles");
}

#[test]
fn parsed_hex_reaches_device_unchanged() {
    let config = config_with_budget(100);
    let image = ProgramImage::parse("@1000\n01 02 03 04\n").unwrap();
    let mut sim = Simulator::new(SignalRecorder::new(), &config);
    sim.preload(&image);

    assert_eq!(sim.device().latched, vec![(0x1000, 0x0403_0201)]);
}

#[test]
fn preload_follows_image_order() {
    let config = config_with_budget(100);
    let image = ProgramImage::parse("@40\n01 00 00 00\n@0\n02 00 00 00\n").unwrap();
    let mut sim = Simulator::new(SignalRecorder::new(), &config);
    sim.preload(&image);

    assert_eq!(sim.device().latched, vec![(0x40, 1), (0x0, 2)]);
}

#[test]
fn repeated_preload_appends() {
    let config = config_with_budget(100);
    let mut sim = Simulator::new(SignalRecorder::new(), &config);
    sim.preload(&image_at(0x0, &[1]));
    sim.preload(&image_at(0x800, &[2, 3]));

    assert_eq!(sim.device().latched, vec![(0x0, 1), (0x800, 2), (0x804, 3)]);
    assert_eq!(sim.session().preload_words, 3);
}

#[test]
fn empty_image_touches_no_preload_signals() {
    let config = config_with_budget(100);
    let mut sim = Simulator::new(SignalRecorder::new(), &config);
    sim.preload(&ProgramImage::default());

    assert_eq!(sim.device().log, reset_signals(10));
    assert_eq!(sim.session().preload_words, 0);
}

// ══════════════════════════════════════════════════════════
// 3. Start
// ══════════════════════════════════════════════════════════

#[test]
fn start_closes_preload_bus() {
    let config = config_with_budget(100);
    let mut sim = Simulator::new(SignalRecorder::new(), &config);
    sim.preload(&image_at(0x0, &[7]));
    let exec = sim.start();

    assert_eq!(exec.device().log.last(), Some(&Signal::PreloadEnable(false)));
    assert!(!exec.device().preload_enabled());
    assert_eq!(exec.phase(), Phase::Running);
    assert_eq!(exec.outcome(), None);
}
