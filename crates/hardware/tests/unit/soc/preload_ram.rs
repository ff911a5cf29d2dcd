//! Preload RAM Device Tests.
//!
//! Drives the reference device signal by signal, then end to end through
//! the driver, checking:
//!   - State changes only on rising clock edges
//!   - Preload writes and dropped out-of-range writes
//!   - The `tohost` and `halt_after` termination conditions

use dutsim_core::config::{Config, DeviceConfig};
use dutsim_core::sim::{ProgramImage, RunOutcome, run_program};
use dutsim_core::soc::{Device, PreloadRam};
use pretty_assertions::assert_eq;

use crate::common::harness::{config_with_budget, image_at};

fn ram() -> PreloadRam {
    PreloadRam::new(&DeviceConfig::default())
}

/// One low-then-high clock cycle.
fn clock(ram: &mut PreloadRam) {
    ram.set_clock(false);
    ram.eval();
    ram.set_clock(true);
    ram.eval();
}

fn write(ram: &mut PreloadRam, addr: u32, data: u32) {
    ram.set_preload_enable(true);
    ram.set_preload_address(addr);
    ram.set_preload_data(data);
    clock(ram);
    ram.set_preload_enable(false);
}

// ══════════════════════════════════════════════════════════
// 1. Edge behavior
// ══════════════════════════════════════════════════════════

#[test]
fn starts_zeroed_and_running() {
    let ram = ram();
    assert_eq!(ram.read_word(0), Some(0));
    assert_eq!(ram.cycles(), 0);
    assert!(!ram.terminated());
    assert_eq!(ram.return_value(), 0);
    assert_eq!(ram.name(), "PreloadRam");
}

#[test]
fn counts_one_cycle_per_rising_edge() {
    let mut ram = ram();
    clock(&mut ram);
    ram.eval();
    ram.eval();
    assert_eq!(ram.cycles(), 1, "repeated evals at a high clock are not edges");
    assert_eq!(ram.evals(), 4);

    clock(&mut ram);
    assert_eq!(ram.cycles(), 2);
}

#[test]
fn signal_changes_without_eval_have_no_effect() {
    let mut ram = ram();
    ram.set_preload_enable(true);
    ram.set_preload_address(0x10);
    ram.set_preload_data(0x55);
    ram.set_clock(true);
    assert_eq!(ram.read_word(0x10), Some(0));
    ram.eval();
    assert_eq!(ram.read_word(0x10), Some(0x55));
}

#[test]
fn reset_clears_cycle_count() {
    let mut ram = ram();
    clock(&mut ram);
    clock(&mut ram);
    assert_eq!(ram.cycles(), 2);

    ram.set_reset(true);
    clock(&mut ram);
    assert_eq!(ram.cycles(), 0);
    ram.set_reset(false);
    clock(&mut ram);
    assert_eq!(ram.cycles(), 1);
}

// ══════════════════════════════════════════════════════════
// 2. Preload writes
// ══════════════════════════════════════════════════════════

#[test]
fn preload_stores_word_without_counting_a_cycle() {
    let mut ram = ram();
    write(&mut ram, 0x100, 0xCAFE_F00D);
    assert_eq!(ram.read_word(0x100), Some(0xCAFE_F00D));
    assert_eq!(ram.cycles(), 0);
}

#[test]
fn out_of_range_and_misaligned_writes_are_dropped() {
    let mut ram = ram();
    write(&mut ram, 0x1_0000, 1);
    write(&mut ram, 0x102, 2);
    assert_eq!(ram.dropped_writes(), 2);
    assert_eq!(ram.read_word(0x1_0000), None);
    assert_eq!(ram.read_word(0x102), None);
    assert_eq!(ram.read_word(0x100), Some(0));
}

#[test]
fn ram_base_offsets_addresses() {
    let mut ram = PreloadRam::new(&DeviceConfig {
        ram_base: 0x8000_0000,
        ram_size: 0x100,
        tohost: 0x8000_00FC,
        halt_after: None,
    });
    write(&mut ram, 0x8000_0000, 0x13);
    write(&mut ram, 0x0, 0x14);

    assert_eq!(ram.read_word(0x8000_0000), Some(0x13));
    assert_eq!(ram.read_word(0x8000_0100), None);
    assert_eq!(ram.read_word(0), None);
    assert_eq!(ram.dropped_writes(), 1);
}

// ══════════════════════════════════════════════════════════
// 3. Termination
// ══════════════════════════════════════════════════════════

#[test]
fn nonzero_tohost_terminates_with_its_value() {
    let mut ram = ram();
    write(&mut ram, 0xFFFC, 42);
    assert!(ram.terminated());
    assert_eq!(ram.return_value(), 42);
}

#[test]
fn halt_after_limit_terminates() {
    let mut ram = PreloadRam::new(&DeviceConfig {
        halt_after: Some(2),
        ..DeviceConfig::default()
    });
    clock(&mut ram);
    assert!(!ram.terminated());
    clock(&mut ram);
    assert!(ram.terminated());
    assert_eq!(ram.return_value(), 0);
}

// ══════════════════════════════════════════════════════════
// 4. Through the driver
// ══════════════════════════════════════════════════════════

#[test]
fn preloaded_tohost_halts_at_cycle_zero() {
    let config = config_with_budget(100);
    let image = ProgramImage::parse("@fffc\n2a 00 00 00\n").unwrap();
    let (report, ram) = run_program(PreloadRam::new(&config.device), &config, &image);

    assert_eq!(
        report.outcome,
        RunOutcome::Halted {
            cycles: 0,
            return_value: 42
        }
    );
    assert_eq!(ram.cycles(), 0);
}

#[test]
fn device_and_driver_agree_on_cycles() {
    let mut config = config_with_budget(1_000);
    config.device.halt_after = Some(100);
    let image = image_at(0x0, &[0x13, 0x13, 0x73]);
    let (report, ram) = run_program(PreloadRam::new(&config.device), &config, &image);

    assert_eq!(
        report.outcome,
        RunOutcome::Halted {
            cycles: 100,
            return_value: 0
        }
    );
    assert_eq!(ram.cycles(), 100);
    assert_eq!(ram.evals(), report.session.time);
    assert_eq!(ram.read_word(0x8), Some(0x73));
}

#[test]
fn idle_program_times_out() {
    let config: Config = config_with_budget(50);
    let (report, ram) = run_program(
        PreloadRam::new(&config.device),
        &config,
        &image_at(0x0, &[0x6F]),
    );

    assert_eq!(report.outcome, RunOutcome::TimedOut { cycles: 50 });
    assert_eq!(ram.cycles(), 50);
}

#[test]
fn moved_ram_with_matching_tohost_halts() {
    let config = Config::from_json(
        r#"{ "device": { "ram_base": 2147483648, "tohost": 2147549180 },
             "driver": { "max_cycles": 50 } }"#,
    )
    .unwrap();
    let image = ProgramImage::parse("@8000fffc\n2a 00 00 00\n").unwrap();
    let (report, ram) = run_program(PreloadRam::new(&config.device), &config, &image);

    assert_eq!(
        report.outcome,
        RunOutcome::Halted {
            cycles: 0,
            return_value: 42
        }
    );
    assert_eq!(ram.dropped_writes(), 0);
}
