//! Signal-Count Tests Against a Mock Device.
//!
//! Uses the `mockall` device to pin down how often the driver touches each
//! signal, and that it never reads `return_value` on a timed-out run.

use dutsim_core::sim::{ProgramImage, RunOutcome, run_program};
use mockall::predicate::eq;
use pretty_assertions::assert_eq;

use crate::common::harness::{config_with_budget, image_at};
use crate::common::mocks::device::MockDut;

fn mock_named() -> MockDut {
    let mut dut = MockDut::new();
    dut.expect_name().return_const("MockDut");
    dut
}

#[test]
fn immediate_halt_signal_counts() {
    let mut dut = mock_named();
    dut.expect_set_reset().times(2).return_const(());
    dut.expect_set_clock().times(11).return_const(());
    dut.expect_eval().times(10).return_const(());
    dut.expect_set_preload_enable()
        .with(eq(false))
        .times(1)
        .return_const(());
    dut.expect_terminated().times(1).return_const(true);
    dut.expect_return_value().times(1).return_const(99u32);
    dut.expect_finish().times(1).return_const(());

    let config = config_with_budget(1000);
    let (report, mut dut) = run_program(dut, &config, &ProgramImage::default());

    assert_eq!(
        report.outcome,
        RunOutcome::Halted {
            cycles: 0,
            return_value: 99
        }
    );
    dut.checkpoint();
}

#[test]
fn timeout_never_reads_return_value() {
    const BUDGET: u64 = 3;

    let mut dut = mock_named();
    dut.expect_set_reset().times(2).return_const(());
    dut.expect_set_clock()
        .times(1 + 10 + 2 * BUDGET as usize)
        .return_const(());
    dut.expect_eval()
        .times(10 + 2 * BUDGET as usize)
        .return_const(());
    dut.expect_set_preload_enable().times(1).return_const(());
    dut.expect_terminated()
        .times(BUDGET as usize)
        .return_const(false);
    dut.expect_return_value().never();
    dut.expect_finish().times(1).return_const(());

    let config = config_with_budget(BUDGET);
    let (report, mut dut) = run_program(dut, &config, &ProgramImage::default());

    assert_eq!(report.outcome, RunOutcome::TimedOut { cycles: BUDGET });
    dut.checkpoint();
}

#[test]
fn preload_writes_each_word_once() {
    let image = image_at(0x2000, &[0xA, 0xB, 0xC]);

    let mut dut = mock_named();
    dut.expect_set_reset().return_const(());
    dut.expect_set_clock().return_const(());
    dut.expect_eval().return_const(());
    dut.expect_set_preload_enable()
        .with(eq(true))
        .times(3)
        .return_const(());
    dut.expect_set_preload_enable()
        .with(eq(false))
        .times(1)
        .return_const(());
    for (i, data) in [0xA, 0xB, 0xC].into_iter().enumerate() {
        dut.expect_set_preload_address()
            .with(eq(0x2000 + 4 * i as u32))
            .times(1)
            .return_const(());
        dut.expect_set_preload_data()
            .with(eq(data))
            .times(1)
            .return_const(());
    }
    dut.expect_terminated().return_const(true);
    dut.expect_return_value().return_const(0u32);
    dut.expect_finish().return_const(());

    let config = config_with_budget(10);
    let (report, mut dut) = run_program(dut, &config, &image);

    assert_eq!(report.session.preload_words, 3);
    dut.checkpoint();
}
