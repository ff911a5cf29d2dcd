//! Device trait for the simulated processor under test.
//!
//! This module defines the `Device` trait the driver clocks. It provides:
//! 1. **Inputs:** `clock`, `reset`, and the preload bus (`enable`, `address`, `data`).
//! 2. **Evaluation:** `eval` propagates the current input values through the model.
//! 3. **Outputs:** The `terminated` status flag and the `return_value` register.
//! 4. **Lifecycle:** An optional `finish` hook run once when the driver releases the device.
//!
//! Input writes are not observable until the next `eval`. The model's internal
//! state is opaque to the driver and advances only inside `eval`.

/// Signal-level interface of a clocked processor model.
///
/// Implemented by RTL simulation backends (for example a Verilated model
/// behind FFI) and by the in-crate [`PreloadRam`](crate::soc::devices::PreloadRam)
/// reference model.
pub trait Device {
    /// Returns a short name for this device, used in log output.
    fn name(&self) -> &str {
        "DUT"
    }

    /// Drives the `clock` input (`true` = high).
    fn set_clock(&mut self, level: bool);
    /// Drives the synchronous `reset` input (`true` = asserted).
    fn set_reset(&mut self, asserted: bool);
    /// Drives the preload bus enable.
    fn set_preload_enable(&mut self, enabled: bool);
    /// Drives the preload bus byte address.
    fn set_preload_address(&mut self, addr: u32);
    /// Drives the preload bus data word.
    fn set_preload_data(&mut self, data: u32);

    /// Propagates the current input values through the model.
    fn eval(&mut self);

    /// Returns the program-termination status flag.
    fn terminated(&self) -> bool;
    /// Returns the result register (a0 on a RISC-V core).
    fn return_value(&self) -> u32;

    /// Runs end-of-simulation hooks; called once when the driver releases the device.
    fn finish(&mut self) {}
}

impl<D: Device + ?Sized> Device for &mut D {
    fn name(&self) -> &str {
        (**self).name()
    }
    fn set_clock(&mut self, level: bool) {
        (**self).set_clock(level);
    }
    fn set_reset(&mut self, asserted: bool) {
        (**self).set_reset(asserted);
    }
    fn set_preload_enable(&mut self, enabled: bool) {
        (**self).set_preload_enable(enabled);
    }
    fn set_preload_address(&mut self, addr: u32) {
        (**self).set_preload_address(addr);
    }
    fn set_preload_data(&mut self, data: u32) {
        (**self).set_preload_data(data);
    }
    fn eval(&mut self) {
        (**self).eval();
    }
    fn terminated(&self) -> bool {
        (**self).terminated()
    }
    fn return_value(&self) -> u32 {
        (**self).return_value()
    }
    fn finish(&mut self) {
        (**self).finish();
    }
}

impl<D: Device + ?Sized> Device for Box<D> {
    fn name(&self) -> &str {
        (**self).name()
    }
    fn set_clock(&mut self, level: bool) {
        (**self).set_clock(level);
    }
    fn set_reset(&mut self, asserted: bool) {
        (**self).set_reset(asserted);
    }
    fn set_preload_enable(&mut self, enabled: bool) {
        (**self).set_preload_enable(enabled);
    }
    fn set_preload_address(&mut self, addr: u32) {
        (**self).set_preload_address(addr);
    }
    fn set_preload_data(&mut self, data: u32) {
        (**self).set_preload_data(data);
    }
    fn eval(&mut self) {
        (**self).eval();
    }
    fn terminated(&self) -> bool {
        (**self).terminated()
    }
    fn return_value(&self) -> u32 {
        (**self).return_value()
    }
    fn finish(&mut self) {
        (**self).finish();
    }
}
