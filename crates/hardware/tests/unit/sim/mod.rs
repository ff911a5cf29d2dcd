
/// Reset sequencing and preload signal ordering.
pub mod bringup;


/// Exact signal-call counts verified against a `mockall` device.
pub mod mock_device;
