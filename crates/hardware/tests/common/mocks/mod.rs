//! Device doubles.
