//! Command implementations for the `settleforge` binary.

pub mod calibrate;
pub mod check;
pub mod generate;
