//! Utilities shared by the Irori server binaries and tests.

pub mod logger;
pub mod time;
