//! Chat log persistence.

pub mod file;

pub use file::{DEFAULT_CHAT_LOG_PATH, FileLogPersister};
