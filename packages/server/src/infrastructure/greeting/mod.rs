//! Greeting content providers.

pub mod file;

pub use file::{DEFAULT_GREETING_PATH, FileGreetingProvider, StaticGreetingProvider};
