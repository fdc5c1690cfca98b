//! Greeting banners read from disk or held in memory.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::domain::GreetingProvider;

/// Default greeting file, relative to the working directory
pub const DEFAULT_GREETING_PATH: &str = "Pingu.txt";

/// Reads the greeting file for every new client, so edits show up live.
///
/// A missing or unreadable file is logged and produces an empty greeting.
pub struct FileGreetingProvider {
    path: PathBuf,
}

impl FileGreetingProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl GreetingProvider for FileGreetingProvider {
    async fn greeting(&self) -> String {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(
                    "Failed to read greeting file '{}': {}",
                    self.path.display(),
                    e
                );
                String::new()
            }
        }
    }
}

/// Fixed greeting text.
#[derive(Debug, Clone, Default)]
pub struct StaticGreetingProvider {
    text: String,
}

impl StaticGreetingProvider {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[async_trait]
impl GreetingProvider for StaticGreetingProvider {
    async fn greeting(&self) -> String {
        self.text.clone()
    }
}
