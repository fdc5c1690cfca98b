//! Append-only chat log file.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::{fs::OpenOptions, io::AsyncWriteExt, sync::Mutex};

use crate::domain::{ChatMessage, LogPersister, PersistError};

/// Default chat log location, relative to the working directory
pub const DEFAULT_CHAT_LOG_PATH: &str = "chat_log.txt";

/// Appends each message line to a file, creating it on first use.
///
/// The file is reopened per write so an external rotation or deletion is
/// picked up without a restart.
pub struct FileLogPersister {
    path: PathBuf,
    // serializes appends so lines from concurrent sessions never interleave
    write_lock: Mutex<()>,
}

impl FileLogPersister {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl LogPersister for FileLogPersister {
    async fn append(&self, message: &ChatMessage) -> Result<(), PersistError> {
        let _guard = self.write_lock.lock().await;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(message.line().as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}
