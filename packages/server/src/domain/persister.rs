//! Durable chat log port.

use async_trait::async_trait;

use super::{ChatMessage, PersistError};

/// Appends every rendered message to a durable, append-only log.
///
/// Failures are reported to the caller, which logs them and carries on with
/// delivery; persistence is never transactional with broadcasting.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LogPersister: Send + Sync {
    async fn append(&self, message: &ChatMessage) -> Result<(), PersistError>;
}
