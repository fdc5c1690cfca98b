//! Shared tail of every use case that produces a chat message.

use crate::domain::{Delivery, LogPersister, MessagePusher};

/// Persist the message, then fan it out to its recipients.
///
/// A persistence failure is logged and does not stop delivery.
pub(crate) async fn publish(
    log_persister: &dyn LogPersister,
    message_pusher: &dyn MessagePusher,
    delivery: &Delivery,
) -> usize {
    if let Err(e) = log_persister.append(&delivery.message).await {
        tracing::warn!("Failed to persist chat message: {}", e);
    }
    message_pusher
        .broadcast(&delivery.recipients, &delivery.message.line())
        .await
}
