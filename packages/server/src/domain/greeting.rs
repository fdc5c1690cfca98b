//! Greeting content port.

use async_trait::async_trait;

/// Supplies the banner streamed verbatim to each newly admitted client.
#[async_trait]
pub trait GreetingProvider: Send + Sync {
    async fn greeting(&self) -> String;
}
