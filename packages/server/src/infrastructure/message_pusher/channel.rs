//! 送信キューを使った MessagePusher 実装
//!
//! ## 責務
//!
//! - 接続ごとの `UnboundedSender` へのテキスト投入（push_to, broadcast）
//!
//! ## 設計ノート
//!
//! ソケットへの書き込みは UI 層の `pusher_loop` が接続ごとに行います。
//! ここではキューに積むだけなので、遅い受信者がいても送信者はブロックされません。

use async_trait::async_trait;

use crate::domain::{ConnectionHandle, MessagePushError, MessagePusher};

/// 送信キューを使った MessagePusher 実装
#[derive(Debug, Default, Clone, Copy)]
pub struct ChannelMessagePusher;

impl ChannelMessagePusher {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl MessagePusher for ChannelMessagePusher {
    async fn push_to(
        &self,
        target: &ConnectionHandle,
        content: &str,
    ) -> Result<(), MessagePushError> {
        target.deliver(content)?;
        tracing::trace!("Pushed {} bytes to connection '{}'", content.len(), target.id());
        Ok(())
    }

    async fn broadcast(&self, targets: &[ConnectionHandle], content: &str) -> usize {
        let mut delivered = 0;
        for target in targets {
            // ブロードキャストでは一部の送信失敗を許容
            match target.deliver(content) {
                Ok(()) => {
                    delivered += 1;
                    tracing::debug!("Broadcasted message to connection '{}'", target.id());
                }
                Err(e) => tracing::warn!("Skipping recipient during broadcast: {}", e),
            }
        }
        delivered
    }
}
