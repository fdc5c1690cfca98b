//! InMemory ChatHub Repository 実装
//!
//! ドメイン層が定義する ChatHubRepository trait の具体的な実装。
//! `ChatHub` 集約を一つの `Mutex` で保護し、登録・グループ・履歴の操作を
//! 単一のクリティカルセクションで実行します。

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    ChatHub, ChatHubRepository, ChatMessage, ConnectionHandle, ConnectionId, Delivery, GroupLabel,
    HubError, HubStats, Timestamp,
};

/// インメモリ ChatHub Repository 実装
pub struct InMemoryChatHubRepository {
    /// ChatHub ドメインモデル
    hub: Arc<Mutex<ChatHub>>,
}

impl InMemoryChatHubRepository {
    /// 新しい InMemoryChatHubRepository を作成
    pub fn new(hub: Arc<Mutex<ChatHub>>) -> Self {
        Self { hub }
    }
}

#[async_trait]
impl ChatHubRepository for InMemoryChatHubRepository {
    async fn admit(&self, handle: ConnectionHandle) -> bool {
        let mut hub = self.hub.lock().await;
        hub.admit(handle)
    }

    async fn join(
        &self,
        id: &ConnectionId,
        group: GroupLabel,
        notice: &str,
        timestamp: Timestamp,
    ) -> Result<Delivery, HubError> {
        let mut hub = self.hub.lock().await;
        hub.join(id, group, notice, timestamp)
    }

    async fn post(&self, sender: &ConnectionId, text: &str, timestamp: Timestamp) -> Delivery {
        let mut hub = self.hub.lock().await;
        hub.post(sender, text, timestamp)
    }

    async fn leave(
        &self,
        id: &ConnectionId,
        notice: &str,
        timestamp: Timestamp,
    ) -> Option<Delivery> {
        let mut hub = self.hub.lock().await;
        hub.leave(id, notice, timestamp)
    }

    async fn history(&self) -> Vec<ChatMessage> {
        let hub = self.hub.lock().await;
        hub.history()
    }

    async fn stats(&self) -> HubStats {
        let hub = self.hub.lock().await;
        hub.stats()
    }
}
