//! Repository trait 定義
//!
//! ドメイン層が必要とするチャットハブへのアクセスを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::{
    ChatMessage, ConnectionHandle, ConnectionId, Delivery, GroupLabel, HubError, HubStats,
    Timestamp,
};

/// Chat hub repository trait
///
/// Each method is one atomic step against the hub: implementations must run
/// it under a single critical section covering the registry, the group map
/// and the history together.
#[async_trait]
pub trait ChatHubRepository: Send + Sync {
    /// 接続の受け入れ（上限に達していれば `false`）
    async fn admit(&self, handle: ConnectionHandle) -> bool;

    /// グループに参加し、参加通知を記録し、履歴を再送する
    async fn join(
        &self,
        id: &ConnectionId,
        group: GroupLabel,
        notice: &str,
        timestamp: Timestamp,
    ) -> Result<Delivery, HubError>;

    /// メッセージを記録し、配信先を決定する
    async fn post(&self, sender: &ConnectionId, text: &str, timestamp: Timestamp) -> Delivery;

    /// 接続を削除する（参加済みなら退出通知を記録する）
    async fn leave(&self, id: &ConnectionId, notice: &str, timestamp: Timestamp)
    -> Option<Delivery>;

    /// 履歴の全件を取得
    async fn history(&self) -> Vec<ChatMessage>;

    /// 統計情報を取得
    async fn stats(&self) -> HubStats;
}
