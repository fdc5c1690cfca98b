//! MessagePusher trait 定義
//!
//! 接続中のクライアントへのテキスト送信を抽象化します。

use async_trait::async_trait;

use super::{ConnectionHandle, MessagePushError};

#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// 特定の接続にテキストを送信
    async fn push_to(&self, target: &ConnectionHandle, content: &str)
    -> Result<(), MessagePushError>;

    /// 複数の接続にテキストを送信する
    ///
    /// Best effort: a failing recipient is logged and skipped. Returns how
    /// many recipients accepted the content.
    async fn broadcast(&self, targets: &[ConnectionHandle], content: &str) -> usize;
}
