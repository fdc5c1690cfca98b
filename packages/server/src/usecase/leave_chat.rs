//! UseCase: 退出処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - LeaveChatUseCase::execute() メソッド
//! - 登録とグループの両方からの削除、退出通知のブロードキャスト
//!
//! ### どのような状況を想定しているか
//! - 正常系：同じグループの残りのメンバーへの退出通知
//! - エッジケース：グループ参加前の切断（通知なし）

use std::sync::Arc;

use irori_shared::time::Clock;

use crate::domain::{
    ChatHubRepository, ConnectionId, LogPersister, MessagePusher, Nickname, Timestamp,
    render_leave_notice,
};

use super::publish::publish;

/// 退出のユースケース
pub struct LeaveChatUseCase {
    repository: Arc<dyn ChatHubRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    log_persister: Arc<dyn LogPersister>,
    clock: Arc<dyn Clock>,
}

impl LeaveChatUseCase {
    pub fn new(
        repository: Arc<dyn ChatHubRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        log_persister: Arc<dyn LogPersister>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            log_persister,
            clock,
        }
    }

    /// 退出を実行
    ///
    /// The connection is always removed from the registry and the group map.
    /// The departure notice is only recorded and broadcast when the
    /// connection had joined a group.
    ///
    /// # Returns
    ///
    /// 退出通知の配信先（通知しなかった場合は空）
    pub async fn execute(
        &self,
        id: &ConnectionId,
        nickname: Option<&Nickname>,
    ) -> Vec<ConnectionId> {
        let timestamp = Timestamp::new(self.clock.now_millis());
        let notice = nickname.map(render_leave_notice).unwrap_or_default();

        let Some(delivery) = self.repository.leave(id, &notice, timestamp).await else {
            tracing::debug!("Connection '{}' removed before joining a group", id);
            return Vec::new();
        };
        tracing::info!(
            "'{}' left the chat ({} peers notified)",
            nickname.map(Nickname::as_str).unwrap_or("?"),
            delivery.recipients.len()
        );

        publish(
            self.log_persister.as_ref(),
            self.message_pusher.as_ref(),
            &delivery,
        )
        .await;

        delivery.recipient_ids()
    }
}
