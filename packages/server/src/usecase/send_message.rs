//! UseCase: メッセージ送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//! - 配信先の選定（同じグループ・送信者以外）と履歴への追加
//!
//! ### どのような状況を想定しているか
//! - 正常系：同じグループのメンバーへの配信
//! - エッジケース：グループ未参加の送信者（配信なし、履歴には残る）
//! - 異常系：ログの永続化失敗（配信は継続する）

use std::sync::Arc;

use irori_shared::time::Clock;

use crate::domain::{
    ChatHubRepository, ConnectionId, LogPersister, MessagePusher, Nickname, Timestamp,
    render_chat_line,
};

use super::publish::publish;

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    repository: Arc<dyn ChatHubRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    log_persister: Arc<dyn LogPersister>,
    clock: Arc<dyn Clock>,
}

impl SendMessageUseCase {
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

    /// メッセージ送信を実行
    ///
    /// # Arguments
    ///
    /// * `sender` - 送信者の接続 ID
    /// * `nickname` - 送信者のニックネーム
    /// * `body` - 前後の空白を取り除いた本文
    ///
    /// # Returns
    ///
    /// 配信先の接続 ID リスト（グループ未参加なら空）
    pub async fn execute(
        &self,
        sender: &ConnectionId,
        nickname: &Nickname,
        body: &str,
    ) -> Vec<ConnectionId> {
        let timestamp = Timestamp::new(self.clock.now_millis());

        let delivery = self
            .repository
            .post(sender, &render_chat_line(nickname, body), timestamp)
            .await;
        if delivery.message.sender_group.is_none() {
            tracing::debug!("'{}' is not in a group; message recorded only", nickname.as_str());
        }

        let delivered = publish(
            self.log_persister.as_ref(),
            self.message_pusher.as_ref(),
            &delivery,
        )
        .await;
        tracing::debug!(
            "Message from '{}' delivered to {}/{} recipients",
            nickname.as_str(),
            delivered,
            delivery.recipients.len()
        );

        delivery.recipient_ids()
    }
}
