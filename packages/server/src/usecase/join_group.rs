//! UseCase: グループ参加処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinGroupUseCase::execute() メソッド
//! - 参加通知のブロードキャストと履歴の再送
//!
//! ### どのような状況を想定しているか
//! - 正常系：同じグループの既存メンバーへの参加通知
//! - 異常系：二度目の参加（AlreadyAssigned）、未受け入れの接続

use std::sync::Arc;

use irori_shared::time::Clock;

use crate::domain::{
    ChatHubRepository, ConnectionId, GroupLabel, LogPersister, MessagePusher, Nickname, Timestamp,
    render_join_notice,
};

use super::{error::JoinError, publish::publish};

/// グループ参加のユースケース
pub struct JoinGroupUseCase {
    repository: Arc<dyn ChatHubRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    log_persister: Arc<dyn LogPersister>,
    clock: Arc<dyn Clock>,
}

impl JoinGroupUseCase {
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

    /// グループ参加を実行
    ///
    /// 1. グループを割り当て、参加通知を履歴に追加（同時に履歴を参加者へ再送）
    /// 2. 参加通知を永続化し、同じグループのメンバーにブロードキャスト
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<ConnectionId>)` - 参加通知の配信先
    /// * `Err(JoinError)` - 参加失敗
    pub async fn execute(
        &self,
        id: &ConnectionId,
        nickname: &Nickname,
        group: GroupLabel,
    ) -> Result<Vec<ConnectionId>, JoinError> {
        let timestamp = Timestamp::new(self.clock.now_millis());
        let group_name = group.as_str().to_string();

        let delivery = self
            .repository
            .join(id, group, &render_join_notice(nickname), timestamp)
            .await?;
        tracing::info!(
            "'{}' joined group '{}' ({} peers notified)",
            nickname.as_str(),
            group_name,
            delivery.recipients.len()
        );

        publish(
            self.log_persister.as_ref(),
            self.message_pusher.as_ref(),
            &delivery,
        )
        .await;

        Ok(delivery.recipient_ids())
    }
}
