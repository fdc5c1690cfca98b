//! Server state shared by every connection task.

use std::sync::Arc;

use irori_shared::time::Clock;

use crate::{
    domain::{ChatHubRepository, GreetingProvider, LogPersister, MessagePusher},
    usecase::{
        AdmitConnectionUseCase, GetHubStatusUseCase, JoinGroupUseCase, LeaveChatUseCase,
        SendMessageUseCase,
    },
};

/// Shared application state
pub struct AppState {
    /// AdmitConnectionUseCase（接続受け入れのユースケース）
    pub admit_connection_usecase: Arc<AdmitConnectionUseCase>,
    /// JoinGroupUseCase（グループ参加のユースケース）
    pub join_group_usecase: Arc<JoinGroupUseCase>,
    /// SendMessageUseCase（メッセージ送信のユースケース）
    pub send_message_usecase: Arc<SendMessageUseCase>,
    /// LeaveChatUseCase（退出のユースケース）
    pub leave_chat_usecase: Arc<LeaveChatUseCase>,
    /// GetHubStatusUseCase（ハブ状態取得のユースケース）
    pub get_hub_status_usecase: Arc<GetHubStatusUseCase>,
    /// 挨拶文の提供元
    pub greeting_provider: Arc<dyn GreetingProvider>,
    /// プロンプトなどの個別送信用
    pub message_pusher: Arc<dyn MessagePusher>,
}

impl AppState {
    /// Wire the use cases around the given ports.
    pub fn new(
        repository: Arc<dyn ChatHubRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        log_persister: Arc<dyn LogPersister>,
        greeting_provider: Arc<dyn GreetingProvider>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            admit_connection_usecase: Arc::new(AdmitConnectionUseCase::new(repository.clone())),
            join_group_usecase: Arc::new(JoinGroupUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                log_persister.clone(),
                clock.clone(),
            )),
            send_message_usecase: Arc::new(SendMessageUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                log_persister.clone(),
                clock.clone(),
            )),
            leave_chat_usecase: Arc::new(LeaveChatUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                log_persister,
                clock,
            )),
            get_hub_status_usecase: Arc::new(GetHubStatusUseCase::new(repository)),
            greeting_provider,
            message_pusher,
        }
    }
}
