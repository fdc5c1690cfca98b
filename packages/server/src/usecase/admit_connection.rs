//! UseCase: 接続受け入れ処理

use std::sync::Arc;

use crate::domain::{ChatHubRepository, ConnectionHandle};

use super::error::ConnectError;

/// 接続受け入れのユースケース
pub struct AdmitConnectionUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn ChatHubRepository>,
}

impl AdmitConnectionUseCase {
    /// 新しい AdmitConnectionUseCase を作成
    pub fn new(repository: Arc<dyn ChatHubRepository>) -> Self {
        Self { repository }
    }

    /// 接続受け入れを実行
    ///
    /// # Returns
    ///
    /// * `Ok(())` - 受け入れ成功
    /// * `Err(ConnectError::CapacityExceeded)` - 上限に達しており、状態は変更されていない
    pub async fn execute(&self, handle: ConnectionHandle) -> Result<(), ConnectError> {
        let id = *handle.id();
        if self.repository.admit(handle).await {
            tracing::debug!("Connection '{}' admitted", id);
            return Ok(());
        }

        let stats = self.repository.stats().await;
        tracing::warn!(
            "Rejecting connection '{}': {}/{} connections in use",
            id,
            stats.connections,
            stats.max_connections
        );
        Err(ConnectError::CapacityExceeded(stats.max_connections))
    }
}
