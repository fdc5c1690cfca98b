//! UseCase: ハブの状態取得

use std::sync::Arc;

use crate::domain::{ChatHubRepository, HubStats};

/// ハブ状態取得のユースケース
pub struct GetHubStatusUseCase {
    repository: Arc<dyn ChatHubRepository>,
}

impl GetHubStatusUseCase {
    pub fn new(repository: Arc<dyn ChatHubRepository>) -> Self {
        Self { repository }
    }

    pub async fn execute(&self) -> HubStats {
        self.repository.stats().await
    }
}
