//! UseCase 層のエラー型

use thiserror::Error;

use crate::domain::{HubError, RouterError};

/// 接続受け入れのエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectError {
    /// 接続数が上限に達している
    #[error("connection capacity of {0} exceeded")]
    CapacityExceeded(usize),
}

/// グループ参加のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoinError {
    #[error("connection '{0}' has not been admitted")]
    NotAdmitted(String),

    #[error("connection '{0}' is already assigned to a group")]
    AlreadyAssigned(String),
}

impl From<HubError> for JoinError {
    fn from(error: HubError) -> Self {
        match error {
            HubError::NotAdmitted(id) => JoinError::NotAdmitted(id),
            HubError::Router(RouterError::AlreadyAssigned(id)) => JoinError::AlreadyAssigned(id),
            HubError::Router(RouterError::NotFound(id)) => JoinError::NotAdmitted(id),
        }
    }
}
