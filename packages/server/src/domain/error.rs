//! Domain error types.

use thiserror::Error;

use super::entity::SessionState;

/// Value object validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    /// The value is empty after trimming surrounding whitespace
    #[error("{0} must not be blank")]
    Blank(&'static str),
}

/// Group routing errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouterError {
    /// The connection already has a group; groups are write-once
    #[error("connection '{0}' is already assigned to a group")]
    AlreadyAssigned(String),

    /// The connection has no group yet
    #[error("connection '{0}' is not assigned to any group")]
    NotFound(String),
}

/// Errors raised by the hub aggregate
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HubError {
    /// The connection is not in the registry
    #[error("connection '{0}' has not been admitted")]
    NotAdmitted(String),

    #[error(transparent)]
    Router(#[from] RouterError),
}

/// Session state machine errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("invalid session transition from {from:?} to {to:?}")]
    InvalidTransition { from: SessionState, to: SessionState },

    #[error("nickname is already set")]
    NicknameAlreadySet,

    #[error("group is already set")]
    GroupAlreadySet,
}

/// Errors pushing text to a connection's outbound queue
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    /// The connection's writer has gone away
    #[error("failed to push message to connection '{0}': outbound channel closed")]
    ChannelClosed(String),
}

/// Chat log persistence errors
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("failed to write chat log: {0}")]
    Io(#[from] std::io::Error),
}
