//! Entities: connection handles and per-connection sessions.

use tokio::sync::mpsc;

use super::{
    error::{MessagePushError, SessionError},
    value_object::{ConnectionId, GroupLabel, Nickname},
};

/// Outbound queue of a connection, drained to the socket by its writer task.
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// Cheap, clonable reference to a live connection.
///
/// The TCP stream itself stays with the connection's handler task; shared
/// collections (registry, broadcast snapshots) only ever hold handles.
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    id: ConnectionId,
    channel: PusherChannel,
}

impl ConnectionHandle {
    pub fn new(id: ConnectionId, channel: PusherChannel) -> Self {
        Self { id, channel }
    }

    pub fn id(&self) -> &ConnectionId {
        &self.id
    }

    /// Queue `content` for this connection. Never blocks.
    pub fn deliver(&self, content: &str) -> Result<(), MessagePushError> {
        self.channel
            .send(content.to_string())
            .map_err(|_| MessagePushError::ChannelClosed(self.id.to_string()))
    }
}

impl PartialEq for ConnectionHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ConnectionHandle {}

/// Lifecycle of a session.
///
/// ```text
/// Connecting -> Admitting -> Welcoming -> Naming -> Grouping -> Active -> Leaving -> Closed
/// ```
///
/// The greeting goes out right after admission, before the first prompt.
/// A rejected admission jumps straight to `Closed`; a transport that drops
/// before `Active` goes to `Leaving` from wherever it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Connecting,
    Admitting,
    Naming,
    Grouping,
    Welcoming,
    Active,
    Leaving,
    Closed,
}

impl SessionState {
    /// Whether moving from `self` to `next` is a legal step.
    pub fn can_transition_to(self, next: SessionState) -> bool {
        use SessionState::*;

        matches!(
            (self, next),
            (Connecting, Admitting)
                | (Admitting, Welcoming)
                | (Admitting, Closed)
                | (Welcoming, Naming)
                | (Naming, Grouping)
                | (Grouping, Active)
                | (Welcoming | Naming | Grouping | Active, Leaving)
                | (Leaving, Closed)
        )
    }
}

/// Per-connection state owned by the connection's handler task.
#[derive(Debug)]
pub struct Session {
    handle: ConnectionHandle,
    nickname: Option<Nickname>,
    group: Option<GroupLabel>,
    state: SessionState,
}

impl Session {
    pub fn new(handle: ConnectionHandle) -> Self {
        Self {
            handle,
            nickname: None,
            group: None,
            state: SessionState::Connecting,
        }
    }

    pub fn id(&self) -> &ConnectionId {
        self.handle.id()
    }

    pub fn handle(&self) -> &ConnectionHandle {
        &self.handle
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn nickname(&self) -> Option<&Nickname> {
        self.nickname.as_ref()
    }

    pub fn group(&self) -> Option<&GroupLabel> {
        self.group.as_ref()
    }

    pub fn transition(&mut self, next: SessionState) -> Result<(), SessionError> {
        if !self.state.can_transition_to(next) {
            return Err(SessionError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        self.state = next;
        Ok(())
    }

    pub fn set_nickname(&mut self, nickname: Nickname) -> Result<(), SessionError> {
        if self.nickname.is_some() {
            return Err(SessionError::NicknameAlreadySet);
        }
        self.nickname = Some(nickname);
        Ok(())
    }

    pub fn set_group(&mut self, group: GroupLabel) -> Result<(), SessionError> {
        if self.group.is_some() {
            return Err(SessionError::GroupAlreadySet);
        }
        self.group = Some(group);
        Ok(())
    }
}
