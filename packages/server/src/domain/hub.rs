//! The chat hub aggregate: registry, group router and history in one place.
//!
//! Keeping the three together lets a single lock guard them, so group
//! membership can never be read while the connection set is half-updated.
//! Every method here runs inside that critical section and must stay free of
//! blocking I/O; pushing to a [`ConnectionHandle`] only enqueues.

use super::{
    entity::ConnectionHandle,
    error::HubError,
    history::HistoryLog,
    message::ChatMessage,
    registry::{ConnectionRegistry, MAX_CONNECTIONS},
    router::GroupRouter,
    value_object::{ConnectionId, GroupLabel, Timestamp},
};

/// A stored message and the connections it should be pushed to.
#[derive(Debug, Clone)]
pub struct Delivery {
    pub message: ChatMessage,
    pub recipients: Vec<ConnectionHandle>,
}

impl Delivery {
    pub fn recipient_ids(&self) -> Vec<ConnectionId> {
        self.recipients.iter().map(|h| *h.id()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupStats {
    pub name: String,
    pub members: usize,
}

/// Point-in-time statistics of the hub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HubStats {
    pub connections: usize,
    pub max_connections: usize,
    pub history_len: usize,
    pub groups: Vec<GroupStats>,
}

#[derive(Debug)]
pub struct ChatHub {
    registry: ConnectionRegistry,
    router: GroupRouter,
    history: HistoryLog,
}

impl ChatHub {
    pub fn new(max_connections: usize, history: HistoryLog) -> Self {
        Self {
            registry: ConnectionRegistry::new(max_connections),
            router: GroupRouter::new(),
            history,
        }
    }

    pub fn admit(&mut self, handle: ConnectionHandle) -> bool {
        self.registry.try_admit(handle)
    }

    /// Put an admitted connection into `group`, record its join notice and
    /// replay the history to it.
    ///
    /// The replay is queued before this returns, so anything broadcast to the
    /// joiner afterwards lands behind it and nothing shows up twice.
    pub fn join(
        &mut self,
        id: &ConnectionId,
        group: GroupLabel,
        notice: &str,
        timestamp: Timestamp,
    ) -> Result<Delivery, HubError> {
        let handle = self
            .registry
            .get(id)
            .cloned()
            .ok_or_else(|| HubError::NotAdmitted(id.to_string()))?;
        self.router.assign(*id, group.clone())?;

        let message = self.history.append(notice, timestamp, Some(group));
        let recipients = self.router.route_broadcast(id, self.registry.snapshot());

        if let Err(e) = self.history.replay_to(&handle) {
            tracing::warn!("History replay to '{}' cut short: {}", id, e);
        }

        Ok(Delivery {
            message,
            recipients,
        })
    }

    /// Record `text` from `sender` and route it to the sender's group.
    ///
    /// Ungrouped senders still get their text recorded; it just has no recipients.
    pub fn post(&mut self, sender: &ConnectionId, text: &str, timestamp: Timestamp) -> Delivery {
        let group = self.router.group_of(sender).ok().cloned();
        let message = self.history.append(text, timestamp, group);
        let recipients = self
            .router
            .route_broadcast(sender, self.registry.snapshot());

        Delivery {
            message,
            recipients,
        }
    }

    /// Drop `id` from the registry and the router.
    ///
    /// If the connection had joined a group, `notice` is recorded and routed
    /// to the remaining members of that group. Calling this for an unknown or
    /// already removed connection does nothing and returns `None`.
    pub fn leave(
        &mut self,
        id: &ConnectionId,
        notice: &str,
        timestamp: Timestamp,
    ) -> Option<Delivery> {
        let group = self.router.unassign(id);
        self.registry.remove(id);

        let group = group?;
        let message = self
            .history
            .append(notice, timestamp, Some(group.clone()));
        let recipients = self
            .router
            .members_of(&group, self.registry.snapshot(), Some(id));

        Some(Delivery {
            message,
            recipients,
        })
    }

    pub fn history(&self) -> Vec<ChatMessage> {
        self.history.entries().cloned().collect()
    }

    pub fn stats(&self) -> HubStats {
        HubStats {
            connections: self.registry.len(),
            max_connections: self.registry.capacity(),
            history_len: self.history.len(),
            groups: self
                .router
                .group_sizes()
                .into_iter()
                .map(|(group, members)| GroupStats {
                    name: group.into_string(),
                    members,
                })
                .collect(),
        }
    }
}

impl Default for ChatHub {
    fn default() -> Self {
        Self::new(MAX_CONNECTIONS, HistoryLog::new())
    }
}
