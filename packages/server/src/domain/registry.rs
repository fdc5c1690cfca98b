//! Bounded registry of admitted connections.
//!
//! The registry is a plain data structure; callers serialize access to it
//! through the hub's lock (see [`super::hub::ChatHub`]).

use super::{entity::ConnectionHandle, value_object::ConnectionId};

/// Default maximum number of simultaneously admitted connections
pub const MAX_CONNECTIONS: usize = 10;

#[derive(Debug)]
pub struct ConnectionRegistry {
    handles: Vec<ConnectionHandle>,
    capacity: usize,
}

impl ConnectionRegistry {
    pub fn new(capacity: usize) -> Self {
        Self {
            handles: Vec::new(),
            capacity,
        }
    }

    /// Admit `handle` if there is room.
    ///
    /// Returns `false` and leaves the registry untouched when full, even for
    /// a handle that is already present. Re-admitting a present handle while
    /// there is room succeeds without adding a duplicate.
    pub fn try_admit(&mut self, handle: ConnectionHandle) -> bool {
        if self.handles.len() >= self.capacity {
            return false;
        }
        if !self.contains(handle.id()) {
            self.handles.push(handle);
        }
        true
    }

    /// Remove the handle with `id`. Removing an absent handle is a no-op.
    pub fn remove(&mut self, id: &ConnectionId) -> bool {
        let before = self.handles.len();
        self.handles.retain(|h| h.id() != id);
        self.handles.len() != before
    }

    /// Point-in-time copy of the admitted handles, in admission order.
    pub fn snapshot(&self) -> Vec<ConnectionHandle> {
        self.handles.clone()
    }

    pub fn get(&self, id: &ConnectionId) -> Option<&ConnectionHandle> {
        self.handles.iter().find(|h| h.id() == id)
    }

    pub fn contains(&self, id: &ConnectionId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new(MAX_CONNECTIONS)
    }
}
