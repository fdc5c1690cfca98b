//! Group membership and broadcast fan-out.

use std::collections::{BTreeMap, HashMap};

use super::{
    entity::ConnectionHandle,
    error::RouterError,
    value_object::{ConnectionId, GroupLabel},
};

/// Maps connections to their (write-once) group label.
#[derive(Debug, Default)]
pub struct GroupRouter {
    groups: HashMap<ConnectionId, GroupLabel>,
}

impl GroupRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the group for `id`. A second call for the same id fails.
    pub fn assign(&mut self, id: ConnectionId, group: GroupLabel) -> Result<(), RouterError> {
        if self.groups.contains_key(&id) {
            return Err(RouterError::AlreadyAssigned(id.to_string()));
        }
        self.groups.insert(id, group);
        Ok(())
    }

    pub fn group_of(&self, id: &ConnectionId) -> Result<&GroupLabel, RouterError> {
        self.groups
            .get(id)
            .ok_or_else(|| RouterError::NotFound(id.to_string()))
    }

    pub fn unassign(&mut self, id: &ConnectionId) -> Option<GroupLabel> {
        self.groups.remove(id)
    }

    /// Recipients of a broadcast from `sender`: every handle in `snapshot`
    /// sharing the sender's group, except the sender.
    ///
    /// An ungrouped sender has no recipients.
    pub fn route_broadcast(
        &self,
        sender: &ConnectionId,
        snapshot: Vec<ConnectionHandle>,
    ) -> Vec<ConnectionHandle> {
        match self.group_of(sender) {
            Ok(group) => self.members_of(group, snapshot, Some(sender)),
            Err(_) => Vec::new(),
        }
    }

    /// Handles in `snapshot` assigned to `group`, minus `exclude`.
    pub fn members_of(
        &self,
        group: &GroupLabel,
        snapshot: Vec<ConnectionHandle>,
        exclude: Option<&ConnectionId>,
    ) -> Vec<ConnectionHandle> {
        snapshot
            .into_iter()
            .filter(|h| Some(h.id()) != exclude)
            .filter(|h| self.groups.get(h.id()) == Some(group))
            .collect()
    }

    /// Member count per group, ordered by label.
    pub fn group_sizes(&self) -> BTreeMap<GroupLabel, usize> {
        let mut sizes = BTreeMap::new();
        for group in self.groups.values() {
            *sizes.entry(group.clone()).or_insert(0) += 1;
        }
        sizes
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
