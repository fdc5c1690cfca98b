//! Conversion logic between domain models and DTOs.

use crate::domain::{GroupStats, HubStats};
use crate::infrastructure::dto::http as dto;

impl From<GroupStats> for dto::GroupSummaryDto {
    fn from(model: GroupStats) -> Self {
        Self {
            name: model.name,
            members: model.members,
        }
    }
}

impl From<HubStats> for dto::HubStatusDto {
    fn from(model: HubStats) -> Self {
        Self {
            connections: model.connections,
            max_connections: model.max_connections,
            history_len: model.history_len,
            groups: model.groups.into_iter().map(Into::into).collect(),
        }
    }
}
