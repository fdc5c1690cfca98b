//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

/// Summary of one group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSummaryDto {
    pub name: String,
    pub members: usize,
}

/// Response of `GET /api/hub`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HubStatusDto {
    pub connections: usize,
    pub max_connections: usize,
    pub history_len: usize,
    pub groups: Vec<GroupSummaryDto>,
}
