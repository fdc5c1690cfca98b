//! Data Transfer Objects (DTOs) for the status API.
//!
//! - `http`: HTTP API response DTOs
//! - `conversion`: domain model → DTO conversions

pub mod conversion;
pub mod http;
