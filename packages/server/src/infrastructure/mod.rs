//! Infrastructure layer: concrete implementations of the domain ports.

pub mod dto;
pub mod greeting;
pub mod message_pusher;
pub mod persister;
pub mod repository;
