//! Grouped TCP chat server library.
//!
//! Clients connect with a plain line-oriented TCP client (e.g. `nc`), pick a
//! nickname and a group, and chat with the other members of that group.
//! Everyone who joins gets the full chat history replayed first.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod config;
