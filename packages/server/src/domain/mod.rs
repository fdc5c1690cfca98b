//! Domain layer: connection registry, group routing and chat history.
//!
//! Nothing in this module performs socket or file I/O. Ports to the outside
//! world (`ChatHubRepository`, `MessagePusher`, `LogPersister`,
//! `GreetingProvider`) are declared here and implemented by the
//! infrastructure layer.

pub mod entity;
pub mod error;
pub mod greeting;
pub mod history;
pub mod hub;
pub mod message;
pub mod message_pusher;
pub mod persister;
pub mod registry;
pub mod repository;
pub mod router;
pub mod value_object;

pub use entity::{ConnectionHandle, PusherChannel, Session, SessionState};
pub use error::{HubError, MessagePushError, PersistError, RouterError, SessionError, ValueObjectError};
pub use greeting::GreetingProvider;
pub use history::HistoryLog;
pub use hub::{ChatHub, Delivery, GroupStats, HubStats};
pub use message::{ChatMessage, render_chat_line, render_join_notice, render_leave_notice};
pub use message_pusher::MessagePusher;
pub use persister::LogPersister;
pub use registry::{ConnectionRegistry, MAX_CONNECTIONS};
pub use repository::ChatHubRepository;
pub use router::GroupRouter;
pub use value_object::{ConnectionId, ConnectionIdFactory, GroupLabel, Nickname, Timestamp};
