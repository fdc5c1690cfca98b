//! TCP chat server and status API.

mod handler;
mod server;
mod signal;
pub mod state;

pub use handler::session::{
    GROUP_PROMPT, INPUT_PROMPT, LEAVE_HINT, NAME_PROMPT, ROOM_FULL_NOTICE, SessionController,
};
pub use server::{BoundServer, Server};
pub use signal::shutdown_signal;
