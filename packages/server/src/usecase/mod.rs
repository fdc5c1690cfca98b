//! UseCase 層
//!
//! セッションのライフサイクルの各ステップ（受け入れ・参加・送信・退出）を
//! Repository / MessagePusher / LogPersister の組み合わせとして実装します。

mod admit_connection;
mod error;
mod get_hub_status;
mod join_group;
mod leave_chat;
mod publish;
mod send_message;

pub use admit_connection::AdmitConnectionUseCase;
pub use error::{ConnectError, JoinError};
pub use get_hub_status::GetHubStatusUseCase;
pub use join_group::JoinGroupUseCase;
pub use leave_chat::LeaveChatUseCase;
pub use send_message::SendMessageUseCase;
