//! メッセージ送信（通知）の実装
//!
//! - `channel`: 接続ごとの送信キュー（mpsc）を使った実装

pub mod channel;

pub use channel::ChannelMessagePusher;
