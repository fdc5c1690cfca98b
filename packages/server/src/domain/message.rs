//! Chat messages and the text rendered for them.

use super::value_object::{GroupLabel, Nickname, Timestamp};

/// One entry of the chat history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub timestamp: Timestamp,
    /// Group of the sender; `None` when an ungrouped connection produced it.
    pub sender_group: Option<GroupLabel>,
    /// `[YYYY-MM-DD HH:MM:SS] <text>`, without a trailing newline.
    pub rendered: String,
}

impl ChatMessage {
    /// The rendered text as written to a transport or the chat log.
    pub fn line(&self) -> String {
        format!("{}\n", self.rendered)
    }
}

/// `[nickname] body`
pub fn render_chat_line(nickname: &Nickname, body: &str) -> String {
    format!("[{}] {}", nickname.as_str(), body)
}

/// `[nickname] has joined the chat!`
pub fn render_join_notice(nickname: &Nickname) -> String {
    format!("[{}] has joined the chat!", nickname.as_str())
}

/// `[nickname] has left the chat.`
pub fn render_leave_notice(nickname: &Nickname) -> String {
    format!("[{}] has left the chat.", nickname.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> Nickname {
        Nickname::new("Alice".to_string()).unwrap()
    }

    #[test]
    fn test_render_chat_line() {
        assert_eq!(render_chat_line(&alice(), "hello"), "[Alice] hello");
    }

    #[test]
    fn test_render_notices() {
        assert_eq!(render_join_notice(&alice()), "[Alice] has joined the chat!");
        assert_eq!(render_leave_notice(&alice()), "[Alice] has left the chat.");
    }

    #[test]
    fn test_line_appends_newline() {
        // テスト項目: line() は末尾に改行を付与する
        // given (前提条件):
        let message = ChatMessage {
            timestamp: Timestamp::new(0),
            sender_group: None,
            rendered: "[2024-01-01 00:00:00] [Alice] hello".to_string(),
        };

        // when (操作):
        let line = message.line();

        // then (期待する結果):
        assert_eq!(line, "[2024-01-01 00:00:00] [Alice] hello\n");
    }
}
