//! Append-only, timestamped chat history replayed to new joiners.

use std::collections::VecDeque;

use irori_shared::time::format_local_datetime;

use super::{
    entity::ConnectionHandle,
    error::MessagePushError,
    message::ChatMessage,
    value_object::{GroupLabel, Timestamp},
};

/// In-memory chat history.
///
/// Unbounded unless built with [`HistoryLog::with_retention`], in which case
/// the oldest entries are dropped once the limit is exceeded.
#[derive(Debug, Default)]
pub struct HistoryLog {
    entries: VecDeque<ChatMessage>,
    retention: Option<usize>,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_retention(limit: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            retention: Some(limit),
        }
    }

    /// Timestamp, render and store `text`.
    ///
    /// Timestamps never go backwards: a clock reading older than the last
    /// entry is clamped to it.
    pub fn append(
        &mut self,
        text: &str,
        timestamp: Timestamp,
        sender_group: Option<GroupLabel>,
    ) -> ChatMessage {
        let timestamp = match self.entries.back() {
            Some(last) if last.timestamp > timestamp => last.timestamp,
            _ => timestamp,
        };
        let message = ChatMessage {
            timestamp,
            sender_group,
            rendered: format!("[{}] {}", format_local_datetime(timestamp.value()), text),
        };

        self.entries.push_back(message.clone());
        if let Some(limit) = self.retention {
            while self.entries.len() > limit {
                self.entries.pop_front();
            }
        }

        message
    }

    /// Push every stored message, oldest first, to `handle`.
    ///
    /// No group filtering: joiners see the history of every group.
    pub fn replay_to(&self, handle: &ConnectionHandle) -> Result<usize, MessagePushError> {
        for message in &self.entries {
            handle.deliver(&message.line())?;
        }
        Ok(self.entries.len())
    }

    pub fn entries(&self) -> impl Iterator<Item = &ChatMessage> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn retention(&self) -> Option<usize> {
        self.retention
    }
}
