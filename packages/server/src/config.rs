//! Server configuration.

use std::path::PathBuf;

use crate::{
    domain::{ChatHub, HistoryLog, MAX_CONNECTIONS},
    infrastructure::{greeting::DEFAULT_GREETING_PATH, persister::DEFAULT_CHAT_LOG_PATH},
};

/// Default chat port
pub const DEFAULT_PORT: u16 = 8989;

/// Default bind address (all interfaces)
pub const DEFAULT_HOST: &str = "0.0.0.0";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Host address to bind the chat and status listeners to
    pub host: String,
    /// Chat (TCP) port
    pub port: u16,
    /// Status API port; the API is disabled when `None`
    pub http_port: Option<u16>,
    /// Maximum number of simultaneously admitted connections
    pub max_connections: usize,
    /// Keep at most this many history entries; unbounded when `None`
    pub history_limit: Option<usize>,
    /// Greeting banner shown to every new client
    pub greeting_path: PathBuf,
    /// Append-only chat log
    pub chat_log_path: PathBuf,
}

impl ServerConfig {
    pub fn chat_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn http_addr(&self) -> Option<String> {
        self.http_port.map(|port| format!("{}:{}", self.host, port))
    }

    /// Build an empty hub honoring the capacity and retention settings.
    pub fn build_hub(&self) -> ChatHub {
        let history = match self.history_limit {
            Some(limit) => HistoryLog::with_retention(limit),
            None => HistoryLog::new(),
        };
        ChatHub::new(self.max_connections, history)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            http_port: None,
            max_connections: MAX_CONNECTIONS,
            history_limit: None,
            greeting_path: PathBuf::from(DEFAULT_GREETING_PATH),
            chat_log_path: PathBuf::from(DEFAULT_CHAT_LOG_PATH),
        }
    }
}
