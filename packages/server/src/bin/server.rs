//! Grouped TCP chat server.
//!
//! Clients pick a nickname and a group; messages are relayed to the other
//! members of the same group, and newcomers get the chat history replayed.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin irori-server
//! cargo run --bin irori-server -- 2525
//! cargo run --bin irori-server -- 2525 --http-port 8080 --history-limit 500
//! ```
//!
//! Then connect with `nc 127.0.0.1 8989`.

use std::path::PathBuf;

use clap::Parser;

use irori_server::{
    config::{DEFAULT_HOST, DEFAULT_PORT, ServerConfig},
    domain::MAX_CONNECTIONS,
    infrastructure::{greeting::DEFAULT_GREETING_PATH, persister::DEFAULT_CHAT_LOG_PATH},
    ui::Server,
};
use irori_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "irori-server")]
#[command(about = "Grouped TCP chat server (connect with nc)", long_about = None)]
struct Args {
    /// Port number to listen on
    #[arg(default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = DEFAULT_HOST)]
    host: String,

    /// Banner file streamed to every new client
    #[arg(long, default_value = DEFAULT_GREETING_PATH)]
    greeting_file: PathBuf,

    /// Append-only chat log file
    #[arg(long, default_value = DEFAULT_CHAT_LOG_PATH)]
    chat_log: PathBuf,

    /// Maximum number of simultaneous clients
    #[arg(long, default_value_t = MAX_CONNECTIONS)]
    max_connections: usize,

    /// Keep only the most recent N history entries (unbounded by default)
    #[arg(long)]
    history_limit: Option<usize>,

    /// Serve the JSON status API on this port
    #[arg(long)]
    http_port: Option<u16>,
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            http_port: args.http_port,
            max_connections: args.max_connections,
            history_limit: args.history_limit,
            greeting_path: args.greeting_file,
            chat_log_path: args.chat_log,
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let config = ServerConfig::from(Args::parse());
    if let Some(limit) = config.history_limit {
        tracing::info!("History retention capped at {} entries", limit);
    }

    let server = Server::from_config(&config);
    if let Err(e) = server.run(&config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
