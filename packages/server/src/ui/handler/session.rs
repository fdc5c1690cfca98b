//! Per-connection session handling.
//!
//! Every accepted TCP stream gets two tasks: the session task below, which
//! reads lines and drives the [`Session`] state machine, and a writer task
//! ([`pusher_loop`]) that drains the connection's outbound queue to the
//! socket. Everything written to the client, prompts included, goes through
//! that queue so output ordering matches enqueue ordering.

use std::{net::SocketAddr, sync::Arc, time::Duration};

use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader},
    net::{TcpStream, tcp::OwnedWriteHalf},
    sync::mpsc,
};
use tracing::Instrument;

use crate::{
    domain::{
        ConnectionHandle, ConnectionIdFactory, GroupLabel, Nickname, Session, SessionState,
        ValueObjectError,
    },
    ui::state::AppState,
};

pub const NAME_PROMPT: &str = "[ ENTER YOUR NAME ]: ";
pub const GROUP_PROMPT: &str = "[ ENTER YOUR GROUP ]: ";
pub const INPUT_PROMPT: &str = "> ";
pub const ROOM_FULL_NOTICE: &str = "The chat room is full. Please try again later.\n";
pub const LEAVE_HINT: &str = "To leave the chat, type 'leave'\n\n";

/// Case-insensitive command ending a session
const LEAVE_COMMAND: &str = "leave";

/// Longest accepted input line, newline included
const MAX_LINE_BYTES: u64 = 8 * 1024;

/// How long a closing session waits for its queued output to reach the socket
const FLUSH_TIMEOUT: Duration = Duration::from_secs(5);

/// Serve one accepted TCP connection from admission to close.
pub async fn handle_connection(stream: TcpStream, peer: SocketAddr, state: Arc<AppState>) {
    let (reader, writer) = stream.into_split();
    let (tx, rx) = mpsc::unbounded_channel();
    let handle = ConnectionHandle::new(ConnectionIdFactory::generate(), tx);
    let span = tracing::info_span!("session", id = %handle.id(), %peer);

    async move {
        tracing::info!("Accepted connection");
        let mut send_task = pusher_loop(rx, writer);

        let final_state = SessionController::new(state, handle)
            .run(BufReader::new(reader))
            .await;

        // The writer stops once every clone of the handle is gone.
        if tokio::time::timeout(FLUSH_TIMEOUT, &mut send_task)
            .await
            .is_err()
        {
            tracing::warn!("Outbound queue did not drain in time, dropping it");
            send_task.abort();
        }
        tracing::info!("Connection closed ({:?})", final_state);
    }
    .instrument(span)
    .await
}

/// Spawns a task that drains the outbound queue into the socket.
///
/// A slow or stalled client only ever blocks this task; broadcasters just
/// enqueue. The write half is shut down when the queue closes.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut writer: OwnedWriteHalf,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(chunk) = rx.recv().await {
            if let Err(e) = writer.write_all(chunk.as_bytes()).await {
                tracing::debug!("Write to client failed: {}", e);
                break;
            }
        }
        let _ = writer.shutdown().await;
    })
}

/// Drives one [`Session`] through its lifecycle over any line source.
pub struct SessionController {
    state: Arc<AppState>,
    session: Session,
}

impl SessionController {
    pub fn new(state: Arc<AppState>, handle: ConnectionHandle) -> Self {
        Self {
            state,
            session: Session::new(handle),
        }
    }

    /// Run the session to completion and return its final state.
    ///
    /// Whatever ends the conversation (the `leave` command, end of stream
    /// or a read error) the connection is removed from the hub before this
    /// returns.
    pub async fn run<R>(mut self, mut reader: R) -> SessionState
    where
        R: AsyncBufRead + Unpin,
    {
        self.enter(SessionState::Admitting);
        let admitted = self
            .state
            .admit_connection_usecase
            .execute(self.session.handle().clone())
            .await;
        if let Err(e) = admitted {
            tracing::warn!("Connection rejected: {}", e);
            self.push(ROOM_FULL_NOTICE).await;
            self.enter(SessionState::Closed);
            return self.session.state();
        }

        self.converse(&mut reader).await;

        self.enter(SessionState::Leaving);
        self.state
            .leave_chat_usecase
            .execute(self.session.id(), self.session.nickname())
            .await;
        self.enter(SessionState::Closed);
        self.session.state()
    }

    async fn converse<R>(&mut self, reader: &mut R)
    where
        R: AsyncBufRead + Unpin,
    {
        self.enter(SessionState::Welcoming);
        let greeting = self.state.greeting_provider.greeting().await;
        if !greeting.is_empty() {
            self.push(&greeting).await;
        }
        self.push(LEAVE_HINT).await;

        self.enter(SessionState::Naming);
        let Some(nickname) = self.read_until_valid(reader, NAME_PROMPT, Nickname::new).await else {
            return;
        };
        if let Err(e) = self.session.set_nickname(nickname.clone()) {
            tracing::error!("{}", e);
            return;
        }

        self.enter(SessionState::Grouping);
        let Some(group) = self
            .read_until_valid(reader, GROUP_PROMPT, GroupLabel::new)
            .await
        else {
            return;
        };
        if let Err(e) = self.session.set_group(group.clone()) {
            tracing::error!("{}", e);
            return;
        }

        self.enter(SessionState::Active);
        if let Err(e) = self
            .state
            .join_group_usecase
            .execute(self.session.id(), &nickname, group)
            .await
        {
            tracing::warn!("Failed to join group: {}", e);
            return;
        }

        loop {
            self.push(INPUT_PROMPT).await;
            let Some(line) = read_line(reader).await else {
                break;
            };
            let input = line.trim();
            if input.eq_ignore_ascii_case(LEAVE_COMMAND) {
                tracing::info!("'{}' asked to leave", nickname.as_str());
                break;
            }
            if input.is_empty() {
                continue;
            }
            self.state
                .send_message_usecase
                .execute(self.session.id(), &nickname, input)
                .await;
        }
    }

    /// Prompt and read until `parse` accepts a line. `None` once the client is gone.
    async fn read_until_valid<R, T>(
        &self,
        reader: &mut R,
        prompt: &str,
        parse: fn(String) -> Result<T, ValueObjectError>,
    ) -> Option<T>
    where
        R: AsyncBufRead + Unpin,
    {
        loop {
            self.push(prompt).await;
            let line = read_line(reader).await?;
            match parse(line) {
                Ok(value) => return Some(value),
                Err(e) => tracing::debug!("Re-prompting: {}", e),
            }
        }
    }

    async fn push(&self, text: &str) {
        if let Err(e) = self
            .state
            .message_pusher
            .push_to(self.session.handle(), text)
            .await
        {
            tracing::debug!("{}", e);
        }
    }

    fn enter(&mut self, next: SessionState) {
        if let Err(e) = self.session.transition(next) {
            tracing::error!("{}", e);
        }
    }
}

/// Read one line of at most [`MAX_LINE_BYTES`].
///
/// `None` on end of stream, a read error or an overlong line; all of them end
/// the session.
async fn read_line<R>(reader: &mut R) -> Option<String>
where
    R: AsyncBufRead + Unpin,
{
    let mut line = String::new();
    let mut limited = (&mut *reader).take(MAX_LINE_BYTES);
    match limited.read_line(&mut line).await {
        Ok(0) => {
            tracing::info!("Client disconnected");
            None
        }
        Ok(n) if n as u64 >= MAX_LINE_BYTES && !line.ends_with('\n') => {
            tracing::warn!("Input line exceeds {} bytes, closing", MAX_LINE_BYTES);
            None
        }
        Ok(_) => Some(line),
        Err(e) => {
            tracing::warn!("Error reading input: {}", e);
            None
        }
    }
}
