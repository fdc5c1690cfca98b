//! End-to-end tests: a real server on an ephemeral port, driven by raw TCP
//! clients, with the status API called over `reqwest`.

use std::{net::SocketAddr, path::PathBuf, sync::Arc, time::Duration};

use irori_server::{
    config::ServerConfig,
    infrastructure::{
        dto::http::{GroupSummaryDto, HubStatusDto},
        greeting::StaticGreetingProvider,
        message_pusher::ChannelMessagePusher,
        persister::FileLogPersister,
        repository::InMemoryChatHubRepository,
    },
    ui::{
        GROUP_PROMPT, INPUT_PROMPT, LEAVE_HINT, NAME_PROMPT, ROOM_FULL_NOTICE, Server,
        state::AppState,
    },
};
use irori_shared::time::SystemClock;
use tokio::{
    io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader},
    net::{
        TcpStream,
        tcp::{OwnedReadHalf, OwnedWriteHalf},
    },
    sync::{Mutex, oneshot},
};

const GREETING: &str = "  (o>  Irori\n  //\\\n";
const READ_TIMEOUT: Duration = Duration::from_secs(5);
const SILENCE_WINDOW: Duration = Duration::from_millis(300);

/// Helper struct to manage an in-process server
struct TestServer {
    addr: SocketAddr,
    http_addr: Option<SocketAddr>,
    log_path: PathBuf,
    stop: Option<oneshot::Sender<()>>,
}

impl TestServer {
    async fn start(max_connections: usize, with_http: bool) -> Self {
        let log_path =
            std::env::temp_dir().join(format!("irori-it-{}.log", uuid::Uuid::new_v4()));
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            http_port: with_http.then_some(0),
            max_connections,
            chat_log_path: log_path.clone(),
            ..ServerConfig::default()
        };

        let hub = Arc::new(Mutex::new(config.build_hub()));
        let state = AppState::new(
            Arc::new(InMemoryChatHubRepository::new(hub)),
            Arc::new(ChannelMessagePusher::new()),
            Arc::new(FileLogPersister::new(&log_path)),
            Arc::new(StaticGreetingProvider::new(GREETING)),
            Arc::new(SystemClock),
        );
        let bound = Server::new(state)
            .bind(&config.chat_addr(), config.http_addr().as_deref())
            .await
            .expect("Failed to bind test server");
        let addr = bound.local_addr().unwrap();
        let http_addr = bound.http_local_addr();

        let (stop_tx, stop_rx) = oneshot::channel();
        tokio::spawn(bound.serve(async move {
            let _ = stop_rx.await;
        }));

        TestServer {
            addr,
            http_addr,
            log_path,
            stop: Some(stop_tx),
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        let _ = std::fs::remove_file(&self.log_path);
    }
}

/// Helper struct playing the role of `nc`
struct TestClient {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
}

impl TestClient {
    async fn connect(addr: SocketAddr) -> Self {
        let stream = TcpStream::connect(addr).await.expect("Failed to connect");
        let (reader, writer) = stream.into_split();
        TestClient {
            reader: BufReader::new(reader),
            writer,
        }
    }

    /// Connect, answer the prompts and consume everything up to the first `> `.
    /// Returns the replayed history lines.
    async fn join(addr: SocketAddr, name: &str, group: &str) -> (Self, Vec<String>) {
        let mut client = Self::connect(addr).await;
        client.expect_welcome().await;
        client.expect(NAME_PROMPT).await;
        client.send(name).await;
        client.expect(GROUP_PROMPT).await;
        client.send(group).await;
        let replay = client.read_until_prompt().await;
        (client, replay)
    }

    /// Greeting banner and leave hint, sent right after admission.
    async fn expect_welcome(&mut self) {
        self.expect(GREETING).await;
        self.expect(LEAVE_HINT).await;
    }

    async fn send(&mut self, line: &str) {
        self.writer
            .write_all(format!("{line}\n").as_bytes())
            .await
            .expect("Failed to send");
    }

    /// Read exactly `expected.len()` bytes and compare.
    async fn expect(&mut self, expected: &str) {
        let mut buf = vec![0u8; expected.len()];
        tokio::time::timeout(READ_TIMEOUT, self.reader.read_exact(&mut buf))
            .await
            .unwrap_or_else(|_| panic!("Timed out waiting for {expected:?}"))
            .expect("Read failed");
        assert_eq!(String::from_utf8_lossy(&buf), expected);
    }

    async fn read_line(&mut self) -> String {
        let mut line = String::new();
        tokio::time::timeout(READ_TIMEOUT, self.reader.read_line(&mut line))
            .await
            .expect("Timed out waiting for a line")
            .expect("Read failed");
        line
    }

    /// Collect full lines until the input prompt shows up.
    async fn read_until_prompt(&mut self) -> Vec<String> {
        let mut lines = Vec::new();
        loop {
            let first = tokio::time::timeout(READ_TIMEOUT, self.reader.read_u8())
                .await
                .expect("Timed out waiting for the prompt")
                .expect("Read failed");
            if first == INPUT_PROMPT.as_bytes()[0] {
                let second = self.reader.read_u8().await.expect("Read failed");
                assert_eq!(second, INPUT_PROMPT.as_bytes()[1]);
                return lines;
            }
            let rest = self.read_line().await;
            lines.push(format!("{}{}", first as char, rest));
        }
    }

    /// Assert nothing arrives for a short while.
    async fn expect_silence(&mut self) {
        let mut buf = [0u8; 1];
        let result = tokio::time::timeout(SILENCE_WINDOW, self.reader.read(&mut buf)).await;
        if let Ok(read) = result {
            panic!(
                "Expected silence, got {:?}",
                read.map(|n| String::from_utf8_lossy(&buf[..n]).to_string())
            );
        }
    }

    /// Assert the server closed the connection.
    async fn expect_eof(&mut self) {
        let mut rest = Vec::new();
        tokio::time::timeout(READ_TIMEOUT, self.reader.read_to_end(&mut rest))
            .await
            .expect("Timed out waiting for the server to close")
            .expect("Read failed");
        assert!(rest.is_empty(), "unexpected trailing output: {rest:?}");
    }
}

/// Split `[YYYY-MM-DD HH:MM:SS] rest\n` into `rest\n`, checking the timestamp shape.
fn strip_timestamp(line: &str) -> &str {
    let bytes = line.as_bytes();
    assert!(bytes.len() > 22, "line too short: {line:?}");
    assert_eq!(bytes[0], b'[', "missing timestamp in {line:?}");
    for (i, b) in bytes[1..20].iter().enumerate() {
        match i {
            4 | 7 => assert_eq!(*b, b'-', "bad timestamp in {line:?}"),
            10 => assert_eq!(*b, b' ', "bad timestamp in {line:?}"),
            13 | 16 => assert_eq!(*b, b':', "bad timestamp in {line:?}"),
            _ => assert!(b.is_ascii_digit(), "bad timestamp in {line:?}"),
        }
    }
    assert_eq!(&line[20..22], "] ", "bad timestamp in {line:?}");
    &line[22..]
}

fn strip_all(lines: &[String]) -> Vec<&str> {
    lines.iter().map(|l| strip_timestamp(l)).collect()
}

#[tokio::test]
async fn test_message_reaches_same_group_peer_without_echo() {
    // テスト項目: 同じグループの相手にだけ "[timestamp] [Alice] hello\n" が届き、送信者にはエコーされない
    // given (前提条件):
    let server = TestServer::start(10, false).await;
    let (mut alice, _) = TestClient::join(server.addr, "Alice", "X").await;
    let (mut bob, bob_replay) = TestClient::join(server.addr, "Bob", "X").await;
    assert_eq!(
        strip_all(&bob_replay),
        vec!["[Alice] has joined the chat!\n", "[Bob] has joined the chat!\n"]
    );
    let notice = alice.read_line().await;
    assert_eq!(strip_timestamp(&notice), "[Bob] has joined the chat!\n");

    // when (操作):
    alice.send("hello").await;

    // then (期待する結果):
    let received = bob.read_line().await;
    assert_eq!(strip_timestamp(&received), "[Alice] hello\n");
    bob.expect_silence().await;

    alice.expect(INPUT_PROMPT).await;
    alice.expect_silence().await;
}

#[tokio::test]
async fn test_groups_are_isolated_but_history_is_shared() {
    // テスト項目: 別グループにはライブ配信されないが、参加時の履歴には全グループ分が含まれる
    // given (前提条件):
    let server = TestServer::start(10, false).await;
    let (mut alice, _) = TestClient::join(server.addr, "Alice", "A").await;
    alice.send("only for A").await;
    alice.expect(INPUT_PROMPT).await;

    // when (操作):
    let (mut dave, dave_replay) = TestClient::join(server.addr, "Dave", "B").await;
    alice.send("still only for A").await;
    alice.expect(INPUT_PROMPT).await;

    // then (期待する結果):
    assert_eq!(
        strip_all(&dave_replay),
        vec![
            "[Alice] has joined the chat!\n",
            "[Alice] only for A\n",
            "[Dave] has joined the chat!\n",
        ]
    );
    dave.expect_silence().await;
    alice.expect_silence().await;
}

#[tokio::test]
async fn test_late_joiner_gets_history_once() {
    // テスト項目: 後から参加した接続は過去 3 件を順に受信し、ライブ配信で重複しない
    // given (前提条件):
    let server = TestServer::start(10, false).await;
    let (mut alice, _) = TestClient::join(server.addr, "Alice", "X").await;
    for body in ["one", "two", "three"] {
        alice.send(body).await;
        alice.expect(INPUT_PROMPT).await;
    }

    // when (操作):
    let (mut bob, bob_replay) = TestClient::join(server.addr, "Bob", "X").await;
    let notice = alice.read_line().await;
    alice.send("four").await;

    // then (期待する結果):
    assert_eq!(strip_timestamp(&notice), "[Bob] has joined the chat!\n");
    assert_eq!(
        strip_all(&bob_replay),
        vec![
            "[Alice] has joined the chat!\n",
            "[Alice] one\n",
            "[Alice] two\n",
            "[Alice] three\n",
            "[Bob] has joined the chat!\n",
        ]
    );
    let live = bob.read_line().await;
    assert_eq!(strip_timestamp(&live), "[Alice] four\n");
    bob.expect_silence().await;
}

#[tokio::test]
async fn test_blank_name_and_group_are_reprompted() {
    // テスト項目: 空行を 2 回送ると名前を再入力させられ、名前が決まってからグループ入力に進む
    // given (前提条件):
    let server = TestServer::start(10, false).await;
    let mut client = TestClient::connect(server.addr).await;
    client.expect_welcome().await;
    client.expect(NAME_PROMPT).await;

    // when (操作) / then (期待する結果):
    client.send("").await;
    client.expect(NAME_PROMPT).await;
    client.send("   ").await;
    client.expect(NAME_PROMPT).await;
    client.send("Alice").await;
    client.expect(GROUP_PROMPT).await;
    client.send("").await;
    client.expect(GROUP_PROMPT).await;
    client.send("X").await;
    let replay = client.read_until_prompt().await;
    assert_eq!(strip_all(&replay), vec!["[Alice] has joined the chat!\n"]);
}

#[tokio::test]
async fn test_leave_in_any_case_ends_session() {
    // テスト項目: "LeAvE" で退出し、同じグループの残りの参加者に退出が通知される
    // given (前提条件):
    let server = TestServer::start(10, false).await;
    let (mut alice, _) = TestClient::join(server.addr, "Alice", "X").await;
    let (mut bob, _) = TestClient::join(server.addr, "Bob", "X").await;
    alice.read_line().await; // Bob's join notice

    // when (操作):
    bob.send("LeAvE").await;

    // then (期待する結果):
    let notice = alice.read_line().await;
    assert_eq!(strip_timestamp(&notice), "[Bob] has left the chat.\n");
    bob.expect_eof().await;
}

#[tokio::test]
async fn test_disconnect_is_announced() {
    // テスト項目: 接続が切れた場合も退出が通知される
    // given (前提条件):
    let server = TestServer::start(10, false).await;
    let (mut alice, _) = TestClient::join(server.addr, "Alice", "X").await;
    let (bob, _) = TestClient::join(server.addr, "Bob", "X").await;
    alice.read_line().await;

    // when (操作):
    drop(bob);

    // then (期待する結果):
    let notice = alice.read_line().await;
    assert_eq!(strip_timestamp(&notice), "[Bob] has left the chat.\n");
}

#[tokio::test]
async fn test_full_room_rejects_connection() {
    // テスト項目: 上限に達していると満員通知を受け取って切断される
    // given (前提条件):
    let server = TestServer::start(2, false).await;
    let mut first = TestClient::connect(server.addr).await;
    first.expect_welcome().await;
    first.expect(NAME_PROMPT).await;
    let mut second = TestClient::connect(server.addr).await;
    second.expect_welcome().await;
    second.expect(NAME_PROMPT).await;

    // when (操作):
    let mut third = TestClient::connect(server.addr).await;

    // then (期待する結果):
    third.expect(ROOM_FULL_NOTICE).await;
    third.expect_eof().await;

    // 空きができれば再び接続できる
    drop(first);
    tokio::time::sleep(Duration::from_millis(200)).await;
    let mut fourth = TestClient::connect(server.addr).await;
    fourth.expect_welcome().await;
    fourth.expect(NAME_PROMPT).await;
}

#[tokio::test]
async fn test_messages_are_written_to_chat_log() {
    // テスト項目: 配信されたメッセージがチャットログファイルに追記される
    // given (前提条件):
    let server = TestServer::start(10, false).await;
    let (mut alice, _) = TestClient::join(server.addr, "Alice", "X").await;
    let (mut bob, _) = TestClient::join(server.addr, "Bob", "X").await;
    alice.read_line().await;

    // when (操作):
    alice.send("hello").await;
    bob.read_line().await;

    // then (期待する結果):
    let log = tokio::fs::read_to_string(&server.log_path).await.unwrap();
    let lines: Vec<&str> = log.split_inclusive('\n').map(strip_timestamp).collect();
    assert_eq!(
        lines,
        vec![
            "[Alice] has joined the chat!\n",
            "[Bob] has joined the chat!\n",
            "[Alice] hello\n",
        ]
    );
}

#[tokio::test]
async fn test_status_api_reports_hub() {
    // テスト項目: ステータス API が接続数・グループ・履歴件数を返す
    // given (前提条件):
    let server = TestServer::start(10, true).await;
    let http_addr = server.http_addr.expect("status API should be bound");
    let (_alice, _) = TestClient::join(server.addr, "Alice", "X").await;
    let (_dave, _) = TestClient::join(server.addr, "Dave", "Y").await;

    // when (操作):
    let response = reqwest::get(format!("http://{http_addr}/api/hub"))
        .await
        .expect("Failed to call status API");

    // then (期待する結果):
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let status: HubStatusDto = response.json().await.expect("Invalid JSON body");
    assert_eq!(
        status,
        HubStatusDto {
            connections: 2,
            max_connections: 10,
            history_len: 2,
            groups: vec![
                GroupSummaryDto {
                    name: "X".to_string(),
                    members: 1,
                },
                GroupSummaryDto {
                    name: "Y".to_string(),
                    members: 1,
                },
            ],
        }
    );
}

#[tokio::test]
async fn test_health_check() {
    // テスト項目: ヘルスチェックが {"status":"ok"} を返す
    // given (前提条件):
    let server = TestServer::start(10, true).await;
    let http_addr = server.http_addr.expect("status API should be bound");

    // when (操作):
    let response = reqwest::get(format!("http://{http_addr}/api/health"))
        .await
        .expect("Failed to call health check");

    // then (期待する結果):
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let body: serde_json::Value = response.json().await.expect("Invalid JSON body");
    assert_eq!(body, serde_json::json!({"status": "ok"}));
}
