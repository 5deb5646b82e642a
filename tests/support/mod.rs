// One-time server bootstrap and WebSocket helpers shared by integration tests.
#![allow(dead_code)]

use futures::StreamExt;
use serde_json::Value;
use std::{
    sync::{Arc, OnceLock},
    time::Duration,
};
use tokio::net::TcpStream;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, tungstenite::Message};

pub type WsClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

// Base URL published once the server thread has bound its port.
static SERVER_URL: OnceLock<String> = OnceLock::new();
static SERVER_READY: OnceLock<()> = OnceLock::new();

/// Starts the simulation server once per test binary and returns its base URL.
pub fn ensure_server() -> &'static str {
    SERVER_READY.get_or_init(|| {
        let published_url = Arc::new(OnceLock::<String>::new());
        let published_url_thread = Arc::clone(&published_url);
        // An OS thread outlives the per-test `#[tokio::test]` runtimes.
        std::thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("test runtime");
            runtime.block_on(async move {
                // Ephemeral port so parallel test binaries do not collide.
                let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                    .await
                    .expect("bind ephemeral test port");
                let addr = listener.local_addr().expect("get local addr");
                let _ = published_url_thread.set(format!("http://{addr}"));
                shooter_sim::run(listener).await.expect("server failed");
            });
        });
        wait_for_server(published_url);
    });

    SERVER_URL
        .get()
        .expect("server url should be initialized")
        .as_str()
}

fn wait_for_server(published_url: Arc<OnceLock<String>>) {
    let base_url = loop {
        if let Some(url) = published_url.get() {
            break url.clone();
        }
        std::thread::sleep(Duration::from_millis(10));
    };
    let _ = SERVER_URL.set(base_url.clone());

    let addr = base_url
        .strip_prefix("http://")
        .expect("base url should use http://");
    for _ in 0..100 {
        if std::net::TcpStream::connect(addr).is_ok() {
            return;
        }
        std::thread::sleep(Duration::from_millis(20));
    }
    panic!("server did not become ready in time");
}

/// Opens a WebSocket session; `query` is appended verbatim (e.g. `actor_id=5`).
pub async fn connect(query: &str) -> WsClient {
    let base = ensure_server()
        .strip_prefix("http://")
        .expect("base url should use http://");
    let url = if query.is_empty() {
        format!("ws://{base}/ws")
    } else {
        format!("ws://{base}/ws?{query}")
    };
    let (socket, _response) = tokio_tungstenite::connect_async(url)
        .await
        .expect("websocket handshake");
    socket
}

/// Reads server messages until one with the given `type` tag satisfies `accept`.
pub async fn next_message<F>(socket: &mut WsClient, kind: &str, mut accept: F) -> Value
where
    F: FnMut(&Value) -> bool,
{
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            let frame = socket
                .next()
                .await
                .expect("socket stays open")
                .expect("valid frame");
            let Message::Text(text) = frame else {
                continue;
            };
            let value: Value = serde_json::from_str(text.as_str()).expect("server sends json");
            if value["type"] == kind && accept(&value["data"]) {
                return value["data"].clone();
            }
        }
    })
    .await
    .unwrap_or_else(|_| panic!("no matching {kind} message before timeout"))
}
