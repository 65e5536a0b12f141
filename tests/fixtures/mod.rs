//! Test fixtures: in-process server startup and a minimal WebSocket client.

#![allow(dead_code)]

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::net::TcpStream;
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async, tungstenite::protocol::Message,
};

use roomrelay::ServerConfig;

/// Relay server running in-process on a dedicated port.
pub struct TestServer {
    port: u16,
}

impl TestServer {
    /// Start a server with the default configuration on `port`.
    pub async fn start(port: u16) -> Self {
        Self::start_with(ServerConfig {
            port,
            ..ServerConfig::default()
        })
        .await
    }

    /// Start a server with an explicit configuration.
    pub async fn start_with(config: ServerConfig) -> Self {
        let port = config.port;
        tokio::spawn(async move {
            if let Err(err) = roomrelay::ui::run(config).await {
                panic!("Test server failed: {err}");
            }
        });

        // Wait until the listener accepts connections
        for _ in 0..100 {
            if TcpStream::connect(("127.0.0.1", port)).await.is_ok() {
                return Self { port };
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("Test server on port {port} did not start");
    }

    pub fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    pub fn ws_url(&self) -> String {
        format!("ws://127.0.0.1:{}/ws", self.port)
    }
}

/// Thin WebSocket client speaking the relay envelope protocol.
pub struct WsClient {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl WsClient {
    /// Connect and consume the `connected` acknowledgment, returning the
    /// client together with its assigned user id.
    pub async fn connect(server: &TestServer) -> (Self, String) {
        let (stream, _) = connect_async(server.ws_url())
            .await
            .expect("Failed to connect");
        let mut client = Self { stream };

        let connected = client.recv_json().await;
        assert_eq!(connected["type"], "connected");
        let user_id = connected["userId"]
            .as_str()
            .expect("connected envelope without userId")
            .to_string();

        (client, user_id)
    }

    /// Send one JSON envelope.
    pub async fn send_json(&mut self, value: Value) {
        self.stream
            .send(Message::Text(value.to_string().into()))
            .await
            .expect("Failed to send envelope");
    }

    /// Receive the next JSON envelope (5 s timeout), whatever its type.
    pub async fn recv_json(&mut self) -> Value {
        loop {
            let msg = tokio::time::timeout(Duration::from_secs(5), self.stream.next())
                .await
                .expect("Timed out waiting for an envelope")
                .expect("Connection closed while waiting for an envelope")
                .expect("WebSocket error");

            if let Message::Text(text) = msg {
                return serde_json::from_str(text.as_str()).expect("Invalid JSON from server");
            }
        }
    }

    /// Receive envelopes until one of the given type arrives, answering
    /// heartbeat pings and skipping everything else.
    pub async fn recv_type(&mut self, envelope_type: &str) -> Value {
        for _ in 0..50 {
            let value = self.recv_json().await;
            if value["type"] == "ping" {
                self.send_json(json!({"type": "pong"})).await;
                if envelope_type != "ping" {
                    continue;
                }
            }
            if value["type"] == envelope_type {
                return value;
            }
        }
        panic!("Did not receive an envelope of type '{envelope_type}'");
    }

    /// Join a room and return the `joined` reply.
    pub async fn join(&mut self, room_id: &str, username: &str) -> Value {
        self.send_json(json!({"type": "join", "roomId": room_id, "username": username}))
            .await;
        self.recv_type("joined").await
    }

    /// Wait until the server closes the socket.
    pub async fn wait_closed(&mut self, timeout: Duration) -> bool {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            let Some(remaining) =
                deadline.checked_duration_since(tokio::time::Instant::now())
            else {
                return false;
            };
            match tokio::time::timeout(remaining, self.stream.next()).await {
                Err(_) => return false,
                Ok(None) => return true,
                Ok(Some(Err(_))) => return true,
                Ok(Some(Ok(Message::Close(_)))) => return true,
                Ok(Some(Ok(_))) => continue,
            }
        }
    }

    /// Close the connection from the client side.
    pub async fn close(mut self) {
        let _ = self.stream.close(None).await;
    }
}
