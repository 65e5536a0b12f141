//! WebSocket connection handlers.
//!
//! Each connection gets three tasks: a reader that dispatches inbound
//! envelopes, a writer that owns the socket sink and drains the outbound
//! channel, and a liveness monitor that pings and evicts stale peers. All
//! outbound traffic — direct replies included — goes through the channel so
//! the socket has a single writer.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::domain::{ConnectionId, Departure, OutboundFrame, OutboundSender};
use crate::infrastructure::dto::websocket::{ClientEnvelope, ServerEnvelope};
use crate::ui::broadcast::{Broadcaster, send_to};
use crate::ui::state::AppState;
use crate::usecase::{
    DisconnectUseCase, HeartbeatUseCase, JoinError, JoinRoomUseCase, LeaveRoomUseCase, Liveness,
    RegisterConnectionUseCase, RelayAudioUseCase, SendMessageUseCase,
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut ws_sender, mut ws_receiver) = socket.split();

    // Register the connection and acknowledge it with its identity
    let (tx, mut rx) = mpsc::unbounded_channel();
    let connection_id = RegisterConnectionUseCase::new(state.repository.clone())
        .execute(tx.clone())
        .await;
    tracing::info!("Connection '{}' registered", connection_id);
    send_to(&tx, &ServerEnvelope::Connected {
        user_id: connection_id.as_str().to_string(),
    });

    let monitor = spawn_liveness_monitor(state.clone(), connection_id.clone(), tx.clone());

    // Reader: dispatch inbound envelopes until the peer goes away
    let recv_state = state.clone();
    let recv_id = connection_id.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = ws_receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(err) => {
                    tracing::warn!("WebSocket error on '{}': {}", recv_id, err);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    dispatch(&recv_state, &recv_id, &tx, text.as_str()).await;
                }
                Message::Close(_) => {
                    tracing::info!("Connection '{}' requested close", recv_id);
                    break;
                }
                _ => {}
            }
        }
    });

    // Writer: single owner of the socket sink
    let mut send_task = tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            match frame {
                OutboundFrame::Text(payload) => {
                    if ws_sender.send(Message::Text(payload.into())).await.is_err() {
                        break;
                    }
                }
                OutboundFrame::Terminate => {
                    let _ = ws_sender.close().await;
                    break;
                }
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };
    monitor.abort();

    // Cleanup: leave the room (notifying the remaining members) and evict
    // the connection. Runs exactly once per connection.
    let departure = DisconnectUseCase::new(state.repository.clone())
        .execute(&connection_id)
        .await;
    if let Some(departure) = departure {
        broadcast_user_left(&state, &departure).await;
    }
    tracing::info!("Connection '{}' disconnected and removed", connection_id);
}

/// Parse one inbound text frame and route it to the matching use case.
///
/// Malformed payloads and unrecognized types are logged and dropped; the
/// connection is not penalized.
async fn dispatch(
    state: &Arc<AppState>,
    connection_id: &ConnectionId,
    tx: &OutboundSender,
    text: &str,
) {
    let envelope = match serde_json::from_str::<ClientEnvelope>(text) {
        Ok(envelope) => envelope,
        Err(err) => {
            tracing::warn!(
                "Dropping unparseable envelope from '{}': {}",
                connection_id,
                err
            );
            return;
        }
    };

    match envelope {
        ClientEnvelope::Join { room_id, username } => {
            handle_join(state, connection_id, tx, room_id, username).await;
        }
        ClientEnvelope::Leave => {
            let departure = LeaveRoomUseCase::new(state.repository.clone())
                .execute(connection_id)
                .await;
            if let Some(departure) = departure {
                broadcast_user_left(state, &departure).await;
            }
        }
        ClientEnvelope::Message { content } => {
            let broadcast = SendMessageUseCase::new(state.repository.clone())
                .execute(connection_id, content)
                .await;
            if let Some(message) = broadcast {
                // Sender included: its own echo doubles as confirmation
                Broadcaster::new(state.repository.clone())
                    .broadcast(
                        &message.room_id,
                        &ServerEnvelope::Message {
                            username: message.username.into_string(),
                            content: message.content.into_string(),
                            timestamp: message.timestamp.value(),
                        },
                        None,
                    )
                    .await;
            }
        }
        ClientEnvelope::Audio { content } => {
            let broadcast = RelayAudioUseCase::new(state.repository.clone())
                .execute(connection_id, content)
                .await;
            if let Some(audio) = broadcast {
                Broadcaster::new(state.repository.clone())
                    .broadcast(
                        &audio.room_id,
                        &ServerEnvelope::Audio {
                            username: audio.username.into_string(),
                            content: audio.content,
                        },
                        Some(connection_id),
                    )
                    .await;
            }
        }
        ClientEnvelope::Pong => {
            HeartbeatUseCase::new(state.repository.clone())
                .record_pong(connection_id)
                .await;
        }
    }
}

async fn handle_join(
    state: &Arc<AppState>,
    connection_id: &ConnectionId,
    tx: &OutboundSender,
    room_id: String,
    username: String,
) {
    let result = JoinRoomUseCase::new(state.repository.clone())
        .execute(connection_id, room_id, username)
        .await;

    match result {
        Ok(outcome) => {
            if let Some(departure) = &outcome.departure {
                broadcast_user_left(state, departure).await;
            }

            send_to(tx, &ServerEnvelope::Joined {
                room_id: outcome.room_id.as_str().to_string(),
                username: outcome.username.as_str().to_string(),
                user_count: outcome.user_count,
            });

            Broadcaster::new(state.repository.clone())
                .broadcast(
                    &outcome.room_id,
                    &ServerEnvelope::UserJoined {
                        username: outcome.username.as_str().to_string(),
                        user_count: outcome.user_count,
                    },
                    Some(connection_id),
                )
                .await;

            send_to(tx, &ServerEnvelope::UserList {
                users: outcome
                    .roster
                    .iter()
                    .map(|name| name.as_str().to_string())
                    .collect(),
            });

            tracing::info!(
                "Connection '{}' joined room '{}' as '{}'",
                connection_id,
                outcome.room_id,
                outcome.username
            );
        }
        Err(JoinError::ConnectionGone) => {
            tracing::debug!("Join from unregistered connection '{}'", connection_id);
        }
        Err(err) => {
            tracing::warn!("Join rejected for '{}': {}", connection_id, err);
            send_to(tx, &ServerEnvelope::Error {
                message: err.to_string(),
            });
        }
    }
}

async fn broadcast_user_left(state: &Arc<AppState>, departure: &Departure) {
    Broadcaster::new(state.repository.clone())
        .broadcast(
            &departure.room_id,
            &ServerEnvelope::UserLeft {
                username: departure.username.as_str().to_string(),
                user_count: departure.user_count,
            },
            None,
        )
        .await;
}

/// Arm the per-connection heartbeat timer.
///
/// Each tick sends a ping and checks the time since the last ack; a peer
/// that misses the deadline gets its transport closed, which routes it
/// through the ordinary disconnect cleanup. The task ends on its own when
/// the outbound channel closes and is aborted by the connection handler
/// otherwise, so no timer outlives its connection.
fn spawn_liveness_monitor(
    state: Arc<AppState>,
    connection_id: ConnectionId,
    tx: OutboundSender,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let usecase = HeartbeatUseCase::new(state.repository.clone());
        let interval = state.config.ping_interval;
        let ping = match serde_json::to_string(&ServerEnvelope::Ping) {
            Ok(ping) => ping,
            Err(err) => {
                tracing::error!("Failed to serialize ping envelope: {}", err);
                return;
            }
        };

        let mut ticker = tokio::time::interval(interval);
        // the first tick completes immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;

            if tx.send(OutboundFrame::Text(ping.clone())).is_err() {
                break;
            }

            match usecase.check(&connection_id, interval).await {
                Liveness::Alive => {}
                Liveness::Stale => {
                    tracing::warn!(
                        "Connection '{}' missed the heartbeat deadline, terminating",
                        connection_id
                    );
                    let _ = tx.send(OutboundFrame::Terminate);
                    break;
                }
                Liveness::Gone => break,
            }
        }
    })
}
