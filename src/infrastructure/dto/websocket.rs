//! WebSocket envelope DTOs.
//!
//! Wire envelopes are UTF-8 text frames containing a JSON object with a
//! `type` discriminator. Audio content is an opaque base64 string that is
//! relayed verbatim, never decoded.

use serde::{Deserialize, Serialize};

/// Envelope received from a client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ClientEnvelope {
    /// Join a room, leaving the current one first if necessary
    Join {
        room_id: String,
        #[serde(default)]
        username: String,
    },
    /// Leave the current room (no-op when not in one)
    Leave,
    /// Text chat message for the whole room
    Message { content: String },
    /// Opaque audio chunk for the rest of the room
    Audio { content: String },
    /// Heartbeat ack
    Pong,
}

/// Envelope sent to a client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ServerEnvelope {
    /// Connection acknowledgment carrying the generated identity
    Connected { user_id: String },
    /// Reply to a successful join
    Joined {
        room_id: String,
        username: String,
        user_count: usize,
    },
    /// Another member joined the room
    UserJoined { username: String, user_count: usize },
    /// A member left the room
    UserLeft { username: String, user_count: usize },
    /// Roster sent to a newly joined client
    UserList { users: Vec<String> },
    /// Chat message fanned out to the whole room, sender included
    Message {
        username: String,
        content: String,
        timestamp: i64,
    },
    /// Audio chunk fanned out to every other member
    Audio { username: String, content: String },
    /// Error reply delivered to the requester only
    Error { message: String },
    /// Heartbeat ping; clients answer with `pong`
    Ping,
}
