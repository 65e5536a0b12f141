//! Repository trait（データアクセス層の抽象化）
//!
//! Connection Registry と Room Directory を 1 つのポートとして定義します。
//! 実装は infrastructure 層の `InMemoryRelayRepository`（依存性の逆転）。

use async_trait::async_trait;
use tokio::sync::mpsc::UnboundedSender;

use super::{
    entity::Membership,
    error::RepositoryError,
    value_object::{ConnectionId, RoomId, Timestamp, Username},
};

/// Frame pushed into a connection's outbound channel.
///
/// The writer task owning the socket drains these; `Terminate` closes the
/// socket, which routes the connection through the ordinary cleanup path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundFrame {
    /// A serialized envelope to deliver as a text frame
    Text(String),
    /// Force the transport closed (stale connection eviction)
    Terminate,
}

/// Sender half of a connection's outbound channel.
pub type OutboundSender = UnboundedSender<OutboundFrame>;

/// Result of a successful room join.
#[derive(Debug, Clone)]
pub struct JoinOutcome {
    /// Departure from the previously joined room, when the join was implicit
    /// about leaving one
    pub departure: Option<Departure>,
    /// Room that was joined
    pub room_id: RoomId,
    /// Display name resolved for the joiner within the room
    pub username: Username,
    /// Member count after the join
    pub user_count: usize,
    /// Display names of all members after the join, in insertion order
    pub roster: Vec<Username>,
}

/// Result of leaving a room (explicitly, implicitly or on disconnect).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Departure {
    /// Room that was left
    pub room_id: RoomId,
    /// Display name the connection held in that room
    pub username: Username,
    /// Member count remaining after the departure
    pub user_count: usize,
}

/// Read-only view of one room for the observability endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomSummary {
    pub id: RoomId,
    pub user_count: usize,
}

/// Port over the shared relay state: connection registry, room directory and
/// per-connection outbound channels.
///
/// All mutations are serialized by the implementation; callers never observe
/// a room with zero members.
#[async_trait]
pub trait RelayRepository: Send + Sync {
    /// Register a fresh connection and return its generated identity.
    async fn register_connection(
        &self,
        sender: OutboundSender,
        connected_at: Timestamp,
    ) -> ConnectionId;

    /// Evict a connection from the registry. Performs a silent room
    /// departure first if the connection is still a member somewhere.
    /// Idempotent: removing an unknown connection is a no-op.
    async fn remove_connection(&self, id: &ConnectionId);

    /// Join a room, implicitly leaving the current one first.
    ///
    /// The room is created lazily when absent; joining a full room changes
    /// no membership. The requested name is resolved against the target
    /// room's current members.
    async fn join_room(
        &self,
        id: &ConnectionId,
        room_id: RoomId,
        requested_name: &str,
    ) -> Result<JoinOutcome, RepositoryError>;

    /// Leave the current room, deleting it when emptied.
    ///
    /// Returns `None` when the connection is unknown or not in a room.
    async fn leave_room(&self, id: &ConnectionId) -> Option<Departure>;

    /// Current membership of a connection.
    async fn membership_of(&self, id: &ConnectionId) -> Option<Membership>;

    /// Record a heartbeat ack for a connection.
    async fn record_pong(&self, id: &ConnectionId, at: Timestamp);

    /// Timestamp of the most recent heartbeat ack.
    async fn last_pong(&self, id: &ConnectionId) -> Option<Timestamp>;

    /// Snapshot of the outbound channels of a room's current members,
    /// optionally excluding one identity.
    async fn broadcast_targets(
        &self,
        room_id: &RoomId,
        exclude: Option<&ConnectionId>,
    ) -> Vec<(ConnectionId, OutboundSender)>;

    /// Number of registered connections.
    async fn connection_count(&self) -> usize;

    /// Member count of a room, `None` when the room does not exist.
    async fn member_count(&self, room_id: &RoomId) -> Option<usize>;

    /// Summaries of all rooms currently in the directory.
    async fn room_summaries(&self) -> Vec<RoomSummary>;
}
