//! Broadcast engine: fan-out of one envelope to the members of a room.

use std::sync::Arc;

use crate::domain::{ConnectionId, OutboundFrame, OutboundSender, RelayRepository, RoomId};
use crate::infrastructure::dto::websocket::ServerEnvelope;

/// Delivers envelopes to the current members of a room.
///
/// The envelope is serialized once per broadcast; delivery is fire-and-forget
/// through each member's outbound channel. A member whose channel is already
/// closed is logged and skipped — its own close path cleans it up.
pub struct Broadcaster {
    repository: Arc<dyn RelayRepository>,
}

impl Broadcaster {
    /// Create a new Broadcaster over the shared repository.
    pub fn new(repository: Arc<dyn RelayRepository>) -> Self {
        Self { repository }
    }

    /// Deliver `envelope` to every member of `room_id`, skipping `exclude`
    /// when given. Membership is snapshotted at call time; a member joining
    /// or leaving mid-broadcast may or may not receive it.
    pub async fn broadcast(
        &self,
        room_id: &RoomId,
        envelope: &ServerEnvelope,
        exclude: Option<&ConnectionId>,
    ) {
        let payload = match serde_json::to_string(envelope) {
            Ok(payload) => payload,
            Err(err) => {
                tracing::error!("Failed to serialize envelope: {}", err);
                return;
            }
        };

        for (member, sender) in self.repository.broadcast_targets(room_id, exclude).await {
            if sender.send(OutboundFrame::Text(payload.clone())).is_err() {
                tracing::warn!("Failed to deliver envelope to '{}'", member);
            }
        }
    }
}

/// Send one envelope directly to a single connection's outbound channel.
pub fn send_to(sender: &OutboundSender, envelope: &ServerEnvelope) {
    match serde_json::to_string(envelope) {
        Ok(payload) => {
            if sender.send(OutboundFrame::Text(payload)).is_err() {
                tracing::debug!("Outbound channel closed before delivery");
            }
        }
        Err(err) => tracing::error!("Failed to serialize envelope: {}", err),
    }
}
