//! Core domain models for the relay server.

use super::{
    error::RoomError,
    value_object::{ConnectionId, RoomId, Timestamp, Username},
};

/// Room membership: a connection belongs to at most one room at a time, and
/// while it does it always carries the display name resolved for that room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Membership {
    /// Room the connection currently belongs to
    pub room_id: RoomId,
    /// Display name resolved within that room
    pub username: Username,
}

/// Represents one client connection as seen by the registry.
///
/// The transport channel handle itself lives in the infrastructure layer;
/// the entity only tracks identity, membership and liveness.
#[derive(Debug, Clone)]
pub struct Connection {
    /// Connection identifier, generated at connect time
    pub id: ConnectionId,
    /// Current room membership, `None` while not in a room
    pub membership: Option<Membership>,
    /// Timestamp of the most recent heartbeat ack (or of connect)
    pub last_pong: Timestamp,
}

impl Connection {
    /// Create a new connection that is not in any room yet.
    pub fn new(id: ConnectionId, connected_at: Timestamp) -> Self {
        Self {
            id,
            membership: None,
            last_pong: connected_at,
        }
    }

    /// Enter a room under the given resolved name.
    pub fn enter_room(&mut self, room_id: RoomId, username: Username) {
        self.membership = Some(Membership { room_id, username });
    }

    /// Leave the current room, returning the membership that was held.
    pub fn leave_room(&mut self) -> Option<Membership> {
        self.membership.take()
    }

    /// Whether the connection is currently in a room.
    pub fn is_in_room(&self) -> bool {
        self.membership.is_some()
    }
}

/// Represents a named room holding the identities of its members.
///
/// Rooms are created lazily on first join and must be removed from the
/// directory as soon as the last member leaves; a room entity with zero
/// members never outlives the operation that emptied it.
#[derive(Debug, Clone)]
pub struct Room {
    /// Room identifier (user-supplied, case-sensitive)
    pub id: RoomId,
    /// Member connection identities in insertion order
    pub members: Vec<ConnectionId>,
    /// Maximum number of members allowed
    pub capacity: usize,
}

impl Room {
    /// Create a new empty room with the given member capacity.
    pub fn new(id: RoomId, capacity: usize) -> Self {
        Self {
            id,
            members: Vec::new(),
            capacity,
        }
    }

    /// Add a member to the room.
    ///
    /// # Errors
    ///
    /// Returns `RoomError::Full` if the room is at capacity
    pub fn add_member(&mut self, member: ConnectionId) -> Result<(), RoomError> {
        if self.is_full() {
            return Err(RoomError::Full {
                capacity: self.capacity,
            });
        }
        if !self.members.contains(&member) {
            self.members.push(member);
        }
        Ok(())
    }

    /// Remove a member from the room by identity.
    pub fn remove_member(&mut self, member: &ConnectionId) {
        self.members.retain(|m| m != member);
    }

    /// Whether the room is at capacity.
    pub fn is_full(&self) -> bool {
        self.members.len() >= self.capacity
    }

    /// Whether the room has no members left.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Current number of members.
    pub fn member_count(&self) -> usize {
        self.members.len()
    }
}
