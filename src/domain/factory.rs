//! Factories for generated identifiers.

use uuid::Uuid;

use super::value_object::ConnectionId;

/// Factory for connection identifiers.
pub struct ConnectionIdFactory;

impl ConnectionIdFactory {
    /// Generate a fresh connection identifier: 128 random bits rendered as
    /// 32 hex characters. Identities are never validated against a second
    /// factor, so collision resistance is the only requirement.
    pub fn generate() -> ConnectionId {
        ConnectionId::new(Uuid::new_v4().simple().to_string())
    }
}
