//! Value Objects for domain models.
//!
//! Value Objects are immutable objects that represent values in the domain.
//! They are compared by their value, not by identity.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::ValueObjectError;

/// Maximum length of a RoomId in bytes.
pub const MAX_ROOM_ID_LEN: usize = 100;

/// Maximum length of a display name in characters (before suffixing).
pub const MAX_USERNAME_CHARS: usize = 20;

/// Display name substituted when the requested name sanitizes to nothing.
pub const FALLBACK_USERNAME: &str = "User";

/// Maximum length of a chat message in characters.
pub const MAX_MESSAGE_CHARS: usize = 1000;

/// Connection identifier value object.
///
/// An opaque 128-bit random token in hex form, generated at connect time.
/// Identities are never validated against a second factor, so generation
/// must be collision-resistant (see `ConnectionIdFactory`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectionId(String);

impl ConnectionId {
    /// Wrap an already generated identifier.
    pub fn new(id: String) -> Self {
        Self(id)
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Room identifier value object.
///
/// Room ids are user-supplied and case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoomId(String);

impl RoomId {
    /// Create a new RoomId.
    ///
    /// # Returns
    ///
    /// A Result containing the RoomId or an error if validation fails
    pub fn new(id: String) -> Result<Self, ValueObjectError> {
        if id.is_empty() {
            return Err(ValueObjectError::RoomIdEmpty);
        }
        let len = id.len();
        if len > MAX_ROOM_ID_LEN {
            return Err(ValueObjectError::RoomIdTooLong {
                max: MAX_ROOM_ID_LEN,
                actual: len,
            });
        }
        Ok(Self(id))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Display name value object.
///
/// Uniqueness is guaranteed per room, not globally: `resolve` sanitizes the
/// requested name and appends an integer suffix until it does not collide
/// with any name already present in the target room.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Username(String);

impl Username {
    /// Sanitize a requested display name: clip to `MAX_USERNAME_CHARS`
    /// characters, trim surrounding whitespace, substitute
    /// `FALLBACK_USERNAME` when nothing remains.
    pub fn sanitize(requested: &str) -> Self {
        let clipped: String = requested.chars().take(MAX_USERNAME_CHARS).collect();
        let trimmed = clipped.trim();
        if trimmed.is_empty() {
            Self(FALLBACK_USERNAME.to_string())
        } else {
            Self(trimmed.to_string())
        }
    }

    /// Resolve a requested name to one unique among `existing` (the display
    /// names of the target room's current members).
    ///
    /// Collisions get an integer suffix starting at 1: `Alice` → `Alice1`
    /// → `Alice2` …
    pub fn resolve(requested: &str, existing: &[Username]) -> Self {
        let base = Self::sanitize(requested);
        if !existing.contains(&base) {
            return base;
        }
        let mut suffix = 1u32;
        loop {
            let candidate = Self(format!("{}{}", base.0, suffix));
            if !existing.contains(&candidate) {
                return candidate;
            }
            suffix += 1;
        }
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Message content value object.
///
/// Whitespace-only content is rejected; everything else is kept as sent
/// (surrounding whitespace included) but truncated to `MAX_MESSAGE_CHARS`
/// characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageContent(String);

impl MessageContent {
    /// Create a new MessageContent.
    ///
    /// # Returns
    ///
    /// A Result containing the MessageContent or an error if the content is
    /// empty after trimming
    pub fn new(content: String) -> Result<Self, ValueObjectError> {
        if content.trim().is_empty() {
            return Err(ValueObjectError::MessageContentEmpty);
        }
        if content.chars().count() > MAX_MESSAGE_CHARS {
            return Ok(Self(content.chars().take(MAX_MESSAGE_CHARS).collect()));
        }
        Ok(Self(content))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for MessageContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Timestamp value object.
///
/// Represents a Unix timestamp in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Create a new Timestamp.
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Get the inner i64 value.
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
