//! Domain layer for the relay server.
//!
//! This module contains business logic that is independent of
//! data transfer objects (DTOs) and infrastructure concerns.

pub mod entity;
pub mod error;
pub mod factory;
pub mod repository;
pub mod value_object;

pub use entity::{Connection, Membership, Room};
pub use error::{RepositoryError, RoomError, ValueObjectError};
pub use factory::ConnectionIdFactory;
pub use repository::{
    Departure, JoinOutcome, OutboundFrame, OutboundSender, RelayRepository, RoomSummary,
};
pub use value_object::{ConnectionId, MessageContent, RoomId, Timestamp, Username};
