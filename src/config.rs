//! Server configuration read from the environment.
//!
//! The configuration surface is intentionally small: listening port, room
//! capacity and the heartbeat interval. Invalid values fall back to the
//! defaults with a warning rather than aborting startup.

use std::time::Duration;

/// Default listening port.
pub const DEFAULT_PORT: u16 = 3000;

/// Default maximum number of members per room.
pub const DEFAULT_MAX_CONNECTIONS_PER_ROOM: usize = 50;

/// Default heartbeat ping interval.
pub const DEFAULT_PING_INTERVAL: Duration = Duration::from_millis(30_000);

/// Runtime configuration for the relay server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// TCP port the HTTP/WebSocket listener binds to
    pub port: u16,
    /// Maximum number of members allowed in a single room
    pub room_capacity: usize,
    /// Interval between heartbeat pings; a connection is evicted after
    /// missing acks for twice this duration
    pub ping_interval: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            room_capacity: DEFAULT_MAX_CONNECTIONS_PER_ROOM,
            ping_interval: DEFAULT_PING_INTERVAL,
        }
    }
}

impl ServerConfig {
    /// Build the configuration from process environment variables:
    /// `PORT`, `MAX_CONNECTIONS_PER_ROOM` and `PING_INTERVAL_MS`.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            port: parse_var(&lookup, "PORT", defaults.port),
            room_capacity: parse_var(
                &lookup,
                "MAX_CONNECTIONS_PER_ROOM",
                defaults.room_capacity,
            ),
            ping_interval: Duration::from_millis(parse_var(
                &lookup,
                "PING_INTERVAL_MS",
                defaults.ping_interval.as_millis() as u64,
            )),
        }
    }
}

/// Parse one environment variable, falling back to `default` on absence or
/// parse failure (the latter is logged).
fn parse_var<T: std::str::FromStr + Copy + std::fmt::Display>(
    lookup: impl Fn(&str) -> Option<String>,
    name: &str,
    default: T,
) -> T {
    match lookup(name) {
        None => default,
        Some(raw) => match raw.parse() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!(
                    "Invalid value '{}' for {}, falling back to {}",
                    raw,
                    name,
                    default
                );
                default
            }
        },
    }
}
