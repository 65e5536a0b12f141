//! WebSocket relay server implementation (transport + HTTP surface).

pub mod broadcast;
pub mod handler;
mod runner;
mod signal;
pub mod state;

pub use runner::run;
