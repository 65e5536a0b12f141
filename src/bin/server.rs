//! Room-based relay server for text chat and audio chunks.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin server
//! ```

use roomrelay::logger::setup_logger;

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    // Run the server
    if let Err(e) = roomrelay::run_server().await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
