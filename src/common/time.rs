use chrono::Utc;

/// Get the current Unix timestamp in milliseconds.
pub fn now_unix_millis() -> i64 {
    Utc::now().timestamp_millis()
}
