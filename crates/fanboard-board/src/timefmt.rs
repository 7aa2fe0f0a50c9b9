use std::time::{SystemTime, UNIX_EPOCH};

use fanboard_store::Timestamp;

pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Coarse relative age for post and reply headers.
pub fn relative(stamp: Timestamp, now_millis: u64) -> String {
    let elapsed_secs = now_millis.saturating_sub(stamp.millis) / 1000;
    if elapsed_secs < 60 {
        "just now".to_string()
    } else if elapsed_secs < 3600 {
        format!("{}m ago", elapsed_secs / 60)
    } else if elapsed_secs < 86400 {
        format!("{}h ago", elapsed_secs / 3600)
    } else {
        format!("{}d ago", elapsed_secs / 86400)
    }
}
