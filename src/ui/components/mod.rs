use chrono::{DateTime, Local};

pub mod chat_area;
pub mod input_bar;
pub mod sidebar;

/// `HH:MM` in local time; `--:--` for timestamps chrono cannot represent.
pub fn time_label(timestamp: i64) -> String {
    DateTime::from_timestamp(timestamp, 0)
        .map(|utc| utc.with_timezone(&Local).format("%H:%M").to_string())
        .unwrap_or_else(|| "--:--".to_string())
}
