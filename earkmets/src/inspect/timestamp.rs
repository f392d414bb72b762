//! ISO-8601 timestamps with second precision.

use std::fs::Metadata;
use std::time::SystemTime;

use chrono::{DateTime, Utc};

/// Second precision, UTC designator (`2024-01-31T12:00:00Z`).
pub const ISO_SECONDS_UTC: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Second precision without designator (`2024-01-31T12:00:00`).
pub const ISO_SECONDS: &str = "%Y-%m-%dT%H:%M:%S";

/// The current time formatted with [`ISO_SECONDS`].
pub fn current_timestamp() -> String {
    Utc::now().format(ISO_SECONDS).to_string()
}

/// Format a system time in UTC.
pub fn format_system_time(time: SystemTime, format: &str) -> String {
    DateTime::<Utc>::from(time).format(format).to_string()
}

/// Creation time of a file formatted with [`ISO_SECONDS_UTC`].
///
/// Falls back to the modification time on filesystems that do not record
/// creation, and to the current time if neither is available.
pub fn file_created_timestamp(metadata: &Metadata) -> String {
    let time = metadata
        .created()
        .or_else(|_| metadata.modified())
        .unwrap_or_else(|_| SystemTime::now());
    format_system_time(time, ISO_SECONDS_UTC)
}
