/// Record identifiers are millisecond-scale integers, matching the
/// numeric ids already present in persisted blobs.
pub type DbId = i64;

/// Display format for `createdAt`, `date` and `registeredAt` fields
/// (`17.10.2026, 14:03:05`).
pub const DISPLAY_FORMAT: &str = "%d.%m.%Y, %H:%M:%S";

/// Current wall-clock time in milliseconds since the Unix epoch.
pub fn now_millis() -> DbId {
    chrono::Utc::now().timestamp_millis()
}

/// Format the current local time for display fields.
pub fn display_now() -> String {
    chrono::Local::now().format(DISPLAY_FORMAT).to_string()
}
