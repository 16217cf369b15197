/// User identifiers assigned by the backend are integer primary keys.
pub type UserId = i64;

/// Timestamps are always UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
