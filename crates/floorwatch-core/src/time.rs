use chrono::{DateTime, SecondsFormat, Utc};

/// Current time as an RFC 3339 string with second precision.
pub fn timestamp_now() -> String {
    format_timestamp(Utc::now())
}

pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}
