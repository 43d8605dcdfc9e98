/// Render epoch milliseconds as RFC 3339 (UTC). Out-of-range values render as the epoch.
pub fn millis_to_rfc3339(millis: i64) -> String {
    chrono::DateTime::from_timestamp_millis(millis)
        .unwrap_or_default()
        .to_rfc3339()
}
