//! Compact relative timestamps for recommendation cards.

use chrono::{DateTime, Duration, Utc};

/// Render how long ago `timestamp` was, relative to `now`.
///
/// Buckets are minutes, hours, days, then whole weeks. Anything under a
/// minute, including timestamps in the future, reads `just now`.
///
/// # Examples
/// ```
/// use chrono::{Duration, TimeZone, Utc};
/// use recky::domain::relative_time_label;
///
/// let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
/// assert_eq!(relative_time_label(now - Duration::minutes(5), now), "5m ago");
/// assert_eq!(relative_time_label(now - Duration::days(15), now), "2w ago");
/// ```
pub fn relative_time_label(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(timestamp);

    if elapsed < Duration::minutes(1) {
        "just now".to_owned()
    } else if elapsed < Duration::hours(1) {
        format!("{}m ago", elapsed.num_minutes())
    } else if elapsed < Duration::days(1) {
        format!("{}h ago", elapsed.num_hours())
    } else if elapsed < Duration::days(7) {
        format!("{}d ago", elapsed.num_days())
    } else {
        format!("{}w ago", elapsed.num_weeks())
    }
}
