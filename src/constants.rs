//! Shared constants used across the application.

/// User agent string sent with feed and image requests.
pub const FEED_USER_AGENT: &str = "seatwatch/0.1";

/// Fixed tip line shown under the dashboard.
pub const PEAK_HOURS_TIP: &str =
    "점심시간 피크는 12:00-12:30, 저녁시간 피크는 18:00-18:30입니다.";
