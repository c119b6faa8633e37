//! Occupancy metric extraction from free-form post text.
//!
//! Posts describe the space in prose, e.g.
//! `총 좌석 수: 20석 착석 인원: 15명 대기열 인원 수: 0명 남은 좌석: 5석`.
//! Each metric is pulled out by its own labeled pattern; a label that is
//! absent leaves that metric at the [`UNKNOWN`] sentinel.

use once_cell::sync::Lazy;
use regex::Regex;

/// Sentinel for a metric whose label is absent from the text.
pub const UNKNOWN: i32 = -1;

/// The four derived integers describing space usage. Ephemeral; recomputed on
/// every poll, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OccupancyMetrics {
    pub total_seats: i32,
    pub seated_count: i32,
    pub queue_count: i32,
    pub remaining_seats: i32,
}

impl OccupancyMetrics {
    /// All four metrics at the [`UNKNOWN`] sentinel.
    #[must_use]
    pub const fn unknown() -> Self {
        Self {
            total_seats: UNKNOWN,
            seated_count: UNKNOWN,
            queue_count: UNKNOWN,
            remaining_seats: UNKNOWN,
        }
    }

    /// Metrics are usable for classification only with a positive seat total
    /// and a non-negative remaining count.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.total_seats > 0 && self.remaining_seats >= 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Metric {
    TotalSeats,
    SeatedCount,
    QueueCount,
    RemainingSeats,
}

/// Label-to-pattern table. Kept as data so alternate phrasings or locales can
/// be added without touching the extraction code.
static METRIC_PATTERNS: Lazy<Vec<(Metric, Regex)>> = Lazy::new(|| {
    [
        (Metric::TotalSeats, r"총 좌석 수:\s*(\d+)석"),
        (Metric::SeatedCount, r"착석 인원:\s*(\d+)명"),
        // The queue label varies before the colon ("대기열 인원", "대기열 인원 수")
        (Metric::QueueCount, r"대기열 인원.*?:\s*(\d+)명"),
        (Metric::RemainingSeats, r"남은 좌석:\s*(\d+)석"),
    ]
    .into_iter()
    .map(|(metric, pattern)| {
        (
            metric,
            Regex::new(pattern).expect("metric pattern compiles"),
        )
    })
    .collect()
});

fn first_capture(text: &str, pattern: &Regex) -> i32 {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|digits| digits.as_str().parse().ok())
        .unwrap_or(UNKNOWN)
}

/// Extract occupancy metrics from post text. Pure and total: absent labels
/// yield [`UNKNOWN`] and malformed text never errors.
#[must_use]
pub fn extract(text: &str) -> OccupancyMetrics {
    let mut metrics = OccupancyMetrics::unknown();
    if text.is_empty() {
        return metrics;
    }

    for (metric, pattern) in METRIC_PATTERNS.iter() {
        let value = first_capture(text, pattern);
        match metric {
            Metric::TotalSeats => metrics.total_seats = value,
            Metric::SeatedCount => metrics.seated_count = value,
            Metric::QueueCount => metrics.queue_count = value,
            Metric::RemainingSeats => metrics.remaining_seats = value,
        }
    }
    metrics
}
