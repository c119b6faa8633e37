//! Congestion classification from occupancy metrics.

use crate::metrics::OccupancyMetrics;

/// Fraction of total seats at or below which the space counts as Moderate.
const MODERATE_THRESHOLD: f64 = 0.3;

/// Three-level congestion category plus the invalid-metrics fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CongestionLevel {
    Crowded,
    Moderate,
    Relaxed,
    Unknown,
}

impl CongestionLevel {
    /// Dashboard badge for this level.
    #[must_use]
    pub const fn badge(self) -> &'static str {
        match self {
            Self::Crowded => "😵  혼잡",
            Self::Moderate => "🙂  보통",
            Self::Relaxed => "😊  여유",
            Self::Unknown => "-",
        }
    }

    /// Human-readable description paired with the badge.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Crowded => "많이 붐비는 상태입니다. 대기열이 발생했어요.",
            Self::Moderate => "적당히 붐비는 상태입니다.",
            Self::Relaxed => "여유로운 상태입니다.",
            Self::Unknown => "",
        }
    }
}

/// Classification result handed to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CongestionStatus {
    pub level: CongestionLevel,
    pub badge: &'static str,
    pub description: &'static str,
    /// Share of seats still free, 0-100, for the progress indicator.
    pub fill_percent: u8,
}

impl CongestionStatus {
    fn from_level(level: CongestionLevel, fill_percent: u8) -> Self {
        Self {
            level,
            badge: level.badge(),
            description: level.description(),
            fill_percent,
        }
    }
}

/// Classify occupancy metrics into a congestion status.
///
/// Metrics failing the validity precondition (`total_seats > 0` and
/// `remaining_seats >= 0`) classify as `Unknown` with a zero fill.
#[must_use]
pub fn classify(metrics: &OccupancyMetrics) -> CongestionStatus {
    if !metrics.is_valid() {
        return CongestionStatus::from_level(CongestionLevel::Unknown, 0);
    }

    let level = if metrics.queue_count > 0 || metrics.remaining_seats <= 0 {
        CongestionLevel::Crowded
    } else if f64::from(metrics.remaining_seats)
        <= f64::from(metrics.total_seats) * MODERATE_THRESHOLD
    {
        CongestionLevel::Moderate
    } else {
        CongestionLevel::Relaxed
    };

    let fill = (f64::from(metrics.remaining_seats) / f64::from(metrics.total_seats) * 100.0)
        .round()
        .clamp(0.0, 100.0) as u8;

    CongestionStatus::from_level(level, fill)
}
