//! Per-cycle resolution of fetched posts into display state.

use crate::metrics::{self, OccupancyMetrics};
use crate::model::Post;
use crate::status::{self, CongestionStatus};
use crate::timeline;

/// One fully processed poll result: the ordered post sequence plus the
/// metrics, congestion status, and clock label derived from the newest post.
#[derive(Debug, Clone)]
pub struct DashboardSnapshot {
    /// All fetched posts, newest first. Doubles as the history listing.
    pub posts: Vec<Post>,
    pub metrics: OccupancyMetrics,
    pub status: CongestionStatus,
    /// 12-hour clock string of the newest post; empty when unparsable.
    pub clock_label: String,
    /// Image path of the newest post, possibly relative; empty when absent.
    pub image_path: String,
}

impl DashboardSnapshot {
    /// Resolve a fetched batch: sort newest first, then extract and classify
    /// the newest post. `None` for an empty batch.
    #[must_use]
    pub fn build(mut posts: Vec<Post>) -> Option<Self> {
        timeline::sort_newest_first(&mut posts);
        let newest = posts.first()?;
        let metrics = metrics::extract(&newest.text);
        let status = status::classify(&metrics);
        let clock_label = newest.clock_label();
        let image_path = newest.image.clone();
        Some(Self {
            posts,
            metrics,
            status,
            clock_label,
            image_path,
        })
    }

    /// The newest post. Always present: empty batches never build a snapshot.
    #[must_use]
    pub fn newest(&self) -> Option<&Post> {
        self.posts.first()
    }
}
