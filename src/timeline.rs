//! Newest-first ordering of fetched posts.
//!
//! The dashboard's latest-item view and the history listing share this one
//! ordering so "most recent" means the same thing on both.

use std::cmp::Reverse;

use crate::model::Post;

/// Sort posts newest first by normalized creation instant.
///
/// The sort is stable: posts with identical instants keep their fetch order,
/// and unparsable timestamps (zero instant) sink to the end.
pub fn sort_newest_first(posts: &mut [Post]) {
    posts.sort_by_cached_key(|post| Reverse(post.created_instant()));
}

/// The most recent post under the same ordering, without reordering the
/// input. Ties resolve to the earliest element, matching the stable sort.
#[must_use]
pub fn latest(posts: &[Post]) -> Option<&Post> {
    posts.iter().reduce(|best, candidate| {
        if candidate.created_instant() > best.created_instant() {
            candidate
        } else {
            best
        }
    })
}
