//! Seatwatch library.
//!
//! A monitor for a feed of seating-status posts. Each poll fetches the post
//! collection, orders it by true creation time, derives occupancy metrics and
//! a congestion level from the newest post, and raises an alert when the feed
//! has grown since the previous poll.

pub mod config;
pub mod constants;
pub mod dashboard;
pub mod fetch;
pub mod image;
pub mod metrics;
pub mod model;
pub mod poll;
pub mod status;
pub mod timeline;
pub mod timestamp;
