//! Wire and domain model for feed posts.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::timestamp;

fn default_title() -> String {
    "제목 없음".to_string()
}

fn default_author() -> String {
    "익명".to_string()
}

/// One status post from the feed.
///
/// Every field is optional on the wire; absent fields take the same defaults
/// the service's other clients use. Posts are rebuilt fresh on each fetch and
/// discarded after the poll cycle renders.
#[derive(Debug, Clone, Deserialize)]
pub struct Post {
    #[serde(default)]
    pub id: i64,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub created_date: String,
    #[serde(default)]
    pub published_date: String,
    #[serde(default)]
    pub image: String,
    #[serde(default = "default_author")]
    pub author: String,
}

impl Post {
    /// Normalized creation instant; the zero instant when `created_date` is
    /// unparsable.
    #[must_use]
    pub fn created_instant(&self) -> DateTime<Utc> {
        timestamp::normalize(&self.created_date)
    }

    /// Localized 12-hour clock string for the creation time; empty when
    /// unparsable.
    #[must_use]
    pub fn clock_label(&self) -> String {
        timestamp::clock_label(&self.created_date)
    }

    /// Raw date shown on history rows: published when present, created
    /// otherwise.
    #[must_use]
    pub fn display_date(&self) -> &str {
        if self.published_date.is_empty() {
            &self.created_date
        } else {
            &self.published_date
        }
    }
}

/// Feed response body: either a bare array of posts or a pagination envelope
/// with a `results` field. A `results`-less object decodes as empty.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum PostsResponse {
    Posts(Vec<Post>),
    Paginated {
        #[serde(default)]
        results: Vec<Post>,
    },
}

impl PostsResponse {
    #[must_use]
    pub fn into_posts(self) -> Vec<Post> {
        match self {
            Self::Posts(posts) => posts,
            Self::Paginated { results } => results,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_defaults() {
        let post: Post = serde_json::from_str("{}").expect("empty object decodes");
        assert_eq!(post.id, 0);
        assert_eq!(post.title, "제목 없음");
        assert_eq!(post.author, "익명");
        assert!(post.text.is_empty());
        assert!(post.image.is_empty());
        assert!(timestamp::is_zero(post.created_instant()));
    }

    #[test]
    fn test_display_date_prefers_published() {
        let mut post: Post = serde_json::from_str("{}").unwrap();
        post.created_date = "2025-12-18T09:00:00".to_string();
        assert_eq!(post.display_date(), "2025-12-18T09:00:00");
        post.published_date = "2025-12-18T10:00:00".to_string();
        assert_eq!(post.display_date(), "2025-12-18T10:00:00");
    }

    #[test]
    fn test_response_bare_array() {
        let body = r#"[{"id": 1}, {"id": 2}]"#;
        let posts = serde_json::from_str::<PostsResponse>(body)
            .unwrap()
            .into_posts();
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].id, 1);
    }

    #[test]
    fn test_response_pagination_envelope() {
        let body = r#"{"count": 1, "results": [{"id": 7, "title": "점심"}]}"#;
        let posts = serde_json::from_str::<PostsResponse>(body)
            .unwrap()
            .into_posts();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].title, "점심");
    }

    #[test]
    fn test_response_envelope_without_results() {
        let posts = serde_json::from_str::<PostsResponse>(r#"{"count": 0}"#)
            .unwrap()
            .into_posts();
        assert!(posts.is_empty());
    }
}
