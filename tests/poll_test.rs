//! Integration tests for feed polling and change detection.

use std::sync::Arc;
use std::time::Duration;

use seatwatch::config::Config;
use seatwatch::fetch::HttpPostFetcher;
use seatwatch::poll::{PollUpdate, Poller, RefreshHandle};
use seatwatch::status::CongestionLevel;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const POSTS_PATH: &str = "/api_root/Post/";

/// Bare-array feed body: two posts, the newer one carrying full metrics.
const SAMPLE_POSTS: &str = r#"[
  {
    "id": 2,
    "title": "아침 안내",
    "text": "남은 좌석: 18석",
    "created_date": "2025-12-18T08:00:00+09:00",
    "author": "관리자"
  },
  {
    "id": 1,
    "title": "점심 혼잡 안내",
    "text": "총 좌석 수: 20석 착석 인원: 15명 대기열 인원 수:  0명 남은 좌석: 5석",
    "created_date": "2025-12-18T12:10:00.123456+09:00",
    "image": "/media/blog_image/lunch.jpg",
    "author": "관리자"
  }
]"#;

/// The same two posts inside a pagination envelope.
const PAGINATED_POSTS: &str = r#"{
  "count": 2,
  "next": null,
  "previous": null,
  "results": [
    {"id": 1, "text": "총 좌석 수: 20석 남은 좌석: 5석", "created_date": "2025-12-18T12:10:00+09:00"},
    {"id": 2, "text": "남은 좌석: 18석", "created_date": "2025-12-18T08:00:00+09:00"}
  ]
}"#;

const THREE_POSTS: &str = r#"[
  {"id": 1, "created_date": "2025-12-18T08:00:00+09:00"},
  {"id": 2, "created_date": "2025-12-18T09:00:00+09:00"},
  {"id": 3, "created_date": "2025-12-18T10:00:00+09:00"}
]"#;

fn create_test_config(base_url: &str) -> Config {
    Config {
        base_url: base_url.to_string(),
        ..Config::for_testing()
    }
}

fn create_poller(
    config: &Config,
    interval: Duration,
    cancel: CancellationToken,
) -> (Poller, RefreshHandle, mpsc::Receiver<PollUpdate>) {
    let fetcher = Arc::new(HttpPostFetcher::new(config).expect("fetcher builds"));
    let (tx, rx) = mpsc::channel(8);
    let (poller, refresh) = Poller::new(fetcher, interval, tx, cancel);
    (poller, refresh, rx)
}

async fn mount_posts(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path(POSTS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "application/json"))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_poll_once_end_to_end() {
    let mock_server = MockServer::start().await;
    mount_posts(&mock_server, SAMPLE_POSTS).await;

    let config = create_test_config(&mock_server.uri());
    let (mut poller, _refresh, _rx) =
        create_poller(&config, Duration::from_millis(10), CancellationToken::new());

    let update = poller.poll_once().await.expect("update");

    // First successful poll with data is always new
    assert!(update.new_data);
    assert_eq!(poller.state().last_known_count(), 2);

    let snapshot = &update.snapshot;
    let ids: Vec<i64> = snapshot.posts.iter().map(|p| p.id).collect();
    assert_eq!(ids, [1, 2]);

    assert_eq!(snapshot.metrics.total_seats, 20);
    assert_eq!(snapshot.metrics.seated_count, 15);
    assert_eq!(snapshot.metrics.queue_count, 0);
    assert_eq!(snapshot.metrics.remaining_seats, 5);
    assert_eq!(snapshot.status.level, CongestionLevel::Moderate);
    assert_eq!(snapshot.status.fill_percent, 25);
    assert_eq!(snapshot.clock_label, "오후 12:10");
    assert_eq!(snapshot.image_path, "/media/blog_image/lunch.jpg");
}

#[tokio::test]
async fn test_poll_once_pagination_envelope() {
    let mock_server = MockServer::start().await;
    mount_posts(&mock_server, PAGINATED_POSTS).await;

    let config = create_test_config(&mock_server.uri());
    let (mut poller, _refresh, _rx) =
        create_poller(&config, Duration::from_millis(10), CancellationToken::new());

    let update = poller.poll_once().await.expect("update");
    assert_eq!(update.snapshot.posts.len(), 2);
    assert_eq!(update.snapshot.newest().map(|p| p.id), Some(1));
}

#[tokio::test]
async fn test_poll_once_envelope_without_results() {
    let mock_server = MockServer::start().await;
    mount_posts(&mock_server, r#"{"count": 0}"#).await;

    let config = create_test_config(&mock_server.uri());
    let (mut poller, _refresh, _rx) =
        create_poller(&config, Duration::from_millis(10), CancellationToken::new());

    // Empty success: no update, no count change
    assert!(poller.poll_once().await.is_none());
    assert_eq!(poller.state().last_known_count(), 0);
}

#[tokio::test]
async fn test_poll_once_server_error_keeps_state() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(POSTS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_raw(THREE_POSTS, "application/json"))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path(POSTS_PATH))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri());
    let (mut poller, _refresh, _rx) =
        create_poller(&config, Duration::from_millis(10), CancellationToken::new());

    assert!(poller.poll_once().await.is_some());
    assert_eq!(poller.state().last_known_count(), 3);

    // Failed poll: no update, count survives
    assert!(poller.poll_once().await.is_none());
    assert_eq!(poller.state().last_known_count(), 3);
}

#[tokio::test]
async fn test_poll_once_malformed_body_is_failure() {
    let mock_server = MockServer::start().await;
    mount_posts(&mock_server, "this is not json").await;

    let config = create_test_config(&mock_server.uri());
    let (mut poller, _refresh, _rx) =
        create_poller(&config, Duration::from_millis(10), CancellationToken::new());

    assert!(poller.poll_once().await.is_none());
    assert_eq!(poller.state().last_known_count(), 0);
}

#[tokio::test]
async fn test_new_data_only_on_growth() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(POSTS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"[{"id": 1, "created_date": "2025-12-18T08:00:00+09:00"}]"#,
            "application/json",
        ))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path(POSTS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_raw(THREE_POSTS, "application/json"))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri());
    let (mut poller, _refresh, _rx) =
        create_poller(&config, Duration::from_millis(10), CancellationToken::new());

    assert!(poller.poll_once().await.expect("update").new_data);
    // Growth from 1 to 3 posts
    assert!(poller.poll_once().await.expect("update").new_data);
    // Same size again: no event
    assert!(!poller.poll_once().await.expect("update").new_data);
    assert_eq!(poller.state().last_known_count(), 3);
}

#[tokio::test]
async fn test_run_loop_polls_and_cancels() {
    let mock_server = MockServer::start().await;
    mount_posts(&mock_server, SAMPLE_POSTS).await;

    let config = create_test_config(&mock_server.uri());
    let cancel = CancellationToken::new();
    let (poller, _refresh, mut rx) =
        create_poller(&config, Duration::from_millis(20), cancel.clone());

    let handle = tokio::spawn(poller.run());

    // Startup poll plus at least one timer-driven poll
    let first = tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("first update in time")
        .expect("channel open");
    assert!(first.new_data);
    let second = tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("second update in time")
        .expect("channel open");
    assert!(!second.new_data);

    cancel.cancel();
    tokio::time::timeout(Duration::from_secs(2), handle)
        .await
        .expect("poller stops after cancellation")
        .expect("poller task completes");
}

#[tokio::test]
async fn test_manual_refresh_triggers_poll() {
    let mock_server = MockServer::start().await;
    mount_posts(&mock_server, SAMPLE_POSTS).await;

    let config = create_test_config(&mock_server.uri());
    let cancel = CancellationToken::new();
    // Interval far beyond the test horizon; only startup + refresh fire
    let (poller, refresh, mut rx) =
        create_poller(&config, Duration::from_secs(3600), cancel.clone());

    let handle = tokio::spawn(poller.run());

    let _startup = tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("startup update in time")
        .expect("channel open");

    refresh.refresh();
    let refreshed = tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("refresh update in time")
        .expect("channel open");
    assert!(!refreshed.new_data);

    cancel.cancel();
    let _ = tokio::time::timeout(Duration::from_secs(2), handle).await;
}
