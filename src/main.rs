use std::sync::Arc;

use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use seatwatch::config::Config;
use seatwatch::constants::PEAK_HOURS_TIP;
use seatwatch::fetch::HttpPostFetcher;
use seatwatch::image::ImageFetcher;
use seatwatch::poll::{PollUpdate, Poller};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    init_tracing()?;

    info!("Starting seatwatch");

    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    info!(posts_url = %config.posts_url(), interval = ?config.poll_interval, "Configuration loaded");

    let fetcher =
        Arc::new(HttpPostFetcher::new(&config).context("Failed to build post fetcher")?);
    let images = ImageFetcher::new(&config).context("Failed to build image fetcher")?;

    let cancel = CancellationToken::new();
    let (updates_tx, mut updates_rx) = tokio::sync::mpsc::channel(8);
    let (poller, _refresh) = Poller::new(
        fetcher,
        config.poll_interval,
        updates_tx,
        cancel.clone(),
    );
    let poller_handle = tokio::spawn(poller.run());

    let history_limit = config.history_log_limit;
    let consumer_handle = tokio::spawn(async move {
        while let Some(update) = updates_rx.recv().await {
            render_update(&images, &update, history_limit).await;
        }
    });

    // Wait for shutdown signal
    shutdown_signal().await;

    info!("Shutting down...");

    cancel.cancel();
    let _ = poller_handle.await;
    // The update channel closes with the poller, ending the consumer
    let _ = consumer_handle.await;

    info!("Shutdown complete");

    Ok(())
}

async fn render_update(images: &ImageFetcher, update: &PollUpdate, history_limit: usize) {
    if update.new_data {
        // Terminal bell stands in for the notification tone
        print!("\x07");
        info!("새 이벤트 감지: 서버에서 새로운 데이터가 감지되었습니다.");
    }

    let snapshot = &update.snapshot;
    info!(
        badge = snapshot.status.badge,
        description = snapshot.status.description,
        fill_percent = snapshot.status.fill_percent,
        queue = snapshot.metrics.queue_count,
        remaining = snapshot.metrics.remaining_seats,
        total = snapshot.metrics.total_seats,
        clock = %snapshot.clock_label,
        "Dashboard updated"
    );
    info!("{PEAK_HOURS_TIP}");

    if !snapshot.image_path.is_empty() {
        if let Some(bytes) = images.fetch(&snapshot.image_path).await {
            info!(bytes = bytes.len(), "Hero image retrieved");
        }
    }

    for post in update.snapshot.posts.iter().take(history_limit) {
        info!(
            id = post.id,
            author = %post.author,
            date = %post.display_date(),
            title = %post.title,
            "History"
        );
    }
}

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,seatwatch=debug"));

    // Check if JSON logging is requested
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| matches!(v.to_lowercase().as_str(), "json" | "structured"))
        .unwrap_or(false);

    if use_json {
        // Structured JSON logging for production
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;
    } else {
        // Pretty-printed logging for development
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
