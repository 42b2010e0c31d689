//! easycache demo - session store walkthrough
//!
//! Stores a user session, reads it back, deletes it and confirms it is gone,
//! using whichever cache variant `CACHE_VARIANT` selects.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::task::LocalSet;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use easycache::{CacheVariant, Config, ConcurrentTtlCache, SimpleTtlCache, TtlCache};

/// How long a session stays in the cache.
const SESSION_TTL: Duration = Duration::from_secs(30 * 60);

const SESSION_KEY: &str = "session_101";

/// A logged-in user session.
#[derive(Debug, Clone, Serialize)]
struct Session {
    user_id: u64,
    username: String,
    expires: DateTime<Utc>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "easycache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    info!(
        "Configuration loaded: variant={}, cleanup_interval={}ms",
        config.variant,
        config.cleanup_interval.as_millis()
    );

    match config.variant {
        CacheVariant::Concurrent => {
            let cache = ConcurrentTtlCache::<Session>::from_config(&config)?;
            run_session_demo(&cache).await?;
            cache.shutdown().await;
        }
        CacheVariant::Simple => {
            // The simple cache and its sweep task must share one thread
            LocalSet::new()
                .run_until(async {
                    let cache = SimpleTtlCache::<Session>::from_config(&config)?;
                    run_session_demo(&cache).await?;
                    cache.shutdown().await;
                    Ok::<_, anyhow::Error>(())
                })
                .await?;
        }
    }

    info!("Demo complete");
    Ok(())
}

/// Walks one session through set, get and delete.
async fn run_session_demo<C: TtlCache<Session>>(cache: &C) -> anyhow::Result<()> {
    let session = Session {
        user_id: 101,
        username: "john_doe".to_string(),
        expires: Utc::now() + chrono::Duration::minutes(30),
    };

    cache.set(SESSION_KEY, session, SESSION_TTL);

    // Simulate a delay before reading the session back
    tokio::time::sleep(Duration::from_secs(1)).await;

    match cache.get_with_check(SESSION_KEY) {
        Some(session) => info!("Session found: {}", serde_json::to_string(&session)?),
        None => warn!("Session not found or expired"),
    }

    cache.delete(SESSION_KEY);

    if let Some(session) = cache.get_with_check(SESSION_KEY) {
        anyhow::bail!("Unexpected session found after delete: {:?}", session);
    }
    info!("Session deleted successfully");

    Ok(())
}
