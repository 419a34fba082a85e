//! Engine binary for the Chronos multiverse.
//!
//! Wires together the epoch clock, synchronization controller, enrichment
//! backend, archive, display surface, and poll loop, then runs until
//! `Ctrl-C`.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `multiverse-config.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Create the epoch clock
//! 4. Configure enrichment (falls back to no enrichment without credentials)
//! 5. Open the archive backend and load the archive
//! 6. Start the display surface
//! 7. Start the poll loop
//! 8. Wait for `Ctrl-C`, then stop the poll loop and the server

mod error;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use multiverse_core::archive::{Archive, ArchiveStore, MemoryStore};
use multiverse_core::clock::{EpochClock, SystemTimeSource};
use multiverse_core::config::{LogFormat, LoggingConfig, MultiverseConfig};
use multiverse_core::enricher::{Enricher, NullEnricher};
use multiverse_core::poll::PollLoop;
use multiverse_core::sync::SynchronizationController;
use multiverse_db::ArchiveBackend;
use multiverse_enrich::{EnrichConfig, LlmEnricher};
use multiverse_observer::{AppState, ServerConfig, spawn_observer};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;

/// Default configuration file, relative to the working directory.
const DEFAULT_CONFIG_PATH: &str = "multiverse-config.yaml";

/// Application entry point for the engine.
///
/// # Errors
///
/// Returns an error if any initialization step fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let config_path = config_path(std::env::var("MULTIVERSE_CONFIG").ok());
    let config = load_config(&config_path)?;

    // 2. Initialize structured logging.
    init_logging(&config.logging);
    info!(
        config = %config_path.display(),
        epoch_duration_ms = config.epoch.duration_ms,
        poll_interval_ms = config.epoch.poll_interval_ms,
        "multiverse-engine starting"
    );

    // 3. Create the epoch clock.
    let clock = EpochClock::new(config.epoch.duration_ms).map_err(EngineError::from)?;

    // 4. Configure enrichment.
    let enricher = build_enricher(&config);

    // 5. Open the archive.
    let store = open_store(&config).await;
    let archive = Arc::new(Archive::open(store, config.archive.storage_key.clone()).await);

    let controller = Arc::new(
        SynchronizationController::new(clock, Arc::new(SystemTimeSource), enricher)
            .with_enrichment(config.enrichment.enabled)
            .with_request_timeout(Duration::from_millis(config.enrichment.request_timeout_ms)),
    );

    // 6. Start the display surface.
    let state = Arc::new(
        AppState::new(Arc::clone(&controller), archive)
            .with_share_base_url(config.share.base_url.clone()),
    );
    let observer = spawn_observer(&ServerConfig::from(&config.observer), state)
        .await
        .map_err(EngineError::from)?;
    info!(addr = %observer.local_addr(), "display surface started");

    // 7. Start the poll loop. Its first tick publishes the first universe.
    let poll = PollLoop::spawn(
        Arc::clone(&controller),
        Duration::from_millis(config.epoch.poll_interval_ms),
    );

    // 8. Run until Ctrl-C.
    let signal = tokio::signal::ctrl_c().await.map_err(|e| EngineError::Signal {
        message: format!("{e}"),
    });
    info!("shutdown requested");
    poll.shutdown().await;
    observer.shutdown().await;
    signal?;

    info!("multiverse-engine stopped");
    Ok(())
}

/// Resolve the configuration path from `MULTIVERSE_CONFIG`.
fn config_path(from_env: Option<String>) -> PathBuf {
    from_env
        .filter(|p| !p.trim().is_empty())
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from)
}

/// Load configuration from `path`, or defaults if the file is absent.
///
/// Environment overrides and validation apply either way.
fn load_config(path: &std::path::Path) -> Result<MultiverseConfig, EngineError> {
    if path.exists() {
        Ok(MultiverseConfig::from_file(path)?)
    } else {
        Ok(MultiverseConfig::parse("")?)
    }
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured level when set.
fn init_logging(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    match config.format {
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init(),
    }
}

/// Build the enrichment backend from the environment.
///
/// Missing or invalid credentials are not fatal: universes are shown
/// without enrichment.
fn build_enricher(config: &MultiverseConfig) -> Arc<dyn Enricher> {
    if !config.enrichment.enabled {
        info!("enrichment disabled by configuration");
        return Arc::new(NullEnricher::new("enrichment disabled"));
    }

    let placeholder = Some(config.enrichment.placeholder_image.clone());
    match EnrichConfig::from_env().and_then(|cfg| LlmEnricher::from_config(&cfg, placeholder)) {
        Ok(enricher) => Arc::new(enricher),
        Err(e) => {
            warn!(error = %e, "enrichment unavailable, showing base universes only");
            Arc::new(NullEnricher::new(e.to_string()))
        }
    }
}

/// Open the configured archive backend, falling back to memory when it is
/// unreachable.
async fn open_store(config: &MultiverseConfig) -> Arc<dyn ArchiveStore> {
    match ArchiveBackend::open(&config.archive).await {
        Ok(backend) => Arc::new(backend),
        Err(e) => {
            warn!(error = %e, "archive backend unavailable, archive will not persist");
            Arc::new(MemoryStore::new())
        }
    }
}
