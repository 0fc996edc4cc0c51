//! tomo-as (ToMo Assessment Server)
//!
//! Serves the ToMo questionnaire UI and its JSON API, persisting
//! submissions in the root folder.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tomo_common::config::{self, TomlConfig};
use tomo_common::db::init_database;
use tomo_common::store::{
    CorruptDataPolicy, FileBackend, MemoryBackend, SlotBackend, SqliteBackend,
};
use tomo_common::SubmissionStore;
use tomo_as::{build_router, AppState};
use tracing::{info, warn};

/// Where submissions are kept
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Backend {
    /// `tomo.db` in the root folder
    Sqlite,
    /// One JSON file per slot under `<root>/slots`
    File,
    /// Process memory; lost on exit
    Memory,
}

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "tomo-as")]
#[command(about = "ToMo (Total Motivation) assessment server")]
#[command(version)]
struct Args {
    /// HTTP port (overrides the config file)
    #[arg(short, long, env = "TOMO_PORT")]
    port: Option<u16>,

    /// Bind address
    #[arg(long, default_value = "127.0.0.1")]
    bind: String,

    /// Root folder for the database and slot files
    #[arg(short, long)]
    root_folder: Option<PathBuf>,

    /// TOML config file (defaults to the platform config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Submission storage backend
    #[arg(long, value_enum, default_value_t = Backend::Sqlite)]
    backend: Backend,

    /// Treat an undecodable submission list as empty instead of failing
    #[arg(long)]
    recover_corrupt_store: bool,

    /// Seconds of inactivity before a session is dropped
    #[arg(
        long,
        env = "TOMO_SESSION_TTL",
        default_value_t = 1800,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    session_ttl: u64,
}

/// Upper bound on the idle-session sweep period
const SWEEP_PERIOD: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tomo_as=info,tomo_common=info,tower_http=info".into()),
        )
        .init();

    // Build identification first, before any I/O
    info!(
        "Starting ToMo Assessment Server (tomo-as) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();

    let toml = match args.config.clone().or_else(config::default_config_path) {
        Some(path) => config::load_toml_config(&path).context("Failed to load config file")?,
        None => {
            warn!("No config directory on this platform; using defaults");
            TomlConfig::default()
        }
    };

    let catalog = toml.catalog().context("Invalid question catalog")?;
    info!(
        "Catalog: {} questions, {} age groups, {} job functions",
        catalog.len(),
        catalog.age_groups().len(),
        catalog.job_functions().len()
    );

    let root_folder = config::resolve_root_folder(args.root_folder.as_deref(), &toml);
    info!("Root folder: {}", root_folder.display());

    let backend: Arc<dyn SlotBackend> = match args.backend {
        Backend::Sqlite => {
            config::ensure_root_folder(&root_folder)?;
            let db_path = config::database_path(&root_folder);
            let pool = init_database(&db_path)
                .await
                .with_context(|| format!("Failed to open database {}", db_path.display()))?;
            info!("✓ Connected to database: {}", db_path.display());
            Arc::new(SqliteBackend::new(pool))
        }
        Backend::File => {
            let dir = config::slots_dir(&root_folder);
            config::ensure_root_folder(&dir)?;
            info!("Storing submissions under {}", dir.display());
            Arc::new(FileBackend::new(dir))
        }
        Backend::Memory => {
            warn!("In-memory backend: submissions are lost on exit");
            Arc::new(MemoryBackend::new())
        }
    };

    let policy = if args.recover_corrupt_store {
        warn!("Corrupt submission data will be treated as empty");
        CorruptDataPolicy::TreatAsEmpty
    } else {
        CorruptDataPolicy::FailFast
    };
    let store = SubmissionStore::new(backend).with_policy(policy);

    match store.load_all().await {
        Ok(existing) => info!("✓ {} stored submissions", existing.len()),
        Err(e) => warn!("Stored submissions are unreadable: {}", e),
    }

    let session_ttl = Duration::from_secs(args.session_ttl);
    let state = AppState::new(catalog, store).with_session_ttl(session_ttl);
    let sweeper = state.sessions.spawn_sweeper(SWEEP_PERIOD.min(session_ttl));
    info!("Idle sessions expire after {}s", session_ttl.as_secs());
    let app = build_router(state);

    let port = args.port.unwrap_or_else(|| toml.port_or_default());
    let addr: SocketAddr = format!("{}:{}", args.bind, port)
        .parse()
        .with_context(|| format!("Invalid bind address {}:{}", args.bind, port))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("tomo-as listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    sweeper.abort();

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("Failed to install terminate handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
