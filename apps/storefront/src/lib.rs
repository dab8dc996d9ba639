//! # Folio Storefront Library
//!
//! Core library for the Folio storefront host.
//! This is the main entry point that configures and runs the invoke loop.
//!
//! ## Module Organization
//! ```text
//! folio_storefront/
//! ├── lib.rs          ◄─── You are here (startup & run)
//! ├── config.rs       ◄─── storefront.toml + FOLIO_* overrides
//! ├── ipc.rs          ◄─── stdin/stdout JSON-lines loop
//! ├── state/
//! │   ├── mod.rs      ◄─── StorefrontState + exports
//! │   ├── db.rs       ◄─── Database state wrapper
//! │   ├── cart.rs     ◄─── Cart store behind a mutex
//! │   └── checkout.rs ◄─── Checkout session behind a mutex
//! ├── commands/
//! │   ├── mod.rs      ◄─── dispatch by command name
//! │   ├── cart.rs     ◄─── Cart manipulation commands
//! │   ├── checkout.rs ◄─── Checkout page commands
//! │   ├── order.rs    ◄─── Confirmation commands
//! │   ├── session.rs  ◄─── Login state commands
//! │   └── config.rs   ◄─── Configuration retrieval
//! └── error.rs        ◄─── API error type for commands
//! ```

pub mod commands;
pub mod config;
pub mod error;
pub mod ipc;
pub mod state;

use directories::ProjectDirs;
use std::path::PathBuf;
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::StorefrontConfig;
use folio_db::{Database, DbConfig};
use state::StorefrontState;

/// Runs the storefront host until stdin closes.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Host Startup                                      │
/// │                                                                         │
/// │  1. Initialize Logging (stderr, RUST_LOG overrides)                     │
/// │  2. Load storefront.toml, then FOLIO_* overrides                        │
/// │  3. Determine Database Path                                             │
/// │     • FOLIO_DB_PATH / database_path if set                              │
/// │     • otherwise the platform data dir, e.g.                             │
/// │       ~/.local/share/folio-storefront/folio.db (Linux)                  │
/// │  4. Connect to Database, run pending migrations                         │
/// │  5. Build state, rehydrating the persisted cart                         │
/// │  6. Serve invoke requests on stdin/stdout                               │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run() -> anyhow::Result<()> {
    init_tracing();

    info!("Starting Folio storefront host");

    let config = StorefrontConfig::load_or_default(None);
    let db_path = get_database_path(&config)?;
    info!(?db_path, store = %config.store_name, "Database path determined");

    let db = Database::new(DbConfig::new(db_path)).await?;
    info!("Database connected and migrations applied");

    let state = StorefrontState::new(db, config).await;
    info!("State initialized");

    let stdin = BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();
    ipc::serve(&state, stdin, stdout).await?;

    state.db.inner().close().await;
    info!("Storefront host stopped");
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// Logs go to stderr; stdout carries invoke responses only.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=folio=trace` - Show trace for folio crates only
/// - Default: INFO, DEBUG for folio crates
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,folio=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Determines the database file path.
///
/// ## Platform-Specific Paths
/// - **macOS**: `~/Library/Application Support/com.folio.storefront/folio.db`
/// - **Windows**: `%APPDATA%\folio\storefront\data\folio.db`
/// - **Linux**: `~/.local/share/storefront/folio.db`
fn get_database_path(config: &StorefrontConfig) -> anyhow::Result<PathBuf> {
    if let Some(path) = &config.database_path {
        return Ok(path.clone());
    }

    let proj_dirs = ProjectDirs::from("com", "folio", "storefront")
        .ok_or_else(|| anyhow::anyhow!("Could not determine app data directory"))?;

    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)?;

    Ok(data_dir.join("folio.db"))
}
