//! DocVault Server: hierarchical document store bootstrap
//!
//! Wires configuration, logging, the tree store, and the file mirror
//! together, makes sure the root folder exists, and reports the tree.

use std::path::Path;
use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use docvault_core::config::AppConfig;
use docvault_core::error::AppError;
use docvault_database::DatabasePool;
use docvault_service::{RequestContext, Services};
use docvault_storage::LocalFileMirror;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from file and environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("DOCVAULT_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main bootstrap function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting DocVault v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Create data directories ──────────────────────────
    create_data_directories(&config).await?;

    // ── Step 2: Database connection + migrations ─────────────────
    let db_pool = DatabasePool::connect(&config.database).await?;
    docvault_database::migration::run_migrations(db_pool.pool()).await?;

    // ── Step 3: File mirror ──────────────────────────────────────
    let mirror = LocalFileMirror::from_config(&config.storage).await?;
    tracing::info!(
        tree_root = %mirror.tree_root().display(),
        staging_root = %mirror.staging_root().display(),
        "File mirror ready"
    );

    // ── Step 4: Services + root folder ───────────────────────────
    let services = Services::new(&db_pool, Arc::new(mirror));
    let root = services.folders.ensure_root(&RequestContext::system()).await?;
    tracing::info!(folder_id = %root.id, "Root folder ready");

    // ── Step 5: Report the current tree ──────────────────────────
    let tree = services.tree.get_all_folders().await?;
    tracing::info!(
        folders = tree.total_folders,
        documents = tree.total_documents,
        "Folder tree loaded"
    );
    println!("{}", serde_json::to_string_pretty(&tree)?);

    db_pool.close().await;
    tracing::info!("DocVault shut down cleanly");
    Ok(())
}

/// Create the directory holding the SQLite file.
async fn create_data_directories(config: &AppConfig) -> Result<(), AppError> {
    let db_file = config
        .database
        .url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:");
    let db_file = db_file.split('?').next().unwrap_or(db_file);

    if let Some(dir) = Path::new(db_file).parent().filter(|d| !d.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(dir).await.map_err(|e| {
            AppError::internal(format!("Failed to create dir '{}': {}", dir.display(), e))
        })?;
    }

    Ok(())
}
