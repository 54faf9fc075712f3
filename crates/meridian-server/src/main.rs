//! Meridian server binary.
//!
//! Reads `config.toml` (or the path given with `--config`) plus `MERIDIAN_*`
//! environment overrides, opens the SQLite database, and serves the JSON API
//! over HTTP. TLS termination and sign-in are left to a fronting proxy.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use meridian_api::{AppState, HeaderIdentity, objects::DiskObjectStore};
use meridian_server::{ServerConfig, expand_tilde};
use meridian_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Meridian API server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(
      config::Environment::with_prefix("MERIDIAN")
        .prefix_separator("_")
        .separator("__")
        .list_separator(",")
        .with_list_parse_key("admin_user_ids")
        .try_parsing(true),
    )
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  let database_path = expand_tilde(&server_cfg.database_path);
  let store = SqliteStore::open(&database_path)
    .await
    .with_context(|| format!("failed to open database at {database_path:?}"))?;

  let object_root = expand_tilde(&server_cfg.object_root);
  let objects = DiskObjectStore::new(&object_root);

  let identity = HeaderIdentity::from_config(&server_cfg.identity)
    .context("invalid identity header name")?;

  if server_cfg.admin_user_ids.is_empty() {
    tracing::warn!("no admin_user_ids configured; /api/admin is unreachable");
  }

  let state = AppState {
    gateway:  Arc::new(store),
    objects:  Arc::new(objects),
    identity: Arc::new(identity),
    config:   Arc::new(server_cfg.api_config()),
  };

  let app = meridian_api::router(state);
  let address = server_cfg.address();

  tracing::info!(db = ?database_path, objects = ?object_root, "Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
