//! `tower` binary: runs the idle climb in the terminal.
//!
//! Configuration comes from the environment (see [`ClientConfig::from_env`]
//! and `RuntimeConfig::from_env`); a `.env` file is honored.
//!
//! ```bash
//! TOWER_AUTO_SPEED=5 TOWER_RUN_SECS=60 cargo run -p tower-client
//! ```

use anyhow::Result;
use tower_client::{Client, ClientConfig, bootstrap, logging};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = ClientConfig::from_env();
    logging::setup_logging()?;

    tracing::info!("Starting tower client");
    tracing::info!(data_dir = %config.data_dir.display(), "content");
    match &config.save_path {
        Some(path) => tracing::info!(path = %path.display(), "persistence enabled"),
        None => tracing::info!("persistence disabled"),
    }

    let runtime = bootstrap::build_runtime(&config).await?;
    Client::new(runtime, &config).run().await
}
