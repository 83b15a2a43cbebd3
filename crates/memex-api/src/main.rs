//! MemeX API Server entry point
//!
//! Run with:
//! ```bash
//! cargo run -p memex-api
//! ```
//!
//! Configuration is loaded from environment variables and an optional `.env` file.

use memex_common::{try_init_tracing, try_init_tracing_with_config, AppConfig, TracingConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!(error = %e, "Server failed to start");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            if let Err(te) = try_init_tracing() {
                eprintln!("Warning: Failed to initialize tracing: {te}");
            }
            error!(error = %e, "Failed to load configuration");
            return Err(e.into());
        }
    };

    if let Err(e) = try_init_tracing_with_config(TracingConfig::for_environment(config.app.env)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    info!(
        env = ?config.app.env,
        port = config.api.port,
        database = config.database.is_some(),
        "Starting MemeX API Server"
    );

    memex_api::run(config).await?;

    Ok(())
}
