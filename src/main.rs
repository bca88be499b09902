//! HTTP server for the Payroll Computation Engine.
//!
//! Environment:
//! - `PAYROLL_CONFIG_DIR`: configuration directory (default `./config/standard`)
//! - `PAYROLL_BIND_ADDR`: listen address (default `0.0.0.0:3000`)
//! - `RUST_LOG`: tracing filter (default `info`)

use std::env;

use payroll_engine::api::{AppState, create_router};
use payroll_engine::config::ConfigLoader;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_CONFIG_DIR: &str = "./config/standard";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().with_line_number(true))
        .init();

    let config_dir = env::var("PAYROLL_CONFIG_DIR").unwrap_or_else(|_| DEFAULT_CONFIG_DIR.into());
    let bind_addr = env::var("PAYROLL_BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.into());

    let config = ConfigLoader::load(&config_dir)?;
    info!(
        config_dir = %config_dir,
        policy = %config.policy().name,
        tax_tables = config.config().tax_tables().len(),
        "Configuration loaded"
    );

    let router = create_router(AppState::in_memory(config));
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!(bind_addr = %bind_addr, "Payroll engine listening");

    axum::serve(listener, router).await?;
    Ok(())
}
