//! TradeOps Core - Position Accounting Service

use tradeops_core::api;
use tradeops_core::config::Config;
use tradeops_core::observability;
use tradeops_core::observability::health::HealthState;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    observability::init_observability("tradeops-core")?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting TradeOps Core..."
    );

    let health_state = HealthState::new();

    api::serve(config.http_port, health_state).await?;

    info!("TradeOps Core stopped");
    Ok(())
}
