mod config;
mod proxy;
mod server;
mod spa;

use crate::config::{init_logger, load_environment, ProxyConfig};
use log::info;

#[rocket::main]
async fn main() -> anyhow::Result<()> {
    load_environment();
    init_logger();
    info!("Starting ISL development proxy...");

    let rocket = server::build_rocket(ProxyConfig::from_env())?;
    rocket
        .launch()
        .await
        .map_err(|e| anyhow::anyhow!("Proxy server failed: {e}"))?;
    Ok(())
}
