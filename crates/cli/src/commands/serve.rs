//! `shopscope serve` — start the HTTP gateway.

use shopscope_config::AppConfig;

pub async fn run(config: AppConfig, port: Option<u16>) -> anyhow::Result<()> {
    let agent = super::build_agent(&config).await?;

    let host = config.gateway.host.clone();
    let port = port.unwrap_or(config.gateway.port);

    shopscope_gateway::serve(&host, port, agent)
        .await
        .map_err(|e| anyhow::anyhow!("Gateway failed: {e}"))
}
