//! CLI subcommands and shared wiring.

pub mod ask;
pub mod doctor;
pub mod seed;
pub mod serve;
pub mod setup;
pub mod sync;

use shopscope_agent::AgentLoop;
use shopscope_charts::ChartRenderer;
use shopscope_config::AppConfig;
use shopscope_providers::OpenAiCompatProvider;
use shopscope_search::SearchClient;
use shopscope_store::Store;
use std::sync::Arc;

/// Build the full agent from collaborator handles. Everything is
/// constructed here, once, at startup — the capability registry owns its
/// handles explicitly.
pub(crate) async fn build_agent(config: &AppConfig) -> anyhow::Result<Arc<AgentLoop>> {
    config.validate()?;

    let store = Arc::new(Store::connect(&config.database.url, config.database.max_connections).await?);
    let search = Arc::new(SearchClient::new(
        &config.search.host,
        &config.search.master_key,
    ));
    let renderer = ChartRenderer::new(&config.charts.output_dir);
    let registry = Arc::new(shopscope_tools::registry(search, store, renderer));

    let provider = Arc::new(OpenAiCompatProvider::new(
        "openai",
        &config.openai.base_url,
        &config.openai.api_key,
    ));

    Ok(Arc::new(
        AgentLoop::new(
            provider,
            &config.openai.model,
            config.openai.temperature,
            registry,
        )
        .with_max_steps(config.agent.max_steps),
    ))
}
