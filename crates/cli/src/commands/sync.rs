//! `shopscope sync` — push products and users into the search indexes.

use shopscope_config::AppConfig;
use shopscope_search::SearchClient;
use shopscope_store::Store;

pub async fn run(config: AppConfig) -> anyhow::Result<()> {
    if config.database.url.is_empty() {
        anyhow::bail!("database.url is not set (set DATABASE_URL)");
    }

    let store = Store::connect(&config.database.url, config.database.max_connections).await?;
    let client = SearchClient::new(&config.search.host, &config.search.master_key);

    let report = shopscope_search::sync_all(&client, &store).await?;

    println!(
        "Search indexes synced: {} products, {} users.",
        report.products, report.users
    );
    Ok(())
}
