//! `shopscope seed` — populate the database with sample data.

use shopscope_config::AppConfig;
use shopscope_store::Store;

pub async fn run(config: AppConfig) -> anyhow::Result<()> {
    if config.database.url.is_empty() {
        anyhow::bail!("database.url is not set (set DATABASE_URL)");
    }

    let store = Store::connect(&config.database.url, config.database.max_connections).await?;
    let (users, products, transactions) = store.seed().await?;

    println!("Seeded {users} users, {products} products, {transactions} transactions.");
    Ok(())
}
