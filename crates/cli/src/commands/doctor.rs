//! `shopscope doctor` — connectivity checks against the collaborators.

use shopscope_config::AppConfig;
use shopscope_core::provider::Provider;
use shopscope_providers::OpenAiCompatProvider;
use shopscope_search::SearchClient;
use shopscope_store::Store;

pub async fn run(config: AppConfig) -> anyhow::Result<()> {
    let mut healthy = true;

    print!("PostgreSQL ........ ");
    if config.database.url.is_empty() {
        println!("SKIP (database.url not set)");
        healthy = false;
    } else {
        match Store::connect(&config.database.url, 1).await {
            Ok(store) => match store.ping().await {
                Ok(()) => println!("OK"),
                Err(e) => {
                    println!("FAIL ({e})");
                    healthy = false;
                }
            },
            Err(e) => {
                println!("FAIL ({e})");
                healthy = false;
            }
        }
    }

    print!("Meilisearch ....... ");
    let client = SearchClient::new(&config.search.host, &config.search.master_key);
    match client.version().await {
        Ok(version) => println!("OK (v{version})"),
        Err(e) => {
            println!("FAIL ({e})");
            healthy = false;
        }
    }

    print!("Model endpoint .... ");
    if config.openai.api_key.is_empty() {
        println!("SKIP (openai.api_key not set)");
        healthy = false;
    } else {
        let provider =
            OpenAiCompatProvider::new("openai", &config.openai.base_url, &config.openai.api_key);
        match provider.health_check().await {
            Ok(true) => println!("OK"),
            Ok(false) => {
                println!("FAIL (endpoint returned an error)");
                healthy = false;
            }
            Err(e) => {
                println!("FAIL ({e})");
                healthy = false;
            }
        }
    }

    if !healthy {
        anyhow::bail!("One or more checks failed");
    }
    println!("\nAll checks passed.");
    Ok(())
}
