//! Store → search index synchronization.
//!
//! Configures the two indexes and pushes the current products and users from
//! the relational store. Run after `setup`/`seed`, or whenever the catalog
//! changes.

use serde_json::{Value, json};
use shopscope_core::error::Error;
use shopscope_store::Store;
use tracing::info;

use crate::client::SearchClient;

/// Counts of documents pushed per index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncReport {
    pub products: usize,
    pub users: usize,
}

pub fn products_settings() -> Value {
    json!({
        "filterableAttributes": ["category", "price", "brand"],
        "sortableAttributes": ["price"],
        "searchableAttributes": ["name", "category", "brand"],
        "displayedAttributes": ["product_id", "name", "category", "brand", "price"],
    })
}

pub fn users_settings() -> Value {
    json!({
        "filterableAttributes": ["location", "registration_date", "email"],
        "sortableAttributes": ["registration_date"],
        "searchableAttributes": ["name", "location", "email"],
        "displayedAttributes": ["user_id", "name", "email", "location", "registration_date"],
    })
}

/// Configure both indexes and push every product and user document.
pub async fn sync_all(client: &SearchClient, store: &Store) -> Result<SyncReport, Error> {
    let task = client.update_settings("products", &products_settings()).await?;
    client.wait_for_task(task).await?;

    let products = store.fetch_products().await?;
    let documents: Vec<Value> = products.iter().map(|p| p.document()).collect();
    if !documents.is_empty() {
        let task = client
            .add_documents("products", &documents, "product_id")
            .await?;
        client.wait_for_task(task).await?;
    }
    info!(count = documents.len(), "Synced products index");

    let task = client.update_settings("users", &users_settings()).await?;
    client.wait_for_task(task).await?;

    let users = store.fetch_users().await?;
    let user_documents: Vec<Value> = users.iter().map(|u| u.document()).collect();
    if !user_documents.is_empty() {
        let task = client
            .add_documents("users", &user_documents, "user_id")
            .await?;
        client.wait_for_task(task).await?;
    }
    info!(count = user_documents.len(), "Synced users index");

    Ok(SyncReport {
        products: documents.len(),
        users: user_documents.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn products_settings_declare_filterable_attributes() {
        let settings = products_settings();
        let filterable = settings["filterableAttributes"].as_array().unwrap();
        assert!(filterable.contains(&json!("category")));
        assert!(filterable.contains(&json!("price")));
        assert!(filterable.contains(&json!("brand")));
    }

    #[test]
    fn users_settings_declare_email_filterable() {
        let settings = users_settings();
        let filterable = settings["filterableAttributes"].as_array().unwrap();
        assert!(filterable.contains(&json!("email")));
        assert!(filterable.contains(&json!("location")));
    }
}
