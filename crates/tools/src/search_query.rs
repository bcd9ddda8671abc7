//! Free-text / faceted search capability.

use async_trait::async_trait;
use serde_json::{Value, json};
use shopscope_core::error::{SearchError, ToolError};
use shopscope_core::tool::{Tool, names};
use shopscope_search::{SearchClient, SearchOptions};
use std::sync::Arc;
use tracing::warn;

pub struct MeilisearchQueryTool {
    client: Arc<SearchClient>,
}

impl MeilisearchQueryTool {
    pub fn new(client: Arc<SearchClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for MeilisearchQueryTool {
    fn name(&self) -> &str {
        names::SEARCH
    }

    fn description(&self) -> &str {
        "Searches for products or users in Meilisearch. Use this for free-text search, \
         fuzzy matching, or combined with filters on indexed attributes like category, \
         brand, price for products, or location, registration_date, email for users. \
         Index names are 'products' and 'users'."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "index_name": {
                    "type": "string",
                    "description": "The name of the Meilisearch index to query. Must be 'products' or 'users'.",
                    "enum": ["products", "users"]
                },
                "query": {
                    "type": "string",
                    "description": "The free-text search query string. Optional.",
                    "default": ""
                },
                "filters": {
                    "type": "string",
                    "description": "A Meilisearch filter string for structured filtering (e.g., 'category = \"Electronics\" AND price < 500'). Attributes: products (category, brand, price), users (location, registration_date, email). Use `CONTAINS` or `STARTS WITH` for partial string matches (e.g., 'email CONTAINS \".com\"').",
                    "default": ""
                },
                "limit": {
                    "type": "integer",
                    "description": "Maximum number of results to return.",
                    "default": 10
                },
                "offset": {
                    "type": "integer",
                    "description": "Number of results to skip.",
                    "default": 0
                }
            },
            "required": ["index_name"]
        })
    }

    async fn execute(&self, arguments: Value) -> Result<Value, ToolError> {
        let index = arguments["index_name"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'index_name' argument".into()))?;

        let query = arguments["query"].as_str().filter(|q| !q.is_empty());
        let options = SearchOptions {
            filters: arguments["filters"]
                .as_str()
                .filter(|f| !f.is_empty())
                .map(String::from),
            limit: arguments["limit"].as_u64().unwrap_or(10) as u32,
            offset: arguments["offset"].as_u64().unwrap_or(0) as u32,
        };

        let payload = match self.client.search(index, query, &options).await {
            Ok(results) => json!({
                "hits": results.hits,
                "estimatedTotalHits": results.estimated_total_hits,
            }),
            Err(SearchError::UnknownIndex(name)) => {
                let message =
                    format!("Invalid index_name. Must be 'products' or 'users'. Got: {name}");
                warn!(%message);
                json!({ "success": false, "error": message })
            }
            Err(SearchError::Api {
                code,
                message,
                error_type,
                link,
            }) => {
                warn!(%code, %message, "Meilisearch API error during query");
                json!({
                    "success": false,
                    "error": "Meilisearch API error",
                    "code": code,
                    "message": message,
                    "type": error_type,
                    "link": link,
                })
            }
            Err(e) => {
                warn!(error = %e, "Search request failed");
                json!({
                    "success": false,
                    "error": "Meilisearch request failed",
                    "code": "service_unreachable",
                    "message": e.to_string(),
                })
            }
        };

        Ok(payload)
    }
}
