//! Analytical SQL capability.
//!
//! Model-authored SQL runs through the read-only guard before any
//! connection is used; rejected statements never reach the store.

use async_trait::async_trait;
use serde_json::{Value, json};
use shopscope_core::error::ToolError;
use shopscope_core::tool::{Tool, names};
use shopscope_store::{Store, guard};
use std::sync::Arc;
use tracing::warn;

pub struct ExecuteSqlQueryTool {
    store: Arc<Store>,
}

impl ExecuteSqlQueryTool {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for ExecuteSqlQueryTool {
    fn name(&self) -> &str {
        names::SQL
    }

    fn description(&self) -> &str {
        "Executes a SQL query against the PostgreSQL database. Use this for analytical \
         queries, aggregations, joins, or when precise numerical or date-based \
         filtering/grouping is needed across multiple tables (products, users, transactions)."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "sql_query": {
                    "type": "string",
                    "description": "The full SQL query to execute, including SELECT, FROM, WHERE, GROUP BY, ORDER BY, etc."
                }
            },
            "required": ["sql_query"]
        })
    }

    async fn execute(&self, arguments: Value) -> Result<Value, ToolError> {
        let sql = arguments["sql_query"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'sql_query' argument".into()))?;

        if let Err(message) = guard::validate(sql) {
            warn!(%message, "Rejected analytical query");
            return Ok(json!({
                "success": false,
                "message": message,
                "data": null,
            }));
        }

        match self.store.fetch_rows(sql).await {
            Ok(rows) => Ok(json!({
                "success": true,
                "message": "SQL query executed successfully.",
                "data": rows,
            })),
            Err(e) => {
                warn!(error = %e, "Analytical query failed");
                Ok(json!({
                    "success": false,
                    "message": format!("Error executing SQL query: {e}"),
                    "data": null,
                }))
            }
        }
    }
}
