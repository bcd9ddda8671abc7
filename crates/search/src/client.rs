//! Meilisearch REST client.
//!
//! Speaks the documented HTTP API directly: search, index settings,
//! document upload, task polling, and the version probe. API failures are
//! surfaced with their machine-readable `code` so the orchestration loop
//! (and the model behind it) can tell a bad filter expression from an
//! unreachable service.

use serde::Deserialize;
use serde_json::Value;
use shopscope_core::error::SearchError;
use std::time::Duration;
use tracing::{debug, warn};

/// The two collections the agent may search.
pub const KNOWN_INDEXES: &[&str] = &["products", "users"];

/// Handle to the search service. Cheap to clone; constructed once at
/// startup and passed into the capability registry.
#[derive(Clone)]
pub struct SearchClient {
    host: String,
    master_key: String,
    client: reqwest::Client,
}

/// Search parameters beyond the free-text query string.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub filters: Option<String>,
    pub limit: u32,
    pub offset: u32,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            filters: None,
            limit: 10,
            offset: 0,
        }
    }
}

/// A successful search response.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResults {
    #[serde(default)]
    pub hits: Vec<Value>,
    #[serde(rename = "estimatedTotalHits", default)]
    pub estimated_total_hits: u64,
}

/// The body Meilisearch returns on API errors.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    code: String,
    #[serde(default, rename = "type")]
    error_type: String,
    #[serde(default)]
    link: String,
}

#[derive(Debug, Deserialize)]
struct TaskRef {
    #[serde(rename = "taskUid")]
    task_uid: u64,
}

#[derive(Debug, Deserialize)]
struct TaskStatus {
    status: String,
    #[serde(default)]
    error: Option<ApiErrorBody>,
}

impl SearchClient {
    pub fn new(host: impl Into<String>, master_key: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            host: host.into().trim_end_matches('/').to_string(),
            master_key: master_key.into(),
            client,
        }
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let mut builder = self.client.request(method, format!("{}{path}", self.host));
        if !self.master_key.is_empty() {
            builder = builder.header("Authorization", format!("Bearer {}", self.master_key));
        }
        builder
    }

    /// Turn a non-success response into the structured API error.
    async fn api_error(response: reqwest::Response) -> SearchError {
        let status = response.status().as_u16();
        match response.json::<ApiErrorBody>().await {
            Ok(body) => SearchError::Api {
                code: body.code,
                message: body.message,
                error_type: body.error_type,
                link: body.link,
            },
            Err(e) => SearchError::Network(format!(
                "Unparseable error response (status {status}): {e}"
            )),
        }
    }

    /// Free-text / filtered search against one of the known indexes.
    pub async fn search(
        &self,
        index: &str,
        query: Option<&str>,
        options: &SearchOptions,
    ) -> Result<SearchResults, SearchError> {
        if !KNOWN_INDEXES.contains(&index) {
            return Err(SearchError::UnknownIndex(index.to_string()));
        }

        let mut body = serde_json::json!({
            "q": query.unwrap_or(""),
            "limit": options.limit,
            "offset": options.offset,
        });
        if let Some(filters) = options.filters.as_deref()
            && !filters.is_empty()
        {
            body["filter"] = Value::String(filters.to_string());
        }

        debug!(index, ?options, "Performing search query");

        let response = self
            .request(reqwest::Method::POST, &format!("/indexes/{index}/search"))
            .json(&body)
            .send()
            .await
            .map_err(|e| SearchError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }

        response
            .json::<SearchResults>()
            .await
            .map_err(|e| SearchError::Network(format!("Failed to parse search response: {e}")))
    }

    /// Update an index's settings. Returns the task uid to wait on.
    pub async fn update_settings(
        &self,
        index: &str,
        settings: &Value,
    ) -> Result<u64, SearchError> {
        let response = self
            .request(
                reqwest::Method::PATCH,
                &format!("/indexes/{index}/settings"),
            )
            .json(settings)
            .send()
            .await
            .map_err(|e| SearchError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }

        let task: TaskRef = response
            .json()
            .await
            .map_err(|e| SearchError::Network(format!("Failed to parse task ref: {e}")))?;
        Ok(task.task_uid)
    }

    /// Add or replace documents. Returns the task uid to wait on.
    pub async fn add_documents(
        &self,
        index: &str,
        documents: &[Value],
        primary_key: &str,
    ) -> Result<u64, SearchError> {
        let response = self
            .request(
                reqwest::Method::POST,
                &format!("/indexes/{index}/documents?primaryKey={primary_key}"),
            )
            .json(&documents)
            .send()
            .await
            .map_err(|e| SearchError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }

        let task: TaskRef = response
            .json()
            .await
            .map_err(|e| SearchError::Network(format!("Failed to parse task ref: {e}")))?;
        Ok(task.task_uid)
    }

    /// Poll a task until it settles. Index mutations are asynchronous on
    /// the Meilisearch side; settings and document pushes are not visible
    /// until their task succeeds.
    pub async fn wait_for_task(&self, uid: u64) -> Result<(), SearchError> {
        const MAX_POLLS: u32 = 120;

        for _ in 0..MAX_POLLS {
            let response = self
                .request(reqwest::Method::GET, &format!("/tasks/{uid}"))
                .send()
                .await
                .map_err(|e| SearchError::Network(e.to_string()))?;

            if !response.status().is_success() {
                return Err(Self::api_error(response).await);
            }

            let task: TaskStatus = response
                .json()
                .await
                .map_err(|e| SearchError::Network(format!("Failed to parse task status: {e}")))?;

            match task.status.as_str() {
                "succeeded" => return Ok(()),
                "failed" | "canceled" => {
                    let message = task
                        .error
                        .map(|e| e.message)
                        .unwrap_or_else(|| "unknown task failure".into());
                    warn!(uid, %message, "Index task failed");
                    return Err(SearchError::TaskFailed { uid, message });
                }
                _ => tokio::time::sleep(Duration::from_millis(500)).await,
            }
        }

        Err(SearchError::TaskFailed {
            uid,
            message: "timed out waiting for task".into(),
        })
    }

    /// Version probe, used as the connectivity check.
    pub async fn version(&self) -> Result<String, SearchError> {
        let response = self
            .request(reqwest::Method::GET, "/version")
            .send()
            .await
            .map_err(|e| SearchError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| SearchError::Network(e.to_string()))?;
        Ok(body["pkgVersion"].as_str().unwrap_or("unknown").to_string())
    }
}
