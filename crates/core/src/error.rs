//! Error types for the ShopScope domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use thiserror::Error;

/// The top-level error type for all ShopScope operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Provider errors ---
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    // --- Tool errors ---
    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    // --- Store errors ---
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    // --- Search errors ---
    #[error("Search error: {0}")]
    Search(#[from] SearchError),

    // --- Chart errors ---
    #[error("Chart error: {0}")]
    Chart(#[from] ChartError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),
}

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Tool not found: {0}")]
    NotFound(String),

    #[error("Tool execution failed: {tool_name} — {reason}")]
    ExecutionFailed { tool_name: String, reason: String },

    #[error("Invalid tool arguments: {0}")]
    InvalidArguments(String),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Could not decode column '{column}': {reason}")]
    Decode { column: String, reason: String },

    #[error("Migration failed: {0}")]
    MigrationFailed(String),
}

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Unknown index: {0} (must be 'products' or 'users')")]
    UnknownIndex(String),

    #[error("Meilisearch API error [{code}]: {message}")]
    Api {
        code: String,
        message: String,
        error_type: String,
        link: String,
    },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Index task {uid} failed: {message}")]
    TaskFailed { uid: u64, message: String },
}

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("No data provided to generate chart.")]
    EmptyData,

    #[error("Unsupported chart type. Choose 'bar' or 'line'.")]
    UnsupportedKind,

    #[error("Required columns '{x}' or '{y}' not found in data.")]
    MissingColumns { x: String, y: String },

    #[error("Column '{column}' contains a non-numeric value: {value}")]
    NonNumeric { column: String, value: String },

    #[error("Rendering failed: {0}")]
    Render(String),
}
