//! The three capability adapters for ShopScope.
//!
//! Each adapter implements the core `Tool` trait over one collaborator:
//! faceted search (Meilisearch), analytical SQL (PostgreSQL), and chart
//! rendering. Collaborator handles are owned explicitly and passed in at
//! construction — there is no module-level client state.

pub mod chart;
pub mod search_query;
pub mod sql_query;

use shopscope_charts::ChartRenderer;
use shopscope_core::tool::ToolRegistry;
use shopscope_search::SearchClient;
use shopscope_store::Store;
use std::sync::Arc;

pub use chart::GenerateChartTool;
pub use search_query::MeilisearchQueryTool;
pub use sql_query::ExecuteSqlQueryTool;

/// Build the capability registry from the process's collaborator handles.
pub fn registry(
    search: Arc<SearchClient>,
    store: Arc<Store>,
    renderer: ChartRenderer,
) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(MeilisearchQueryTool::new(search)));
    registry.register(Box::new(ExecuteSqlQueryTool::new(store)));
    registry.register(Box::new(GenerateChartTool::new(renderer)));
    registry
}
