//! Meilisearch collaborator for ShopScope.
//!
//! [`client`] wraps the REST API the agent's search capability consumes;
//! [`sync`] keeps the `products` and `users` indexes in step with the
//! relational store.

pub mod client;
pub mod sync;

pub use client::{KNOWN_INDEXES, SearchClient, SearchOptions, SearchResults};
pub use sync::{SyncReport, sync_all};
