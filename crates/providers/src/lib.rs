//! Model tool-call client implementations for ShopScope.
//!
//! The orchestration loop talks to the model through the core `Provider`
//! trait; this crate supplies the OpenAI-compatible implementation used in
//! production.

pub mod openai_compat;

pub use openai_compat::OpenAiCompatProvider;
