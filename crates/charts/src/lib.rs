//! Chart rendering for ShopScope.
//!
//! Turns the row set of an analytical query into a bar or line PNG under a
//! dedicated output directory and hands back the file path — never the
//! bytes. Rendering is a thin collaborator; the interesting contract is the
//! input validation (missing rows, unsupported kind, missing columns).

pub mod render;

pub use render::{ChartKind, ChartRenderer, ChartSpec};
