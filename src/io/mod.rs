//! Input/output helpers.
//!
//! - source retrieval (`fetch`)
//! - CSV/JSON exports of aggregates and chart data (`export`)

pub mod export;
pub mod fetch;

pub use export::*;
pub use fetch::*;
