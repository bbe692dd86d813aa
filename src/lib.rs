//! `energy-charts` library crate.
//!
//! The binary (`energy`) is a thin wrapper around this library so that:
//!
//! - the aggregation and combining logic is testable without spawning processes
//! - renderers can be swapped behind one trait
//! - dashboards can be built from other front-ends

pub mod app;
pub mod calc;
pub mod cli;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod render;
pub mod report;
