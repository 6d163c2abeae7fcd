//! # sheetviz-core
//!
//! Core types shared by the sheetviz crates.
//!
//! This crate provides:
//! - Error types
//! - Workbook sources and the [`WorkbookLoader`] contract
//! - Per-worksheet axis selections

/// Error types and result aliases.
pub mod error;
/// Axis selections and chart kinds.
pub mod selection;
/// Workbook sources and loaders.
pub mod source;

/// Re-export core error types.
pub use error::{LoadError, ParseChartKindError, VizError, VizResult};
/// Re-export selection types.
pub use selection::{
    parse_z, z_options, AxisSelection, ChartKind, SelectionState, SelectionUpdate, Z_NONE,
};
/// Re-export source types.
pub use source::{FileLoader, WorkbookLoader, WorkbookSource, MAX_SHEETS};
