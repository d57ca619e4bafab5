//! Output generation modules for CSV, Markdown and JSON.
//!
//! # Submodules
//!
//! - [`csv`]: BOM-prefixed CSV export of the effective view
//! - [`markdown`]: Human-readable report with counts and a proportion chart
//! - [`json`]: Optional machine-readable snapshot of a run
//!
//! # Output Structure
//!
//! ```text
//! export_dir/
//! └── dharavi_news_2d_20250506_0907.csv
//!
//! json_output_dir/
//! └── 2025-05-06/
//!     └── 2d_0907.json
//! ```

pub mod csv;
pub mod json;
pub mod markdown;
