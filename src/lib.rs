//! Budget Dash - fiscal-year budget extraction for static dashboards
//!
//! Reads a department's master budget workbook, resolves each logical field
//! through a declarative layout table, normalizes hand-edited cells and
//! assembles a reconciled category tree ready for rendering.
//!
//! # Pipeline
//!
//! - [`excel::CellLocator`] resolves layout fields to cells
//! - [`core::normalize`] types raw cells under the default-on-missing policy
//! - [`core::Aggregator`] builds the tree and flags total mismatches
//! - [`core::extract_courses`] groups the course listing
//! - [`writer::emit`] produces the ordered document for the renderer
//!
//! # Example
//!
//! ```no_run
//! use budget_dash::core::extract_report;
//! use budget_dash::layout::Layout;
//! use budget_dash::writer::{emit, render, OutputFormat};
//! use std::path::Path;
//!
//! let layout = Layout::default();
//! let report = extract_report(Path::new("FY26 Master Budget.xlsx"), &layout, "FY26")?;
//!
//! for notice in &report.notices {
//!     println!("{notice}");
//! }
//! println!("{}", render(&emit(&report), OutputFormat::Json)?);
//! # Ok::<(), budget_dash::error::BudgetError>(())
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod excel;
pub mod layout;
pub mod types;
pub mod writer;

// Re-export commonly used types
pub use error::{BudgetError, BudgetResult};
pub use types::{BudgetCategory, BudgetNode, BudgetReport, Money, Notice};
