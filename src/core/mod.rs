//! Extraction pipeline: locate, normalize, aggregate.

pub mod aggregator;
pub mod courses;
pub mod normalizer;
pub mod tracking;

pub use aggregator::{Aggregator, NormalizedFields, TOTAL_BUDGET};
pub use courses::{extract_courses, CourseExtractor, UNCATEGORIZED};
pub use normalizer::{normalize, parse_money, Normalized};
pub use tracking::{extract_tracking, extract_tracking_file, TrackingLine, TrackingSummary};

use crate::error::BudgetResult;
use crate::excel::{CellLocator, Workbook};
use crate::layout::Layout;
use crate::types::{BudgetReport, Notice};
use std::path::Path;
use tracing::{info, warn};

/// Read and normalize every field of the layout, in table order.
/// Fails on the first fatal error.
pub fn extract_fields(locator: &CellLocator<'_>, layout: &Layout) -> BudgetResult<NormalizedFields> {
    let mut fields = NormalizedFields::new();
    for spec in &layout.fields {
        let raw = locator.read(&spec.key)?;
        let Normalized { value, notice } = normalize(&raw, spec)?;
        if let Some(Notice::DefaultedField { reason, .. }) = &notice {
            warn!(field = %spec.key, address = %spec.address, %reason, "field defaulted");
        }
        fields.insert(spec.key.clone(), value, notice);
    }
    Ok(fields)
}

/// Build one fiscal year's report from an opened workbook
pub fn generate_report(workbook: &Workbook, layout: &Layout, fiscal_year: &str) -> BudgetResult<BudgetReport> {
    let locator = CellLocator::new(workbook, layout, fiscal_year);
    let fields = extract_fields(&locator, layout)?;

    let course_groups = match &layout.courses {
        Some(course_layout) => {
            let sheet = workbook.sheet(&course_layout.sheet)?;
            extract_courses(sheet, course_layout)
        }
        None => Vec::new(),
    };

    Aggregator::new(layout).aggregate(fiscal_year, fields, course_groups)
}

/// Open `path`, build the report, and release the workbook
pub fn extract_report(path: &Path, layout: &Layout, fiscal_year: &str) -> BudgetResult<BudgetReport> {
    info!(path = %path.display(), fiscal_year, "extracting budget report");
    let workbook = Workbook::open(path)?;
    generate_report(&workbook, layout, fiscal_year)
}
