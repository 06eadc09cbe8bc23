//! Budget-vs-actual extraction from the monthly department summary.
//!
//! The summary is a ledger export rather than a designed layout, so lines
//! are found by label search and the undergraduate block is walked by row
//! shape:
//!
//! - charge rows: `B = "F A UNDERGRAD"`, C = section code, D = category name
//! - total rows: A, B, D and E blank, C = section code, F..I = figures
//! - the undergraduate fund total: `A = 4118` with a UGRAD label in B
//! - the graduate fund starts at `A = 4119`

use crate::core::normalizer::money_or_zero;
use crate::error::BudgetResult;
use crate::excel::{Sheet, Workbook};
use crate::types::Money;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info};

pub const TRACKING_SHEET: &str = "Monthly Department Summary";

const UNDERGRAD_FUND: &str = "4118";
const GRAD_FUND: &str = "4119";
const UNDERGRAD_CHARGE: &str = "F A UNDERGRAD";

// Column indexes, A = 0
const COL_FUND: u32 = 0;
const COL_LABEL: u32 = 1;
const COL_CODE: u32 = 2;
const COL_NAME: u32 = 3;
const COL_CHARGE: u32 = 4;
const COL_BUDGET: u32 = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackingLine {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub budget: Money,
    pub actuals: Money,
    pub committed: Money,
    pub available: Money,
    /// `actuals / budget * 100`, absent when nothing was budgeted
    pub pct_spent: Option<Decimal>,
}

impl TrackingLine {
    fn read(sheet: &Sheet, row: u32, name: impl Into<String>, code: Option<String>) -> Self {
        let figure = |offset: u32| money_or_zero(&sheet.cell(row, COL_BUDGET + offset));
        let (budget, actuals) = (figure(0), figure(1));
        Self {
            name: name.into(),
            code,
            budget,
            actuals,
            committed: figure(2),
            available: figure(3),
            pct_spent: pct_spent(actuals, budget),
        }
    }

    pub fn is_over_budget(&self) -> bool {
        self.budget > Decimal::ZERO && self.actuals > self.budget
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackingSummary {
    pub period: String,
    pub file_name: String,
    pub academic_salaries: Option<TrackingLine>,
    pub non_academic_salaries: Option<TrackingLine>,
    pub current_expense_total: Option<TrackingLine>,
    pub total_expenditures: Option<TrackingLine>,
    pub undergraduate: Vec<TrackingLine>,
    pub undergraduate_total: Option<TrackingLine>,
}

impl TrackingSummary {
    /// Every line present, summary lines first
    pub fn lines(&self) -> impl Iterator<Item = &TrackingLine> {
        [
            &self.academic_salaries,
            &self.non_academic_salaries,
            &self.current_expense_total,
            &self.total_expenditures,
        ]
        .into_iter()
        .flatten()
        .chain(self.undergraduate.iter())
        .chain(self.undergraduate_total.iter())
    }

    pub fn over_budget(&self) -> impl Iterator<Item = &TrackingLine> {
        self.undergraduate.iter().filter(|l| l.is_over_budget())
    }
}

/// `actuals / budget * 100` at two places. `None` for a zero budget or a
/// ratio too large for a `Decimal`.
pub fn pct_spent(actuals: Money, budget: Money) -> Option<Decimal> {
    if budget.is_zero() {
        return None;
    }
    let mut pct = actuals
        .checked_div(budget)?
        .checked_mul(Decimal::ONE_HUNDRED)?
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    pct.rescale(2);
    Some(pct)
}

/// Open a tracking workbook and extract its summary
pub fn extract_tracking_file(workbook: &Workbook) -> BudgetResult<TrackingSummary> {
    let sheet = workbook.sheet(TRACKING_SHEET)?;
    let file_name = workbook
        .source()
        .and_then(Path::file_name)
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(extract_tracking(sheet, &file_name))
}

pub fn extract_tracking(sheet: &Sheet, file_name: &str) -> TrackingSummary {
    let period = [1, 0]
        .into_iter()
        .map(|r| sheet.text(r, 0))
        .find(|t| !t.is_empty())
        .unwrap_or_default();

    let line = |column: u32, pattern: &str, name: &str| {
        find_row(sheet, column, pattern, 0).map(|r| TrackingLine::read(sheet, r, name, None))
    };

    let (undergraduate, undergraduate_total) = match undergraduate_block(sheet) {
        Some((start, end)) => (
            undergraduate_categories(sheet, start, end),
            (sheet.text(end, COL_FUND) == UNDERGRAD_FUND)
                .then(|| TrackingLine::read(sheet, end, "Undergraduate Total", None)),
        ),
        None => (Vec::new(), None),
    };

    let summary = TrackingSummary {
        period,
        file_name: file_name.to_string(),
        academic_salaries: line(COL_CHARGE, "Academic Salaries", "Academic Salaries"),
        non_academic_salaries: line(COL_CHARGE, "Non-Academic Salaries", "Non-Academic Salaries"),
        current_expense_total: line(COL_FUND, "Subtotal - Current Expense", "Current Expense Total"),
        total_expenditures: line(COL_FUND, "TOTAL EXPENDITURES", "Total Expenditures"),
        undergraduate,
        undergraduate_total,
    };
    info!(
        file = file_name,
        period = %summary.period,
        categories = summary.undergraduate.len(),
        "extracted tracking summary"
    );
    summary
}

/// First row at or after `start` whose `column` contains `pattern`, ignoring case
fn find_row(sheet: &Sheet, column: u32, pattern: &str, start: u32) -> Option<u32> {
    let pattern = pattern.to_lowercase();
    let last = sheet.last_row()?;
    (start..=last).find(|&r| sheet.text(r, column).to_lowercase().contains(&pattern))
}

/// `(first row, end row)` of the undergraduate fund. The end row is either
/// the fund total or the first graduate row, and is excluded from the scan.
fn undergraduate_block(sheet: &Sheet) -> Option<(u32, u32)> {
    let header = find_row(sheet, COL_FUND, "CURRENT EXPENSE", 0)?;
    let last = sheet.last_row()?;
    let mut start = None;

    for row in header..=last {
        let fund = sheet.text(row, COL_FUND);
        if fund == UNDERGRAD_FUND && start.is_none() {
            start = Some(row);
        }
        if fund == UNDERGRAD_FUND && is_fund_total(sheet, row) {
            debug!(row = row + 1, "undergraduate fund total");
            return start.map(|s| (s, row));
        }
        if fund == GRAD_FUND {
            return start.map(|s| (s, row));
        }
    }
    None
}

fn is_fund_total(sheet: &Sheet, row: u32) -> bool {
    let label = sheet.text(row, COL_LABEL).to_uppercase();
    sheet.text(row, COL_CODE).is_empty()
        && !sheet.text(row, COL_BUDGET).is_empty()
        && (label.contains("UGRAD") || label.contains("UNDERGRAD"))
}

fn undergraduate_categories(sheet: &Sheet, start: u32, end: u32) -> Vec<TrackingLine> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for row in start..end {
        let fund = sheet.text(row, COL_FUND);
        let label = sheet.text(row, COL_LABEL);
        let code = sheet.text(row, COL_CODE);
        let name = sheet.text(row, COL_NAME);
        let charge = sheet.text(row, COL_CHARGE);

        if label == UNDERGRAD_CHARGE && !code.is_empty() && !name.is_empty() {
            current = name;
            continue;
        }

        let is_total = fund.is_empty()
            && label.is_empty()
            && !code.is_empty()
            && code != "0"
            && code != "0.0"
            && name.is_empty()
            && charge.is_empty();
        if is_total {
            let code = code.strip_suffix(".0").unwrap_or(code.as_str()).to_string();
            lines.push(TrackingLine::read(
                sheet,
                row,
                std::mem::take(&mut current),
                Some(code),
            ));
        }
    }
    lines
}
