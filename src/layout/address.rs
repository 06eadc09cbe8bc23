//! Field addresses: where in a workbook a logical budget field lives.
//!
//! Rows and columns are stored zero-based. Constructors and the YAML layout
//! format take spreadsheet notation (1-based rows, column letters) so the
//! table reads the way the workbook does.

use crate::error::{BudgetError, BudgetResult};
use crate::types::ValueKind;
use serde::Deserialize;
use std::fmt;

/// How the value column is chosen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnSelector {
    Fixed(u32),
    /// The column whose cell in `header_row` equals the fiscal-year code
    FiscalYear { header_row: u32 },
}

/// How the value row is chosen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowSelector {
    Fixed(u32),
    /// First row whose `column` cell equals `label` (trimmed, case-insensitive)
    Label { column: u32, label: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldAddress {
    pub sheet: String,
    pub column: ColumnSelector,
    pub row: RowSelector,
}

impl FieldAddress {
    /// Fixed cell, e.g. `cell("CE_Breakdown", "Q", 24)`
    pub fn cell(sheet: &str, column: &str, row: u32) -> Self {
        Self {
            sheet: sheet.to_string(),
            column: ColumnSelector::Fixed(letter_or_zero(column)),
            row: RowSelector::Fixed(row.saturating_sub(1)),
        }
    }

    /// Row `row` of the fiscal-year column found in `header_row`
    pub fn fiscal_year(sheet: &str, header_row: u32, row: u32) -> Self {
        Self {
            sheet: sheet.to_string(),
            column: ColumnSelector::FiscalYear {
                header_row: header_row.saturating_sub(1),
            },
            row: RowSelector::Fixed(row.saturating_sub(1)),
        }
    }

    /// Row labelled `label` in `label_column`, value read from `column`
    pub fn labelled(sheet: &str, column: &str, label_column: &str, label: &str) -> Self {
        Self {
            sheet: sheet.to_string(),
            column: ColumnSelector::Fixed(letter_or_zero(column)),
            row: RowSelector::Label {
                column: letter_or_zero(label_column),
                label: label.to_string(),
            },
        }
    }
}

fn letter_or_zero(column: &str) -> u32 {
    column_letter_to_index(column).unwrap_or(0)
}

impl fmt::Display for FieldAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let column = match &self.column {
            ColumnSelector::Fixed(c) => index_to_column_letter(*c),
            ColumnSelector::FiscalYear { header_row } => format!("[FY@{}]", header_row + 1),
        };
        match &self.row {
            RowSelector::Fixed(r) => write!(f, "{}!{}{}", self.sheet, column, r + 1),
            RowSelector::Label { column: lc, label } => write!(
                f,
                "{}!{}[{}='{}']",
                self.sheet,
                column,
                index_to_column_letter(*lc),
                label
            ),
        }
    }
}

/// One entry of the field-address mapping table
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "FieldEntry")]
pub struct FieldSpec {
    pub key: String,
    pub address: FieldAddress,
    pub kind: ValueKind,
    /// Blank or unreadable values abort the run instead of defaulting
    pub mandatory: bool,
    /// Net/delta fields may legitimately be negative
    pub signed: bool,
}

impl FieldSpec {
    pub fn new(key: &str, kind: ValueKind, address: FieldAddress) -> Self {
        Self {
            key: key.to_string(),
            address,
            kind,
            mandatory: false,
            signed: false,
        }
    }

    pub fn money(key: &str, address: FieldAddress) -> Self {
        Self::new(key, ValueKind::Monetary, address)
    }

    pub fn count(key: &str, address: FieldAddress) -> Self {
        Self::new(key, ValueKind::Count, address)
    }

    pub fn text(key: &str, address: FieldAddress) -> Self {
        Self::new(key, ValueKind::Text, address)
    }

    pub fn mandatory(mut self) -> Self {
        self.mandatory = true;
        self
    }

    pub fn signed(mut self) -> Self {
        self.signed = true;
        self
    }
}

/// YAML form of a field entry
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FieldEntry {
    key: String,
    sheet: String,
    #[serde(default)]
    kind: ValueKind,
    #[serde(default)]
    mandatory: bool,
    #[serde(default)]
    signed: bool,
    column: Option<String>,
    fy_header_row: Option<u32>,
    row: Option<u32>,
    label: Option<String>,
    label_column: Option<String>,
}

impl TryFrom<FieldEntry> for FieldSpec {
    type Error = BudgetError;

    fn try_from(entry: FieldEntry) -> BudgetResult<Self> {
        let key = entry.key;
        let column = match (entry.column.as_deref(), entry.fy_header_row) {
            (Some(letters), None) => ColumnSelector::Fixed(parse_column(&key, letters)?),
            (None, Some(header_row)) => ColumnSelector::FiscalYear {
                header_row: parse_row(&key, header_row)?,
            },
            _ => {
                return Err(BudgetError::Config(format!(
                    "field '{key}': set exactly one of 'column' or 'fy_header_row'"
                )))
            }
        };
        let row = match (entry.row, entry.label, entry.label_column.as_deref()) {
            (Some(row), None, None) => RowSelector::Fixed(parse_row(&key, row)?),
            (None, Some(label), Some(letters)) => RowSelector::Label {
                column: parse_column(&key, letters)?,
                label,
            },
            _ => {
                return Err(BudgetError::Config(format!(
                    "field '{key}': set either 'row' or both 'label' and 'label_column'"
                )))
            }
        };

        Ok(FieldSpec {
            address: FieldAddress {
                sheet: entry.sheet,
                column,
                row,
            },
            key,
            kind: entry.kind,
            mandatory: entry.mandatory,
            signed: entry.signed,
        })
    }
}

fn parse_column(key: &str, letters: &str) -> BudgetResult<u32> {
    column_letter_to_index(letters).ok_or_else(|| {
        BudgetError::Config(format!("field '{key}': invalid column '{letters}'"))
    })
}

fn parse_row(key: &str, row: u32) -> BudgetResult<u32> {
    if row == 0 {
        return Err(BudgetError::Config(format!(
            "field '{key}': rows are numbered from 1"
        )));
    }
    Ok(row - 1)
}

/// Convert column letters to a zero-based index (A→0, Z→25, AA→26)
pub fn column_letter_to_index(letters: &str) -> Option<u32> {
    let letters = letters.trim();
    if letters.is_empty() || letters.len() > 3 {
        return None;
    }
    let mut index: u32 = 0;
    for c in letters.chars() {
        if !c.is_ascii_alphabetic() {
            return None;
        }
        index = index * 26 + (c.to_ascii_uppercase() as u32 - 'A' as u32 + 1);
    }
    Some(index - 1)
}

/// Convert a zero-based column index to letters (0→A, 25→Z, 26→AA)
pub fn index_to_column_letter(n: u32) -> String {
    let mut result = String::new();
    let mut num = n;

    loop {
        let remainder = num % 26;
        result.insert(0, (b'A' + remainder as u8) as char);
        if num < 26 {
            break;
        }
        num = num / 26 - 1;
    }

    result
}
