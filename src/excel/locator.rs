//! Resolves layout fields to cells and reads their raw values.

use super::workbook::{Sheet, Workbook};
use crate::error::{BudgetError, BudgetResult};
use crate::layout::{ColumnSelector, FieldSpec, Layout, RowSelector};
use crate::types::RawCellValue;
use tracing::debug;

/// Read-only view over an opened workbook for one fiscal year.
/// Holds no cache, so repeated reads of a field always agree.
pub struct CellLocator<'a> {
    workbook: &'a Workbook,
    layout: &'a Layout,
    fiscal_year: &'a str,
}

impl<'a> CellLocator<'a> {
    pub fn new(workbook: &'a Workbook, layout: &'a Layout, fiscal_year: &'a str) -> Self {
        Self {
            workbook,
            layout,
            fiscal_year,
        }
    }

    /// Read a field from the sheet its address names
    pub fn read(&self, field_key: &str) -> BudgetResult<RawCellValue> {
        let spec = self.layout.field(field_key)?;
        self.locate(&spec.address.sheet, field_key)
    }

    /// Read a field's coordinates from `sheet`
    pub fn locate(&self, sheet: &str, field_key: &str) -> BudgetResult<RawCellValue> {
        let sheet = self.workbook.sheet(sheet)?;
        let spec = self.layout.field(field_key)?;
        let (row, col) = self.resolve(sheet, spec)?;
        let value = sheet.cell(row, col);
        debug!(
            field = field_key,
            sheet = sheet.name(),
            row = row + 1,
            col = col + 1,
            value = ?value,
            "located field"
        );
        Ok(value)
    }

    /// Zero-based (row, column) of a field within `sheet`
    pub fn resolve(&self, sheet: &Sheet, spec: &FieldSpec) -> BudgetResult<(u32, u32)> {
        let col = match &spec.address.column {
            ColumnSelector::Fixed(c) => *c,
            ColumnSelector::FiscalYear { header_row } => {
                self.fiscal_year_column(sheet, spec, *header_row)?
            }
        };
        let row = match &spec.address.row {
            RowSelector::Fixed(r) => *r,
            RowSelector::Label { column, label } => {
                find_labelled_row(sheet, *column, label).ok_or_else(|| {
                    BudgetError::FieldLabelNotFound {
                        field: spec.key.clone(),
                        sheet: sheet.name().to_string(),
                        label: label.clone(),
                    }
                })?
            }
        };
        Ok((row, col))
    }

    fn fiscal_year_column(&self, sheet: &Sheet, spec: &FieldSpec, header_row: u32) -> BudgetResult<u32> {
        let last_col = sheet.last_column().unwrap_or(0);
        (0..=last_col)
            .find(|&c| sheet.text(header_row, c).eq_ignore_ascii_case(self.fiscal_year))
            .ok_or_else(|| BudgetError::ColumnHeaderNotFound {
                field: spec.key.clone(),
                sheet: sheet.name().to_string(),
                header: self.fiscal_year.to_string(),
                row: header_row + 1,
            })
    }
}

/// First row whose `column` text equals `label`, ignoring case and padding
pub fn find_labelled_row(sheet: &Sheet, column: u32, label: &str) -> Option<u32> {
    let label = label.trim();
    let last_row = sheet.last_row()?;
    (0..=last_row).find(|&r| sheet.text(r, column).eq_ignore_ascii_case(label))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{FieldAddress, SchemaNode};
    use calamine::Data;

    fn s(text: &str) -> Data {
        Data::String(text.to_string())
    }

    fn workbook() -> Workbook {
        let summary = Sheet::from_rows(
            "Summary",
            vec![
                vec![s(""), s("Line"), s("FY25"), s("FY26")],
                vec![s(""), s("Salaries"), Data::Float(90.0), Data::Float(100.0)],
                vec![s(""), s("Supplies"), Data::Float(9.0), s("$12.50")],
                vec![s(""), s("Total"), Data::Float(99.0), Data::Empty],
            ],
        );
        Workbook::from_sheets(vec![summary])
    }

    fn layout() -> Layout {
        Layout {
            total_field: "total".to_string(),
            fields: vec![
                FieldSpec::money("salaries", FieldAddress::fiscal_year("Summary", 1, 2)),
                FieldSpec::money(
                    "supplies",
                    FieldAddress {
                        sheet: "Summary".to_string(),
                        column: ColumnSelector::FiscalYear { header_row: 0 },
                        row: RowSelector::Label {
                            column: 1,
                            label: "supplies".to_string(),
                        },
                    },
                ),
                FieldSpec::money("total", FieldAddress::fiscal_year("Summary", 1, 4)),
                FieldSpec::money("fixed", FieldAddress::cell("Summary", "C", 2)),
                FieldSpec::money(
                    "missing_label",
                    FieldAddress::labelled("Summary", "D", "B", "Travel"),
                ),
            ],
            schema: vec![SchemaNode::category(
                "All",
                Some("total"),
                vec![SchemaNode::item("Salaries", "salaries")],
            )],
            courses: None,
        }
    }

    #[test]
    fn test_fiscal_year_column_and_fixed_row() {
        let (wb, layout) = (workbook(), layout());
        let locator = CellLocator::new(&wb, &layout, "FY26");
        assert_eq!(locator.read("salaries").unwrap(), RawCellValue::Number(100.0));

        let fy25 = CellLocator::new(&wb, &layout, "fy25");
        assert_eq!(fy25.read("salaries").unwrap(), RawCellValue::Number(90.0));
    }

    #[test]
    fn test_label_row_lookup() {
        let (wb, layout) = (workbook(), layout());
        let locator = CellLocator::new(&wb, &layout, "FY26");
        assert_eq!(
            locator.read("supplies").unwrap(),
            RawCellValue::CurrencyText("$12.50".to_string())
        );
    }

    #[test]
    fn test_blank_cell_is_blank_not_error() {
        let (wb, layout) = (workbook(), layout());
        let locator = CellLocator::new(&wb, &layout, "FY26");
        assert_eq!(locator.read("total").unwrap(), RawCellValue::Blank);
    }

    #[test]
    fn test_fixed_coordinates() {
        let (wb, layout) = (workbook(), layout());
        let locator = CellLocator::new(&wb, &layout, "FY26");
        assert_eq!(locator.read("fixed").unwrap(), RawCellValue::Number(90.0));
    }

    #[test]
    fn test_repeated_reads_are_identical() {
        let (wb, layout) = (workbook(), layout());
        let locator = CellLocator::new(&wb, &layout, "FY26");
        let first = locator.read("supplies").unwrap();
        let second = locator.read("supplies").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_errors() {
        let (wb, layout) = (workbook(), layout());
        let locator = CellLocator::new(&wb, &layout, "FY26");

        assert!(matches!(
            locator.locate("Nope", "salaries"),
            Err(BudgetError::SheetNotFound { .. })
        ));
        assert!(matches!(
            locator.locate("Summary", "nope"),
            Err(BudgetError::UnknownField { .. })
        ));
        match locator.read("missing_label") {
            Err(BudgetError::FieldLabelNotFound { field, label, .. }) => {
                assert_eq!(field, "missing_label");
                assert_eq!(label, "Travel");
            }
            other => panic!("expected FieldLabelNotFound, got {other:?}"),
        }

        let fy30 = CellLocator::new(&wb, &layout, "FY30");
        assert!(matches!(
            fy30.read("salaries"),
            Err(BudgetError::ColumnHeaderNotFound { row: 1, .. })
        ));
    }
}
