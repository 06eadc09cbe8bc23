//! Workbook layout: the field-address mapping table, the category schema and
//! the course listing sheet description.
//!
//! A built-in layout matches the department's master budget workbook. A YAML
//! file with the same shape can replace it when the workbook changes, so a
//! moved row touches one table instead of the extraction code.

mod address;
mod defaults;
mod schema;

pub use address::{
    column_letter_to_index, index_to_column_letter, ColumnSelector, FieldAddress, FieldSpec,
    RowSelector,
};
pub use defaults::{BREAKDOWN_SHEET, COURSE_SHEET, FY_HEADER_ROW, SUMMARY_SHEET};
pub use schema::SchemaNode;

use crate::error::{BudgetError, BudgetResult};
use crate::types::ValueKind;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Layout {
    /// Field holding the workbook's grand total
    pub total_field: String,
    pub fields: Vec<FieldSpec>,
    /// Top-level categories, in output order
    pub schema: Vec<SchemaNode>,
    #[serde(default)]
    pub courses: Option<CourseSheetLayout>,
}

impl Default for Layout {
    fn default() -> Self {
        defaults::master_budget_layout()
    }
}

impl Layout {
    /// Load a layout override from YAML and validate it
    pub fn load(path: &Path) -> BudgetResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let layout: Layout = serde_yaml::from_str(&content)?;
        layout.validate()?;
        Ok(layout)
    }

    pub fn field(&self, key: &str) -> BudgetResult<&FieldSpec> {
        self.fields
            .iter()
            .find(|f| f.key == key)
            .ok_or_else(|| BudgetError::UnknownField {
                field: key.to_string(),
            })
    }

    /// Check the schema against the field table
    pub fn validate(&self) -> BudgetResult<()> {
        let mut seen = HashSet::new();
        for spec in &self.fields {
            if !seen.insert(spec.key.as_str()) {
                return Err(BudgetError::Config(format!(
                    "field '{}' is defined twice",
                    spec.key
                )));
            }
        }

        self.expect_kind(&self.total_field, ValueKind::Monetary)?;

        for node in &self.schema {
            if !matches!(node, SchemaNode::Category { .. }) {
                return Err(BudgetError::Config(format!(
                    "top-level schema entry '{}' must be a category",
                    node.name()
                )));
            }
            self.validate_node(node)?;
        }
        Ok(())
    }

    fn validate_node(&self, node: &SchemaNode) -> BudgetResult<()> {
        match node {
            SchemaNode::Item {
                field, headcount, ..
            } => {
                self.expect_kind(field, ValueKind::Monetary)?;
                if let Some(h) = headcount {
                    self.expect_kind(h, ValueKind::Count)?;
                }
            }
            SchemaNode::Category {
                name,
                declared,
                children,
            } => {
                if children.is_empty() {
                    return Err(BudgetError::Config(format!(
                        "category '{name}' has no children"
                    )));
                }
                if let Some(d) = declared {
                    self.expect_kind(d, ValueKind::Monetary)?;
                }
                for child in children {
                    self.validate_node(child)?;
                }
            }
        }
        Ok(())
    }

    fn expect_kind(&self, key: &str, kind: ValueKind) -> BudgetResult<()> {
        let spec = self.field(key)?;
        if spec.kind != kind {
            return Err(BudgetError::Config(format!(
                "field '{key}' is {:?}, expected {:?}",
                spec.kind, kind
            )));
        }
        Ok(())
    }
}

/// A budget category the course listing may tag courses with
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct KnownCategory {
    pub name: String,
    /// Four-digit budget code, e.g. `0506`
    #[serde(default)]
    pub code: Option<String>,
}

impl KnownCategory {
    pub fn new(name: &str, code: &str) -> Self {
        Self {
            name: name.to_string(),
            code: Some(code.to_string()),
        }
    }

    /// Accepts the name, the code, or `Name (code)`, ignoring case
    pub fn matches(&self, tag: &str) -> bool {
        let tag = tag.trim();
        if tag.eq_ignore_ascii_case(&self.name) {
            return true;
        }
        match &self.code {
            Some(code) => {
                tag == code || tag.eq_ignore_ascii_case(&format!("{} ({})", self.name, code))
            }
            None => false,
        }
    }
}

/// Where the course listing lives and how to read it
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "CourseSheetEntry")]
pub struct CourseSheetLayout {
    pub sheet: String,
    pub name_column: u32,
    /// Category tag; a blank tag continues the category above it
    pub category_column: u32,
    pub title_column: Option<u32>,
    /// Zero-based first data row
    pub first_row: u32,
    pub categories: Vec<KnownCategory>,
    /// Entries starting with one of these are notes, not courses
    pub note_prefixes: Vec<String>,
    /// Entries equal to one of these are notes, not courses
    pub note_labels: Vec<String>,
}

impl CourseSheetLayout {
    pub fn canonical_category(&self, tag: &str) -> Option<&str> {
        self.categories
            .iter()
            .find(|c| c.matches(tag))
            .map(|c| c.name.as_str())
    }

    pub fn is_note(&self, entry: &str) -> bool {
        self.note_prefixes.iter().any(|p| entry.starts_with(p.as_str()))
            || self.note_labels.iter().any(|l| entry == l)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CourseSheetEntry {
    sheet: String,
    name_column: String,
    category_column: String,
    #[serde(default)]
    title_column: Option<String>,
    first_row: u32,
    #[serde(default)]
    categories: Vec<KnownCategory>,
    #[serde(default)]
    note_prefixes: Vec<String>,
    #[serde(default)]
    note_labels: Vec<String>,
}

impl TryFrom<CourseSheetEntry> for CourseSheetLayout {
    type Error = BudgetError;

    fn try_from(entry: CourseSheetEntry) -> BudgetResult<Self> {
        let column = |letters: &str| {
            column_letter_to_index(letters).ok_or_else(|| {
                BudgetError::Config(format!("courses: invalid column '{letters}'"))
            })
        };
        if entry.first_row == 0 {
            return Err(BudgetError::Config(
                "courses: rows are numbered from 1".to_string(),
            ));
        }
        Ok(CourseSheetLayout {
            name_column: column(&entry.name_column)?,
            category_column: column(&entry.category_column)?,
            title_column: entry.title_column.as_deref().map(column).transpose()?,
            first_row: entry.first_row - 1,
            sheet: entry.sheet,
            categories: entry.categories,
            note_prefixes: entry.note_prefixes,
            note_labels: entry.note_labels,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_layout_is_valid() {
        let layout = Layout::default();
        layout.validate().unwrap();
        assert!(layout.field(&layout.total_field).unwrap().mandatory);
        assert_eq!(layout.schema.len(), 2);
        assert_eq!(layout.schema[0].name(), "Compensation");
        assert_eq!(layout.schema[1].name(), "Current Expenses");
    }

    #[test]
    fn test_unknown_field_lookup() {
        let layout = Layout::default();
        match layout.field("no_such_field") {
            Err(BudgetError::UnknownField { field }) => assert_eq!(field, "no_such_field"),
            other => panic!("expected UnknownField, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_rejects_schema_reference_to_missing_field() {
        let mut layout = Layout::default();
        layout.schema.push(SchemaNode::category(
            "Capital",
            None,
            vec![SchemaNode::item("Equipment", "equipment")],
        ));
        assert!(matches!(
            layout.validate(),
            Err(BudgetError::UnknownField { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_headcount_on_money_field() {
        let mut layout = Layout::default();
        layout.schema[0] = SchemaNode::category(
            "Compensation",
            None,
            vec![SchemaNode::staffed(
                "Standing Faculty",
                "standing_faculty",
                "standing_faculty",
            )],
        );
        assert!(matches!(layout.validate(), Err(BudgetError::Config(_))));
    }

    #[test]
    fn test_known_category_matching() {
        let cat = KnownCategory::new("Printmaking", "0506");
        assert!(cat.matches("Printmaking"));
        assert!(cat.matches(" printmaking "));
        assert!(cat.matches("0506"));
        assert!(cat.matches("Printmaking (0506)"));
        assert!(!cat.matches("Printmaking II"));
    }

    #[test]
    fn test_load_layout_from_yaml() {
        let yaml = r#"
total_field: grand_total
fields:
  - key: grand_total
    sheet: Summary
    column: C
    row: 10
    mandatory: true
  - key: salaries
    sheet: Summary
    column: C
    row: 3
  - key: supplies
    sheet: Summary
    column: C
    label: Supplies
    label_column: A
schema:
  - kind: category
    name: Spending
    children:
      - kind: item
        name: Salaries
        field: salaries
      - kind: item
        name: Supplies
        field: supplies
courses:
  sheet: Courses
  name_column: A
  category_column: B
  title_column: C
  first_row: 2
  categories:
    - name: Ceramics
      code: "0510"
  note_prefixes: ["$"]
"#;
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(yaml.as_bytes()).unwrap();

        let layout = Layout::load(file.path()).unwrap();
        assert_eq!(layout.fields.len(), 3);
        let courses = layout.courses.unwrap();
        assert_eq!(courses.first_row, 1);
        assert_eq!(courses.title_column, Some(2));
        assert_eq!(courses.canonical_category("0510"), Some("Ceramics"));
        assert!(courses.is_note("$200 / visit"));
    }
}
