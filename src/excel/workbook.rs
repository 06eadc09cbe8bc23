//! In-memory workbook snapshot read through calamine.

use crate::error::{BudgetError, BudgetResult};
use crate::types::RawCellValue;
use calamine::{open_workbook_auto, Data, Range, Reader};
use std::path::{Path, PathBuf};
use tracing::debug;

/// One worksheet's used range. Positions are absolute and zero-based.
#[derive(Debug, Clone)]
pub struct Sheet {
    name: String,
    range: Range<Data>,
}

impl Sheet {
    pub fn new(name: impl Into<String>, range: Range<Data>) -> Self {
        Self {
            name: name.into(),
            range,
        }
    }

    /// Build a sheet from rows of cells starting at A1
    pub fn from_rows(name: impl Into<String>, rows: Vec<Vec<Data>>) -> Self {
        let height = rows.len() as u32;
        let width = rows.iter().map(|r| r.len()).max().unwrap_or(0) as u32;
        if height == 0 || width == 0 {
            return Self::new(name, Range::empty());
        }

        let mut range = Range::new((0, 0), (height - 1, width - 1));
        for (r, row) in rows.into_iter().enumerate() {
            for (c, cell) in row.into_iter().enumerate() {
                range.set_value((r as u32, c as u32), cell);
            }
        }
        Self::new(name, range)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Last used row, if the sheet has any cells
    pub fn last_row(&self) -> Option<u32> {
        self.range.end().map(|(row, _)| row)
    }

    pub fn last_column(&self) -> Option<u32> {
        self.range.end().map(|(_, col)| col)
    }

    pub fn data(&self, row: u32, col: u32) -> Option<&Data> {
        self.range.get_value((row, col))
    }

    /// Cell at an absolute position. Outside the used range reads as blank.
    pub fn cell(&self, row: u32, col: u32) -> RawCellValue {
        match self.data(row, col) {
            None | Some(Data::Empty) => RawCellValue::Blank,
            Some(Data::Float(f)) => RawCellValue::Number(*f),
            Some(Data::Int(i)) => RawCellValue::Number(*i as f64),
            Some(Data::String(s)) => RawCellValue::from_text(s),
            Some(Data::DateTime(dt)) => RawCellValue::Number(dt.as_f64()),
            Some(Data::Bool(b)) => RawCellValue::Text(b.to_string()),
            Some(other) => RawCellValue::Text(other.to_string()),
        }
    }

    /// Trimmed display text of a cell. Whole numbers print without `.0`,
    /// so a budget code stored as `4118.0` reads as `4118`.
    pub fn text(&self, row: u32, col: u32) -> String {
        match self.data(row, col) {
            None | Some(Data::Empty) => String::new(),
            Some(Data::Float(f)) if f.fract() == 0.0 && f.abs() < 1e15 => {
                format!("{}", *f as i64)
            }
            Some(Data::String(s)) => s.trim().to_string(),
            Some(other) => other.to_string().trim().to_string(),
        }
    }
}

/// All sheets of a workbook, copied out of the file
#[derive(Debug, Clone, Default)]
pub struct Workbook {
    source: Option<PathBuf>,
    sheets: Vec<Sheet>,
}

impl Workbook {
    /// Read every sheet into memory. The file handle is released before
    /// this returns, on success and on error.
    pub fn open<P: AsRef<Path>>(path: P) -> BudgetResult<Self> {
        let path = path.as_ref();
        let mut reader = open_workbook_auto(path).map_err(|e| {
            BudgetError::Workbook(format!("Failed to open '{}': {}", path.display(), e))
        })?;

        let names = reader.sheet_names().to_vec();
        let mut sheets = Vec::with_capacity(names.len());
        for name in names {
            let range = reader.worksheet_range(&name).map_err(|e| {
                BudgetError::Workbook(format!(
                    "Failed to read sheet '{}' of '{}': {}",
                    name,
                    path.display(),
                    e
                ))
            })?;
            debug!(sheet = %name, cells = range.get_size().0 * range.get_size().1, "loaded sheet");
            sheets.push(Sheet::new(name, range));
        }

        Ok(Self {
            source: Some(path.to_path_buf()),
            sheets,
        })
    }

    pub fn from_sheets(sheets: Vec<Sheet>) -> Self {
        Self {
            source: None,
            sheets,
        }
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name()).collect()
    }

    pub fn sheet(&self, name: &str) -> BudgetResult<&Sheet> {
        self.sheets
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| BudgetError::SheetNotFound {
                sheet: name.to_string(),
            })
    }
}
