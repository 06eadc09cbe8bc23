use thiserror::Error;

pub type BudgetResult<T> = Result<T, BudgetError>;

/// Fatal extraction errors. Any of these aborts the run; no partial report
/// is produced.
#[derive(Error, Debug)]
pub enum BudgetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Workbook error: {0}")]
    Workbook(String),

    #[error("Sheet not found: '{sheet}'")]
    SheetNotFound { sheet: String },

    #[error("Unknown field: '{field}' is not in the layout")]
    UnknownField { field: String },

    #[error("Field '{field}': no row labelled '{label}' in sheet '{sheet}'")]
    FieldLabelNotFound {
        field: String,
        sheet: String,
        label: String,
    },

    #[error("Field '{field}': no column headed '{header}' in row {row} of sheet '{sheet}'")]
    ColumnHeaderNotFound {
        field: String,
        sheet: String,
        header: String,
        row: u32,
    },

    #[error("Missing required field: '{field}' ({reason})")]
    MissingRequiredField { field: String, reason: String },

    #[error("Fiscal year not found in configuration: {0}")]
    FiscalYearNotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl BudgetError {
    /// Name of the field this error is about, when it concerns a single field.
    pub fn field(&self) -> Option<&str> {
        match self {
            BudgetError::UnknownField { field }
            | BudgetError::FieldLabelNotFound { field, .. }
            | BudgetError::ColumnHeaderNotFound { field, .. }
            | BudgetError::MissingRequiredField { field, .. } => Some(field),
            _ => None,
        }
    }
}
