//! Read-only access to `fiscal_years.json`, the map from fiscal-year code
//! to the workbooks that feed it.

use crate::error::{BudgetError, BudgetResult};
use chrono::NaiveDate;
use regex::Regex;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

pub const DEFAULT_CONFIG_FILE: &str = "fiscal_years.json";

#[derive(Debug, Clone, Deserialize)]
pub struct FiscalYearsConfig {
    #[serde(default)]
    pub fiscal_years: Vec<FiscalYearEntry>,
    #[serde(default)]
    pub current_fiscal_year: Option<String>,
    /// Directory relative workbook paths are resolved against
    #[serde(skip)]
    base_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FiscalYearEntry {
    pub year: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub period: Option<String>,
    pub master_budget_file: PathBuf,
    #[serde(default)]
    pub latest_report_file: Option<PathBuf>,
    #[serde(default)]
    pub latest_report_month: Option<String>,
    #[serde(default)]
    pub months_elapsed: u32,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub added: Option<NaiveDate>,
    #[serde(default)]
    pub updated: Option<NaiveDate>,
}

impl FiscalYearEntry {
    /// Configured label, or one derived from the year code
    pub fn label(&self) -> String {
        self.label
            .clone()
            .or_else(|| parse_year_code(&self.year).map(|fy| fy.label()))
            .unwrap_or_else(|| self.year.clone())
    }

    pub fn period(&self) -> Option<String> {
        self.period
            .clone()
            .or_else(|| parse_year_code(&self.year).map(|fy| fy.period()))
    }

    pub fn status(&self) -> &str {
        self.status.as_deref().unwrap_or("active")
    }
}

impl FiscalYearsConfig {
    pub fn load(path: &Path) -> BudgetResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            BudgetError::Config(format!("Failed to read '{}': {}", path.display(), e))
        })?;
        let mut config: FiscalYearsConfig = serde_json::from_str(&content)?;
        config.base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Ok(config)
    }

    /// Case-insensitive lookup by year code. `FY2026` finds `FY26`.
    pub fn find(&self, year: &str) -> BudgetResult<&FiscalYearEntry> {
        let wanted = parse_year_code(year).map(|c| c.code());
        self.fiscal_years
            .iter()
            .find(|fy| {
                fy.year.eq_ignore_ascii_case(year)
                    || (wanted.is_some() && parse_year_code(&fy.year).map(|c| c.code()) == wanted)
            })
            .ok_or_else(|| BudgetError::FiscalYearNotFound(year.to_string()))
    }

    pub fn is_current(&self, entry: &FiscalYearEntry) -> bool {
        self.current_fiscal_year
            .as_deref()
            .is_some_and(|c| c.eq_ignore_ascii_case(&entry.year))
    }

    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    pub fn budget_workbook(&self, entry: &FiscalYearEntry) -> PathBuf {
        self.resolve(&entry.master_budget_file)
    }

    pub fn tracking_workbook(&self, entry: &FiscalYearEntry) -> Option<PathBuf> {
        entry.latest_report_file.as_deref().map(|p| self.resolve(p))
    }
}

/// A parsed fiscal-year code. The year ends June 30 of `full_year`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearCode {
    pub full_year: i32,
}

impl YearCode {
    pub fn code(&self) -> String {
        format!("FY{:02}", self.full_year % 100)
    }

    pub fn label(&self) -> String {
        format!("Fiscal Year {}", self.full_year)
    }

    pub fn period(&self) -> String {
        format!("July 1, {} - June 30, {}", self.full_year - 1, self.full_year)
    }
}

fn year_code_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(?i)fy\s*(\d{2}|\d{4})$").expect("valid regex"))
}

/// `FY26`, `fy26` and `FY2026` all parse to fiscal year 2026
pub fn parse_year_code(code: &str) -> Option<YearCode> {
    let caps = year_code_regex().captures(code.trim())?;
    let digits = caps.get(1)?.as_str();
    let n: i32 = digits.parse().ok()?;
    let full_year = if digits.len() == 2 { 2000 + n } else { n };
    Some(YearCode { full_year })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::TempDir;

    const CONFIG: &str = r#"{
  "fiscal_years": [
    {
      "year": "FY26",
      "label": "Fiscal Year 2026",
      "period": "July 1, 2025 - June 30, 2026",
      "master_budget_file": "budgets/FY26 Master Budget.xlsx",
      "latest_report_file": "/data/tracking/march.xlsx",
      "latest_report_month": "March",
      "months_elapsed": 9,
      "status": "active",
      "added": "2025-07-01",
      "updated": "2026-03-31"
    },
    {
      "year": "FY25",
      "master_budget_file": "FY25.xlsx",
      "latest_report_file": null
    }
  ],
  "current_fiscal_year": "FY26"
}"#;

    fn load() -> (TempDir, FiscalYearsConfig) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(CONFIG.as_bytes()).unwrap();
        let config = FiscalYearsConfig::load(&path).unwrap();
        (dir, config)
    }

    #[test]
    fn test_load_and_find() {
        let (_dir, config) = load();
        assert_eq!(config.fiscal_years.len(), 2);
        let fy26 = config.find("fy26").unwrap();
        assert_eq!(fy26.months_elapsed, 9);
        assert_eq!(fy26.added, NaiveDate::from_ymd_opt(2025, 7, 1));
        assert!(config.is_current(fy26));
        assert!(!config.is_current(config.find("FY25").unwrap()));
        assert_eq!(config.find("fy2026").unwrap().year, "FY26");
        assert_eq!(config.find("FY 25").unwrap().year, "FY25");
    }

    #[test]
    fn test_unknown_year() {
        let (_dir, config) = load();
        match config.find("FY30") {
            Err(BudgetError::FiscalYearNotFound(year)) => assert_eq!(year, "FY30"),
            other => panic!("expected FiscalYearNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_derived_label_and_period() {
        let (_dir, config) = load();
        let fy25 = config.find("FY25").unwrap();
        assert_eq!(fy25.label(), "Fiscal Year 2025");
        assert_eq!(fy25.period().unwrap(), "July 1, 2024 - June 30, 2025");
        assert_eq!(fy25.status(), "active");
    }

    #[test]
    fn test_paths_resolve_against_config_dir() {
        let (dir, config) = load();
        let fy26 = config.find("FY26").unwrap();
        assert_eq!(
            config.budget_workbook(fy26),
            dir.path().join("budgets/FY26 Master Budget.xlsx")
        );
        assert_eq!(
            config.tracking_workbook(fy26),
            Some(PathBuf::from("/data/tracking/march.xlsx"))
        );
        assert_eq!(config.tracking_workbook(config.find("FY25").unwrap()), None);
    }

    #[test]
    fn test_missing_config_file() {
        let dir = TempDir::new().unwrap();
        let err = FiscalYearsConfig::load(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, BudgetError::Config(_)));
    }

    #[test]
    fn test_parse_year_code() {
        assert_eq!(parse_year_code("FY26").unwrap().full_year, 2026);
        assert_eq!(parse_year_code("fy 27").unwrap().code(), "FY27");
        assert_eq!(parse_year_code("FY2030").unwrap().full_year, 2030);
        assert_eq!(
            parse_year_code("FY26").unwrap().period(),
            "July 1, 2025 - June 30, 2026"
        );
        assert!(parse_year_code("2026").is_none());
        assert!(parse_year_code("FY").is_none());
    }
}
