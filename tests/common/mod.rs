//! Fixture workbooks shaped like the department's master budget and
//! monthly tracking exports.

#![allow(dead_code)]

use rust_xlsxwriter::{Workbook, Worksheet};
use std::path::{Path, PathBuf};

/// Column U, where the FY26 figures sit
pub const FY26_COL: u16 = 20;
/// Column T, FY25
pub const FY25_COL: u16 = 19;

/// Knobs for bending the master budget fixture
#[derive(Clone)]
pub struct MasterBudget {
    pub include_total: bool,
    pub include_breakdown: bool,
    pub chair_fall_pt_fund: f64,
    pub fy25_total: Option<f64>,
    pub course_studio_text: Option<&'static str>,
}

impl Default for MasterBudget {
    fn default() -> Self {
        Self {
            include_total: true,
            include_breakdown: true,
            chair_fall_pt_fund: 4000.0,
            fy25_total: None,
            course_studio_text: None,
        }
    }
}

/// 1-based spreadsheet row to the zero-based row rust_xlsxwriter takes
fn r(row: u32) -> u32 {
    row - 1
}

fn summary_line(ws: &mut Worksheet, row: u32, label: &str, amount: f64) {
    ws.write_string(r(row), 1, label).unwrap();
    ws.write_number(r(row), FY26_COL, amount).unwrap();
}

impl MasterBudget {
    pub fn write(&self, path: &Path) {
        let mut wb = Workbook::new();

        {
            let ws = wb.add_worksheet();
            ws.set_name("FA_Summary").unwrap();
            ws.write_string(0, 0, "Fine Arts Department Budget Summary").unwrap();
            ws.write_string(r(5), 1, "Line").unwrap();
            ws.write_string(r(5), 2, "Headcount").unwrap();
            ws.write_string(r(5), FY25_COL, "FY25").unwrap();
            ws.write_string(r(5), FY26_COL, "FY26").unwrap();

            summary_line(ws, 11, "Standing Faculty", 1_402_118.40);
            ws.write_number(r(11), 2, 7.0).unwrap();
            summary_line(ws, 12, "Other Fulltime Faculty", 1_021_507.52);
            ws.write_number(r(12), 2, 10.0).unwrap();
            summary_line(ws, 13, "Part-Time Faculty", 740_376.00);
            ws.write_number(r(13), 2, 45.0).unwrap();
            summary_line(ws, 16, "Total Academic", 3_164_001.92);
            summary_line(ws, 42, "Non-Academic Salaries", 715_482.08);
            summary_line(ws, 47, "Total Compensation", 3_879_484.00);

            match self.course_studio_text {
                Some(text) => {
                    ws.write_string(r(67), 1, "Course/Studio").unwrap();
                    ws.write_string(r(67), FY26_COL, text).unwrap();
                }
                None => summary_line(ws, 67, "Course/Studio", 104_500.00),
            }
            summary_line(ws, 75, "Department Administrative", 25_000.00);
            summary_line(ws, 79, "Departmental Events", 15_000.00);
            summary_line(ws, 99, "Promotion of Department", 8_000.00);
            summary_line(ws, 111, "Current Expenses", 362_120.00);
            summary_line(ws, 112, "Graduate", 199_620.00);
            summary_line(ws, 113, "Undergraduate", 162_500.00);
            if self.include_total {
                summary_line(ws, 117, "Grand Total", 4_241_604.00);
            } else {
                ws.write_string(r(117), 1, "Grand Total").unwrap();
            }
            if let Some(total) = self.fy25_total {
                ws.write_number(r(117), FY25_COL, total).unwrap();
            }
        }

        if self.include_breakdown {
            let ws = wb.add_worksheet();
            ws.set_name("CE_Breakdown").unwrap();
            ws.write_string(0, 0, "Current Expense Breakdown").unwrap();
            ws.write_string(r(23), 1, "Chair Expenses").unwrap();
            ws.write_number(r(23), 16, 10_000.0).unwrap();
            let chair = [self.chair_fall_pt_fund, 4_000.0, 2_000.0];
            for (i, amount) in chair.iter().enumerate() {
                ws.write_number(r(24) + i as u32, 16, *amount).unwrap();
            }
            ws.write_string(r(29), 1, "Course/Studio").unwrap();
            let studio = [
                10_000.0, 12_600.0, 15_400.0, 2_500.0, 8_400.0, 11_950.0, 10_750.0, 8_400.0,
                2_000.0, 22_500.0,
            ];
            for (i, amount) in studio.iter().enumerate() {
                ws.write_number(r(30) + i as u32, 16, *amount).unwrap();
            }
            ws.write_string(r(63), 1, "Departmental Events").unwrap();
            let events = [6_000.0, 3_000.0, 2_500.0, 1_500.0, 2_000.0];
            for (i, amount) in events.iter().enumerate() {
                ws.write_number(r(64) + i as u32, 16, *amount).unwrap();
            }
        }

        {
            let ws = wb.add_worksheet();
            ws.set_name("Sheet1").unwrap();
            // category in A on the first row of each group, code in B, title in C
            let rows = [
                ("Printmaking (0506)", "FNAR 2200", "Printmaking I"),
                ("", "FNAR 2200", "Printmaking I"),
                ("Visiting Lectures (0050)", "$200 / visit", ""),
                ("", "FNAR 1010", "Visiting Artist Series"),
                ("Glassworks (0999)", "FNAR 3100", "Glass"),
                // blank sentinel row
                ("", "", ""),
                ("Sculpture Instructional (0507)", "FNAR 2300", "Ceramics"),
            ];
            for (i, cells) in rows.iter().enumerate() {
                for (col, text) in [cells.0, cells.1, cells.2].iter().enumerate() {
                    if !text.is_empty() {
                        ws.write_string(i as u32, col as u16, *text).unwrap();
                    }
                }
            }
        }

        wb.save(path).unwrap();
    }

    pub fn write_to(&self, dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        self.write(&path);
        path
    }
}

/// Monthly department summary with two undergraduate categories
pub fn write_tracking_workbook(path: &Path) {
    let mut wb = Workbook::new();
    let ws = wb.add_worksheet();
    ws.set_name("Monthly Department Summary").unwrap();

    let text_rows: [(u32, [&str; 5]); 10] = [
        (0, ["Department Summary", "", "", "", ""]),
        (1, ["Period Ending March 2026", "", "", "", ""]),
        (2, ["", "", "", "", "Academic Salaries"]),
        (3, ["", "", "", "", "Non-Academic Salaries"]),
        (4, ["CURRENT EXPENSE", "", "", "", ""]),
        (5, ["4118", "F A UNDERGRAD", "0592", "Senior Seminar", "Supplies"]),
        (6, ["", "", "0592", "", ""]),
        (7, ["4118", "UGRAD FNAR", "", "", ""]),
        (8, ["Subtotal - Current Expense", "", "", "", ""]),
        (9, ["TOTAL EXPENDITURES", "", "", "", ""]),
    ];
    for (row, cells) in text_rows {
        for (col, text) in cells.iter().enumerate() {
            if !text.is_empty() {
                ws.write_string(row, col as u16, *text).unwrap();
            }
        }
    }

    let figures: [(u32, [f64; 4]); 7] = [
        (2, [4000.0, 3000.0, 0.0, 1000.0]),
        (3, [800.0, 600.0, 0.0, 200.0]),
        (5, [0.0, 50.0, 0.0, 0.0]),
        (6, [1000.0, 1200.0, 0.0, -200.0]),
        (7, [1000.0, 1200.0, 0.0, -200.0]),
        (8, [1000.0, 1200.0, 0.0, -200.0]),
        (9, [5800.0, 4800.0, 0.0, 1000.0]),
    ];
    for (row, values) in figures {
        for (i, value) in values.iter().enumerate() {
            ws.write_number(row, 5 + i as u16, *value).unwrap();
        }
    }

    wb.save(path).unwrap();
}

/// `fiscal_years.json` naming one year and its workbooks, relative to `dir`
pub fn write_config(dir: &Path, year: &str, budget_file: &str, tracking_file: Option<&str>) -> PathBuf {
    let tracking = match tracking_file {
        Some(f) => format!("\"{f}\""),
        None => "null".to_string(),
    };
    let content = format!(
        r#"{{
  "fiscal_years": [
    {{
      "year": "{year}",
      "master_budget_file": "{budget_file}",
      "latest_report_file": {tracking},
      "months_elapsed": 9,
      "status": "active",
      "added": "2025-07-01"
    }}
  ],
  "current_fiscal_year": "{year}"
}}"#
    );
    let path = dir.join("fiscal_years.json");
    std::fs::write(&path, content).unwrap();
    path
}
