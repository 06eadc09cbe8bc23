//! Report model emitter: turns a `BudgetReport` into the ordered document
//! the dashboard renderer consumes, and writes it as JSON or YAML.

use crate::core::TrackingSummary;
use crate::error::BudgetResult;
use crate::types::{
    BudgetCategory, BudgetNode, BudgetReport, CourseGroup, Money, Notice, TotalMismatch,
};
use rust_decimal::Decimal;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Ordered, lossless view of one fiscal year's report.
/// Holds only sequences, so serialization order is fixed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntermediateDocument {
    pub fiscal_year: String,
    pub total_budget: Money,
    pub computed_total: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_mismatch: Option<TotalMismatch>,
    pub categories: Vec<NodeDoc>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub course_groups: Vec<CourseGroupDoc>,
    pub notices: Vec<Notice>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeDoc {
    Category {
        name: String,
        amount: Money,
        share: Decimal,
        computed_total: Money,
        #[serde(skip_serializing_if = "Option::is_none")]
        declared_total: Option<Money>,
        #[serde(skip_serializing_if = "Option::is_none")]
        mismatch: Option<TotalMismatch>,
        children: Vec<NodeDoc>,
    },
    Item {
        name: String,
        field: String,
        amount: Money,
        share: Decimal,
        #[serde(skip_serializing_if = "Option::is_none")]
        headcount: Option<u32>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseGroupDoc {
    pub category: String,
    pub courses: Vec<CourseDoc>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
    pub sections: Vec<SectionDoc>,
    pub total_sections: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseDoc {
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionDoc {
    pub name: String,
    pub sections: u32,
}

pub fn emit(report: &BudgetReport) -> IntermediateDocument {
    IntermediateDocument {
        fiscal_year: report.fiscal_year.clone(),
        total_budget: report.total_budget,
        computed_total: report.computed_total,
        total_mismatch: report.total_mismatch.clone(),
        categories: report.categories.iter().map(category_doc).collect(),
        course_groups: report.course_groups.iter().map(course_group_doc).collect(),
        notices: report.notices.clone(),
    }
}

fn category_doc(category: &BudgetCategory) -> NodeDoc {
    NodeDoc::Category {
        name: category.name.clone(),
        amount: category.amount,
        share: category.share,
        computed_total: category.computed_total,
        declared_total: category.declared_total,
        mismatch: category.mismatch.clone(),
        children: category.children.iter().map(node_doc).collect(),
    }
}

fn node_doc(node: &BudgetNode) -> NodeDoc {
    match node {
        BudgetNode::Category(c) => category_doc(c),
        BudgetNode::Item(i) => NodeDoc::Item {
            name: i.name.clone(),
            field: i.field.clone(),
            amount: i.amount,
            share: i.share,
            headcount: i.headcount,
        },
    }
}

fn course_group_doc(group: &CourseGroup) -> CourseGroupDoc {
    CourseGroupDoc {
        category: group.category.clone(),
        courses: group
            .courses
            .iter()
            .map(|c| CourseDoc {
                name: c.name.clone(),
                title: c.title.clone(),
            })
            .collect(),
        notes: group.notes.clone(),
        sections: group
            .sections
            .iter()
            .map(|s| SectionDoc {
                name: s.name.clone(),
                sections: s.sections,
            })
            .collect(),
        total_sections: group.total_sections(),
    }
}

//==============================================================================
// Output files
//==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Yaml => "yaml",
        }
    }
}

/// Serialize any emitted document. JSON is pretty-printed with a trailing newline.
pub fn render<T: Serialize>(document: &T, format: OutputFormat) -> BudgetResult<String> {
    Ok(match format {
        OutputFormat::Json => {
            let mut out = serde_json::to_string_pretty(document)?;
            out.push('\n');
            out
        }
        OutputFormat::Yaml => serde_yaml::to_string(document)?,
    })
}

/// `<out_dir>/<fy>_report.<ext>`, with the year code lowercased
pub fn report_path(out_dir: &Path, fiscal_year: &str, format: OutputFormat) -> PathBuf {
    out_dir.join(format!(
        "{}_report.{}",
        fiscal_year.to_lowercase(),
        format.extension()
    ))
}

pub fn tracking_path(out_dir: &Path, fiscal_year: &str) -> PathBuf {
    out_dir.join(format!("{}_tracking.json", fiscal_year.to_lowercase()))
}

/// Emit `report` and write it into `out_dir`, creating the directory if needed
pub fn write_report(report: &BudgetReport, out_dir: &Path, format: OutputFormat) -> BudgetResult<PathBuf> {
    let path = report_path(out_dir, &report.fiscal_year, format);
    write_document(&emit(report), &path, format)?;
    Ok(path)
}

pub fn write_tracking(summary: &TrackingSummary, path: &Path) -> BudgetResult<()> {
    write_document(summary, path, OutputFormat::Json)
}

pub fn write_document<T: Serialize>(document: &T, path: &Path, format: OutputFormat) -> BudgetResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, render(document, format)?)?;
    Ok(())
}
