use crate::config::{FiscalYearEntry, FiscalYearsConfig};
use crate::core::{self, TrackingLine, TrackingSummary};
use crate::error::BudgetResult;
use crate::excel::Workbook;
use crate::layout::Layout;
use crate::types::{BudgetCategory, BudgetNode, BudgetReport, Money, Notice};
use crate::writer::{self, OutputFormat};
use colored::Colorize;
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};

/// Format an amount as `$1,234.50`, negatives as `-$1,234.50`
pub fn format_money(amount: Money) -> String {
    let rounded = crate::types::money(amount);
    let text = rounded.abs().to_string();
    let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}${grouped}.{cents}")
}

/// Share as a percentage with one decimal, e.g. `0.4571` → `45.7%`
fn format_share(share: Decimal) -> String {
    format!("{:.1}%", (share * Decimal::ONE_HUNDRED).round_dp(1))
}

fn load_layout(path: Option<&Path>) -> BudgetResult<Layout> {
    match path {
        Some(p) => Layout::load(p),
        None => Ok(Layout::default()),
    }
}

/// Execute the generate command for one fiscal year or `all`
pub fn generate(
    year: String,
    config_path: PathBuf,
    out_dir: PathBuf,
    format: OutputFormat,
    layout_path: Option<PathBuf>,
    verbose: bool,
) -> BudgetResult<()> {
    println!("{}", "📊 Budget Dash - Generating reports".bold().green());
    println!("   Config: {}", config_path.display());
    println!("   Output: {}", out_dir.display());
    println!(
        "   Started: {}\n",
        chrono::Local::now().format("%Y-%m-%d %H:%M")
    );

    let config = FiscalYearsConfig::load(&config_path)?;
    let layout = load_layout(layout_path.as_deref())?;

    let entries: Vec<&FiscalYearEntry> = if year.eq_ignore_ascii_case("all") {
        config.fiscal_years.iter().collect()
    } else {
        vec![config.find(&year)?]
    };

    if entries.is_empty() {
        println!("{}", "⚠️  No fiscal years configured".yellow());
        return Ok(());
    }

    for entry in entries {
        generate_year(&config, entry, &layout, &out_dir, format, verbose)?;
    }

    println!("\n{}", "✅ Done".bold().green());
    Ok(())
}

fn generate_year(
    config: &FiscalYearsConfig,
    entry: &FiscalYearEntry,
    layout: &Layout,
    out_dir: &Path,
    format: OutputFormat,
    verbose: bool,
) -> BudgetResult<()> {
    println!("{}", format!("📖 {} ({})", entry.year, entry.label()).cyan());
    let workbook = config.budget_workbook(entry);
    if verbose {
        println!("   Workbook: {}", workbook.display());
    }

    // Nothing is written until every input for the year has been read
    let report = core::extract_report(&workbook, layout, &entry.year)?;
    let tracking = match config.tracking_workbook(entry) {
        Some(tracking_workbook) => Some(read_tracking(&tracking_workbook)?),
        None => {
            if verbose {
                println!("   No tracking report configured");
            }
            None
        }
    };

    let path = writer::write_report(&report, out_dir, format)?;
    println!(
        "   Total budget: {}",
        format_money(report.total_budget).bold()
    );
    print_notices(&report.notices);
    println!("   {} {}", "✅".green(), path.display());

    if let Some(summary) = tracking {
        let path = writer::tracking_path(out_dir, &entry.year);
        writer::write_tracking(&summary, &path)?;
        println!("   {} {}", "✅".green(), path.display());
    }
    Ok(())
}

/// Execute the inspect command: print the category tree of one workbook
pub fn inspect(workbook: PathBuf, year: String, layout_path: Option<PathBuf>) -> BudgetResult<()> {
    println!("{}", "🔍 Budget Dash - Inspect".bold().green());
    println!("   Workbook: {}", workbook.display());
    println!("   Fiscal year: {}\n", year.bright_yellow().bold());

    let layout = load_layout(layout_path.as_deref())?;
    let report = core::extract_report(&workbook, &layout, &year)?;
    print_report(&report);
    Ok(())
}

fn print_report(report: &BudgetReport) {
    println!("{}", "─".repeat(72));
    println!(
        "{:<44} {:>16} {:>9}",
        "Category".bold(),
        "Amount".bold(),
        "Share".bold()
    );
    println!("{}", "─".repeat(72));
    for category in &report.categories {
        print_category(category, 0);
    }
    println!("{}", "─".repeat(72));
    println!(
        "{:<44} {:>16}",
        "Total Budget".bold(),
        format_money(report.total_budget).bold()
    );

    for group in &report.course_groups {
        println!(
            "\n   {} {} courses, {} sections",
            group.category.bright_blue(),
            group.sections.len(),
            group.total_sections()
        );
        for note in &group.notes {
            println!("      {}", note.dimmed());
        }
    }

    println!();
    if report.notices.is_empty() {
        println!("{}", "✅ No notices".green());
    } else {
        print_notices(&report.notices);
    }
}

fn print_category(category: &BudgetCategory, depth: usize) {
    let label = format!("{}{}", "  ".repeat(depth), category.name);
    let flag = if category.mismatch.is_some() { " ⚠️" } else { "" };
    println!(
        "{:<44} {:>16} {:>9}{}",
        label.bold(),
        format_money(category.amount),
        format_share(category.share),
        flag
    );
    for child in &category.children {
        match child {
            BudgetNode::Category(c) => print_category(c, depth + 1),
            BudgetNode::Item(item) => {
                let mut label = format!("{}{}", "  ".repeat(depth + 1), item.name);
                if let Some(n) = item.headcount {
                    label.push_str(&format!(" ({n})"));
                }
                println!(
                    "{:<44} {:>16} {:>9}",
                    label,
                    format_money(item.amount),
                    format_share(item.share)
                );
            }
        }
    }
}

fn print_notices(notices: &[Notice]) {
    for notice in notices {
        let marker = if notice.is_mismatch() {
            "⚠️ ".yellow()
        } else {
            "ℹ️ ".cyan()
        };
        println!("   {} {}", marker, notice);
    }
}

fn read_tracking(path: &Path) -> BudgetResult<TrackingSummary> {
    let workbook = Workbook::open(path)?;
    core::extract_tracking_file(&workbook)
}

/// Execute the tracking command
pub fn tracking(workbook: PathBuf, output: Option<PathBuf>) -> BudgetResult<()> {
    println!("{}", "📈 Budget Dash - Tracking".bold().green());
    println!("   Workbook: {}\n", workbook.display());

    let summary = read_tracking(&workbook)?;

    if let Some(output_path) = output {
        writer::write_tracking(&summary, &output_path)?;
        println!(
            "{}",
            format!("✅ Tracking summary written to {}", output_path.display())
                .bold()
                .green()
        );
    } else {
        print_tracking_table(&summary);
    }
    Ok(())
}

fn print_tracking_table(summary: &TrackingSummary) {
    if !summary.period.is_empty() {
        println!("   {}", summary.period.bright_yellow());
    }
    println!("{}", "─".repeat(88));
    println!(
        "{:<32} {:>15} {:>15} {:>15} {:>8}",
        "Line".bold(),
        "Budget".bold(),
        "FYTD Actual".bold(),
        "Available".bold(),
        "Spent".bold()
    );
    println!("{}", "─".repeat(88));
    for line in summary.lines() {
        print_tracking_line(line);
    }
    println!("{}", "─".repeat(88));

    let over = summary.over_budget().count();
    if over > 0 {
        println!("   {} {} over budget", "⚠️".yellow(), over.to_string().red());
    }
}

fn print_tracking_line(line: &TrackingLine) {
    let pct = line
        .pct_spent
        .map(|p| format!("{:.1}%", p.round_dp(1)))
        .unwrap_or_else(|| "N/A".to_string());
    let pct = if line.is_over_budget() {
        pct.red()
    } else {
        pct.normal()
    };
    let available = format_money(line.available);
    let available = if line.available.is_sign_negative() && !line.available.is_zero() {
        available.red()
    } else {
        available.normal()
    };
    println!(
        "{:<32} {:>15} {:>15} {:>15} {:>8}",
        line.name.bright_blue(),
        format_money(line.budget),
        format_money(line.actuals),
        available,
        pct
    );
}

/// Execute the years command
pub fn years(config_path: PathBuf) -> BudgetResult<()> {
    let config = FiscalYearsConfig::load(&config_path)?;
    println!("{}", "📅 Configured fiscal years".bold().green());

    if config.fiscal_years.is_empty() {
        println!("   None configured in {}", config_path.display());
        return Ok(());
    }

    for entry in &config.fiscal_years {
        let marker = if config.is_current(entry) {
            " ⭐ CURRENT".yellow().to_string()
        } else {
            String::new()
        };
        println!("\n{}: {}{}", entry.year.bold(), entry.label(), marker);
        if let Some(period) = entry.period() {
            println!("   Period: {}", period);
        }
        println!("   Budget: {}", config.budget_workbook(entry).display());
        if let Some(tracking) = config.tracking_workbook(entry) {
            let month = entry.latest_report_month.as_deref().unwrap_or("latest");
            println!("   Tracking ({}): {}", month, tracking.display());
        }
        println!("   Status: {}", entry.status());
    }
    Ok(())
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
