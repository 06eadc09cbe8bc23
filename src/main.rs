use budget_dash::cli;
use budget_dash::error::BudgetResult;
use budget_dash::writer::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "budget-dash")]
#[command(about = "Extract department budgets from Excel workbooks into dashboard-ready reports")]
#[command(long_about = "Budget Dash - Fiscal-year budget extraction

Reads the master budget workbook of each fiscal year (FA_Summary,
CE_Breakdown and the course listing sheet), reconciles every declared
total against the sum of its line items, and writes an ordered report
document for the dashboard renderer.

COMMANDS:
  generate  - Write report documents for one fiscal year or all of them
  inspect   - Print the category tree and notices of a workbook
  tracking  - Extract budget vs actuals from a monthly summary
  years     - List configured fiscal years

EXAMPLES:
  budget-dash generate FY26                     # Uses ./fiscal_years.json
  budget-dash generate all --format yaml -o site/data
  budget-dash inspect 'FY26 Master Budget.xlsx' --year FY26
  budget-dash tracking march.xlsx -o fy26_tracking.json")]
#[command(version)]
struct Cli {
    /// Log pipeline detail to stderr (same as RUST_LOG=budget_dash=debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(long_about = "Generate report documents.

Looks up the fiscal year in fiscal_years.json, extracts its master budget
workbook and writes <fy>_report.json (or .yaml) into the output directory.
When the year has a latest_report_file, <fy>_tracking.json is written too.

Pass 'all' to generate every configured year. The run stops at the first
year that fails.")]
    /// Generate report documents for a fiscal year (or 'all')
    Generate {
        /// Fiscal year code such as FY26, or 'all'
        year: String,

        /// Fiscal-year configuration file
        #[arg(short, long, env = "BUDGET_DASH_CONFIG", default_value = "fiscal_years.json")]
        config: PathBuf,

        /// Directory the report documents are written to
        #[arg(short, long = "out-dir", env = "BUDGET_DASH_OUT_DIR", default_value = ".")]
        out_dir: PathBuf,

        /// Document format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,

        /// YAML layout replacing the built-in field table and schema
        #[arg(short, long)]
        layout: Option<PathBuf>,
    },

    /// Print the category tree and notices of a budget workbook
    Inspect {
        /// Path to the master budget workbook (.xlsx, .xls, .ods)
        workbook: PathBuf,

        /// Fiscal year column to read, e.g. FY26
        #[arg(short, long)]
        year: String,

        /// YAML layout replacing the built-in field table and schema
        #[arg(short, long)]
        layout: Option<PathBuf>,
    },

    /// Extract budget vs actuals from a monthly department summary
    Tracking {
        /// Path to the tracking workbook
        workbook: PathBuf,

        /// Write the summary as JSON instead of printing it
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the fiscal years in the configuration
    Years {
        /// Fiscal-year configuration file
        #[arg(short, long, env = "BUDGET_DASH_CONFIG", default_value = "fiscal_years.json")]
        config: PathBuf,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "budget_dash=debug"
    } else {
        "budget_dash=warn"
    };
    let filter = if verbose {
        tracing_subscriber::EnvFilter::new(default)
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into())
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> BudgetResult<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Generate {
            year,
            config,
            out_dir,
            format,
            layout,
        } => cli::generate(year, config, out_dir, format, layout, cli.verbose),

        Commands::Inspect {
            workbook,
            year,
            layout,
        } => cli::inspect(workbook, year, layout),

        Commands::Tracking { workbook, output } => cli::tracking(workbook, output),

        Commands::Years { config } => cli::years(config),
    }
}
