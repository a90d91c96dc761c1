use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};

mod config;
mod email;
mod error;
mod loader;
mod logging;
mod merge;
mod models;
mod report;
mod sample;
mod streaks;

use config::{OutputFormat, ReportConfig, DEFAULT_THRESHOLD};
use models::{RawAttendanceRecord, RawDirectoryEntry};

#[derive(Parser)]
#[command(name = "absence-streak-report")]
#[command(about = "Consecutive-day absence streaks with parent notifications", long_about = None)]
struct Cli {
    /// Log level filter (overridden by RUST_LOG)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct OutputArgs {
    /// Streaks must exceed this many days to be listed as extended
    #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
    threshold: u32,
    #[arg(long, value_enum, default_value_t = OutputFormat::Grid)]
    format: OutputFormat,
}

impl OutputArgs {
    fn config(&self) -> ReportConfig {
        ReportConfig::new(self.threshold, self.format)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List absence streaks longer than the threshold
    Streaks {
        #[arg(long)]
        attendance: PathBuf,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Build the full report with parent notifications
    Report {
        #[arg(long)]
        attendance: PathBuf,
        #[arg(long)]
        directory: PathBuf,
        #[command(flatten)]
        output: OutputArgs,
        /// Write the report to a file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Run the report over the built-in sample data
    Demo {
        #[command(flatten)]
        output: OutputArgs,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(&cli.log_level);

    match cli.command {
        Commands::Streaks { attendance, output } => {
            let config = output.config();
            let raw = loader::load_attendance(&attendance)
                .with_context(|| format!("failed to load {}", attendance.display()))?;
            print!("{}", extended_listing(&raw, &config)?);
        }
        Commands::Report {
            attendance,
            directory,
            output,
            out,
        } => {
            let attendance_rows = loader::load_attendance(&attendance)
                .with_context(|| format!("failed to load {}", attendance.display()))?;
            let directory_rows = loader::load_directory(&directory)
                .with_context(|| format!("failed to load {}", directory.display()))?;
            let text = build_summary(&attendance_rows, &directory_rows, &output.config())?;
            emit(&text, out.as_deref())?;
        }
        Commands::Demo { output } => {
            let text = build_summary(&sample::attendance(), &sample::directory(), &output.config())?;
            emit(&text, None)?;
        }
    }

    Ok(())
}

/// Streaks over the threshold in the configured format. Only the grid view
/// replaces an empty listing with a sentence.
fn extended_listing(
    attendance: &[RawAttendanceRecord],
    config: &ReportConfig,
) -> anyhow::Result<String> {
    let streaks = streaks::compute_streaks_from_raw(attendance)?;
    let extended = streaks::filter_extended(&streaks, config.threshold);

    if extended.is_empty() && config.format == OutputFormat::Grid {
        return Ok(format!(
            "No absence streaks exceed {} days.\n",
            config.threshold
        ));
    }

    let rows = report::extended_rows(&extended);
    Ok(report::render(
        &rows,
        config.format,
        &config.extended_widths,
    )?)
}

fn build_summary(
    attendance: &[RawAttendanceRecord],
    directory: &[RawDirectoryEntry],
    config: &ReportConfig,
) -> anyhow::Result<String> {
    let streaks = streaks::compute_streaks_from_raw(attendance)?;
    let extended = streaks::filter_extended(&streaks, config.threshold);
    let merged = merge::merge_from_raw(&streaks, directory)?;

    tracing::info!(
        streaks = streaks.len(),
        extended = extended.len(),
        "absence report built"
    );

    Ok(report::render_summary(
        &report::extended_rows(&extended),
        &report::detailed_rows(&merged),
        config,
    )?)
}

fn emit(text: &str, out: Option<&Path>) -> anyhow::Result<()> {
    match out {
        Some(path) => {
            std::fs::write(path, text)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("Report written to {}.", path.display());
        }
        None => println!("{text}"),
    }
    Ok(())
}
