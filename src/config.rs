use std::fmt;

use clap::ValueEnum;

/// Streaks must be strictly longer than this to count as extended.
pub const DEFAULT_THRESHOLD: u32 = 3;

pub const EXTENDED_COLUMN_WIDTHS: [usize; 4] = [10, 20, 20, 20];
pub const DETAILED_COLUMN_WIDTHS: [usize; 6] = [10, 20, 20, 20, 25, 60];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Grid,
    Csv,
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Grid => f.write_str("grid"),
            OutputFormat::Csv => f.write_str("csv"),
            OutputFormat::Json => f.write_str("json"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub threshold: u32,
    pub format: OutputFormat,
    pub extended_widths: Vec<usize>,
    pub detailed_widths: Vec<usize>,
}

impl ReportConfig {
    pub fn new(threshold: u32, format: OutputFormat) -> Self {
        Self {
            threshold,
            format,
            ..Self::default()
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            format: OutputFormat::Grid,
            extended_widths: EXTENDED_COLUMN_WIDTHS.to_vec(),
            detailed_widths: DETAILED_COLUMN_WIDTHS.to_vec(),
        }
    }
}
