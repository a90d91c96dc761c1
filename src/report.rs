use std::fmt::Write;

use serde::Serialize;
use unicode_width::UnicodeWidthStr;

use crate::config::{OutputFormat, ReportConfig};
use crate::error::Result;
use crate::models::{display_date, AbsenceStreak, ReportRow};

/// A fixed-shape row with stable column names.
pub trait TableRow: Serialize {
    const HEADERS: &'static [&'static str];

    /// Cell text in column order, as shown in the grid view.
    fn cells(&self) -> Vec<String>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtendedAbsenceRow {
    pub student_id: i64,
    pub absence_start_date: String,
    pub absence_end_date: String,
    pub total_absent_days: u32,
}

impl From<&AbsenceStreak> for ExtendedAbsenceRow {
    fn from(streak: &AbsenceStreak) -> Self {
        Self {
            student_id: streak.student_id,
            absence_start_date: display_date(streak.start_date),
            absence_end_date: display_date(streak.end_date),
            total_absent_days: streak.absence_days,
        }
    }
}

impl TableRow for ExtendedAbsenceRow {
    const HEADERS: &'static [&'static str] = &[
        "student_id",
        "absence_start_date",
        "absence_end_date",
        "total_absent_days",
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.student_id.to_string(),
            self.absence_start_date.clone(),
            self.absence_end_date.clone(),
            self.total_absent_days.to_string(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailedReportRow {
    pub student_id: i64,
    pub absence_start_date: String,
    pub absence_end_date: String,
    pub total_absent_days: u32,
    pub email: Option<String>,
    pub notification: Option<String>,
}

impl From<&ReportRow> for DetailedReportRow {
    fn from(row: &ReportRow) -> Self {
        Self {
            student_id: row.student_id,
            absence_start_date: display_date(row.start_date),
            absence_end_date: display_date(row.end_date),
            total_absent_days: row.absence_days,
            email: row.contact_email.clone(),
            notification: row.notification.clone(),
        }
    }
}

impl TableRow for DetailedReportRow {
    const HEADERS: &'static [&'static str] = &[
        "student_id",
        "absence_start_date",
        "absence_end_date",
        "total_absent_days",
        "email",
        "notification",
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.student_id.to_string(),
            self.absence_start_date.clone(),
            self.absence_end_date.clone(),
            self.total_absent_days.to_string(),
            self.email.clone().unwrap_or_else(|| "None".to_string()),
            self.notification.clone().unwrap_or_else(|| "None".to_string()),
        ]
    }
}

pub fn extended_rows(streaks: &[AbsenceStreak]) -> Vec<ExtendedAbsenceRow> {
    streaks.iter().map(ExtendedAbsenceRow::from).collect()
}

pub fn detailed_rows(rows: &[ReportRow]) -> Vec<DetailedReportRow> {
    rows.iter().map(DetailedReportRow::from).collect()
}

pub fn extended_title(threshold: u32) -> String {
    format!("Students with Absences Exceeding {threshold} Consecutive Days:")
}

pub const DETAILED_TITLE: &str = "Comprehensive Absence Report with Notifications:";

pub fn render<T: TableRow>(rows: &[T], format: OutputFormat, max_widths: &[usize]) -> Result<String> {
    match format {
        OutputFormat::Grid => Ok(render_grid(rows, max_widths)),
        OutputFormat::Csv => render_csv(rows),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(rows)?),
    }
}

#[derive(Serialize)]
struct SummaryDocument<'a> {
    threshold: u32,
    extended_absences: &'a [ExtendedAbsenceRow],
    report: &'a [DetailedReportRow],
}

/// Both row-sets, titled, in the configured format.
pub fn render_summary(
    extended: &[ExtendedAbsenceRow],
    detailed: &[DetailedReportRow],
    config: &ReportConfig,
) -> Result<String> {
    if config.format == OutputFormat::Json {
        let document = SummaryDocument {
            threshold: config.threshold,
            extended_absences: extended,
            report: detailed,
        };
        return Ok(serde_json::to_string_pretty(&document)?);
    }

    let mut output = String::new();
    let _ = writeln!(output, "{}", extended_title(config.threshold));
    let _ = write!(
        output,
        "{}",
        render(extended, config.format, &config.extended_widths)?
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "{DETAILED_TITLE}");
    let _ = write!(
        output,
        "{}",
        render(detailed, config.format, &config.detailed_widths)?
    );

    Ok(output)
}

fn render_csv<T: TableRow>(rows: &[T]) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    writer.write_record(T::HEADERS)?;
    for row in rows {
        writer.serialize(row)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| csv::Error::from(err.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Boxed text table; cells wider than their column limit wrap on spaces.
pub fn render_grid<T: TableRow>(rows: &[T], max_widths: &[usize]) -> String {
    let limit = |col: usize| max_widths.get(col).copied().unwrap_or(usize::MAX).max(1);

    let header: Vec<Vec<String>> = T::HEADERS
        .iter()
        .enumerate()
        .map(|(col, text)| wrap(text, limit(col)))
        .collect();

    let body: Vec<Vec<Vec<String>>> = rows
        .iter()
        .map(|row| {
            row.cells()
                .iter()
                .enumerate()
                .map(|(col, text)| wrap(text, limit(col)))
                .collect()
        })
        .collect();

    let mut widths = vec![1usize; T::HEADERS.len()];
    for cells in std::iter::once(&header).chain(body.iter()) {
        for (col, lines) in cells.iter().enumerate() {
            for line in lines {
                widths[col] = widths[col].max(line.width());
            }
        }
    }

    let mut output = String::new();
    push_rule(&mut output, &widths, '-');
    push_cells(&mut output, &header, &widths);
    push_rule(&mut output, &widths, '=');
    for cells in &body {
        push_cells(&mut output, cells, &widths);
        push_rule(&mut output, &widths, '-');
    }
    output
}

fn push_rule(output: &mut String, widths: &[usize], fill: char) {
    output.push('+');
    for width in widths {
        output.extend(std::iter::repeat(fill).take(width + 2));
        output.push('+');
    }
    output.push('\n');
}

fn push_cells(output: &mut String, cells: &[Vec<String>], widths: &[usize]) {
    let height = cells.iter().map(Vec::len).max().unwrap_or(1);
    for line in 0..height {
        output.push('|');
        for (col, width) in widths.iter().enumerate() {
            let text = cells
                .get(col)
                .and_then(|lines| lines.get(line))
                .map(String::as_str)
                .unwrap_or("");
            let pad = width.saturating_sub(text.width());
            let _ = write!(output, " {}{} |", text, " ".repeat(pad));
        }
        output.push('\n');
    }
}

/// Greedy word wrap by display width; words longer than `width` are split.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let word_width = word.width();

        if word_width > width {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let mut chunk = String::new();
            for ch in word.chars() {
                let ch_width = ch.to_string().width();
                if !chunk.is_empty() && chunk.width() + ch_width > width {
                    lines.push(std::mem::take(&mut chunk));
                }
                chunk.push(ch);
            }
            current = chunk;
            continue;
        }

        if current.is_empty() {
            current.push_str(word);
        } else if current.width() + 1 + word_width <= width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}
