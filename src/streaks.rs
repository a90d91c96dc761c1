use std::collections::{BTreeMap, BTreeSet};

use chrono::{Duration, NaiveDate};

use crate::error::{RecordKind, ReportError, Result};
use crate::models::{AbsenceStreak, AttendanceRecord, RawAttendanceRecord};

pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Validate raw rows, then detect streaks. Any malformed row fails the batch.
pub fn compute_streaks_from_raw(raw: &[RawAttendanceRecord]) -> Result<Vec<AbsenceStreak>> {
    let records = raw
        .iter()
        .enumerate()
        .map(|(index, row)| parse_record(index, row))
        .collect::<Result<Vec<_>>>()?;

    Ok(compute_streaks(&records))
}

pub fn parse_record(index: usize, row: &RawAttendanceRecord) -> Result<AttendanceRecord> {
    let raw_id = row
        .student_id
        .as_ref()
        .ok_or_else(|| ReportError::invalid(RecordKind::Attendance, index, "missing student_id"))?;
    let student_id = raw_id.to_id().ok_or_else(|| {
        ReportError::invalid(
            RecordKind::Attendance,
            index,
            format!("student_id {raw_id} is not an integer"),
        )
    })?;

    let raw_date = row
        .date
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| ReportError::invalid(RecordKind::Attendance, index, "missing date"))?;

    let date = NaiveDate::parse_from_str(raw_date, ISO_DATE_FORMAT).map_err(|err| {
        ReportError::invalid(
            RecordKind::Attendance,
            index,
            format!("date {raw_date:?} is not a valid YYYY-MM-DD date ({err})"),
        )
    })?;

    Ok(AttendanceRecord { student_id, date })
}

/// Partition each student's dates into maximal runs of consecutive days.
///
/// Students come out in ascending id order and each student's streaks in
/// ascending date order. Repeated dates for a student count once.
pub fn compute_streaks(records: &[AttendanceRecord]) -> Vec<AbsenceStreak> {
    let mut by_student: BTreeMap<i64, BTreeSet<NaiveDate>> = BTreeMap::new();
    let mut duplicates = 0usize;

    for record in records {
        if !by_student
            .entry(record.student_id)
            .or_default()
            .insert(record.date)
        {
            duplicates += 1;
        }
    }

    if duplicates > 0 {
        tracing::warn!(duplicates, "ignored repeated attendance dates");
    }

    let mut streaks = Vec::new();
    for (student_id, dates) in &by_student {
        streaks.extend(student_streaks(*student_id, dates));
    }

    tracing::debug!(
        records = records.len(),
        students = by_student.len(),
        streaks = streaks.len(),
        "computed absence streaks"
    );
    streaks
}

fn student_streaks(student_id: i64, dates: &BTreeSet<NaiveDate>) -> Vec<AbsenceStreak> {
    let mut streaks = Vec::new();
    let mut iter = dates.iter().copied();

    let Some(first) = iter.next() else {
        return streaks;
    };

    let mut start = first;
    let mut prev = first;
    let mut count = 1u32;

    for date in iter {
        if date == prev + Duration::days(1) {
            count += 1;
        } else {
            streaks.push(AbsenceStreak {
                student_id,
                start_date: start,
                end_date: prev,
                absence_days: count,
            });
            start = date;
            count = 1;
        }
        prev = date;
    }

    streaks.push(AbsenceStreak {
        student_id,
        start_date: start,
        end_date: prev,
        absence_days: count,
    });
    streaks
}

/// Streaks strictly longer than `threshold` days.
pub fn filter_extended(streaks: &[AbsenceStreak], threshold: u32) -> Vec<AbsenceStreak> {
    streaks
        .iter()
        .filter(|streak| streak.absence_days > threshold)
        .cloned()
        .collect()
}
