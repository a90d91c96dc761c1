use std::fmt;

use chrono::NaiveDate;
use serde::Deserialize;

/// Day-first format used in reports and notifications.
pub const DISPLAY_DATE_FORMAT: &str = "%d-%m-%Y";

pub fn display_date(date: NaiveDate) -> String {
    date.format(DISPLAY_DATE_FORMAT).to_string()
}

/// A single attendance row after validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttendanceRecord {
    pub student_id: i64,
    pub date: NaiveDate,
}

/// A student id as read from input, before it is checked to be an integer.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawStudentId {
    Number(i64),
    Text(String),
    Other(serde_json::Value),
}

impl RawStudentId {
    /// The integer id, accepting numeric strings such as `" 7 "`.
    pub fn to_id(&self) -> Option<i64> {
        match self {
            RawStudentId::Number(id) => Some(*id),
            RawStudentId::Text(text) => text.trim().parse().ok(),
            RawStudentId::Other(_) => None,
        }
    }
}

impl fmt::Display for RawStudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawStudentId::Number(id) => write!(f, "{id}"),
            RawStudentId::Text(text) => write!(f, "{text:?}"),
            RawStudentId::Other(value) => write!(f, "{value}"),
        }
    }
}

impl From<i64> for RawStudentId {
    fn from(id: i64) -> Self {
        RawStudentId::Number(id)
    }
}

/// An attendance row as it arrives on the wire; every field may be absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAttendanceRecord {
    #[serde(default)]
    pub student_id: Option<RawStudentId>,
    #[serde(default)]
    pub date: Option<String>,
}

impl RawAttendanceRecord {
    pub fn new(student_id: i64, date: &str) -> Self {
        Self {
            student_id: Some(student_id.into()),
            date: Some(date.to_string()),
        }
    }
}

/// One maximal run of calendar-consecutive dates for a student.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbsenceStreak {
    pub student_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub absence_days: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentDirectoryEntry {
    pub student_id: i64,
    pub student_name: String,
    pub parent_email: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawDirectoryEntry {
    #[serde(default)]
    pub student_id: Option<RawStudentId>,
    #[serde(default)]
    pub student_name: Option<String>,
    #[serde(default)]
    pub parent_email: Option<String>,
}

impl RawDirectoryEntry {
    pub fn new(student_id: i64, student_name: &str, parent_email: &str) -> Self {
        Self {
            student_id: Some(student_id.into()),
            student_name: Some(student_name.to_string()),
            parent_email: Some(parent_email.to_string()),
        }
    }
}

/// A streak joined with the student directory.
///
/// `contact_email` is `None` when the directory entry is missing or its
/// address fails validation; `notification` is `None` exactly when
/// `contact_email` is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub student_id: i64,
    pub student_name: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub absence_days: u32,
    pub contact_email: Option<String>,
    pub notification: Option<String>,
}
