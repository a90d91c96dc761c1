use std::collections::HashMap;

use crate::email;
use crate::error::{RecordKind, ReportError, Result};
use crate::models::{
    display_date, AbsenceStreak, RawDirectoryEntry, ReportRow, StudentDirectoryEntry,
};

pub fn parse_entry(index: usize, row: &RawDirectoryEntry) -> Result<StudentDirectoryEntry> {
    let raw_id = row
        .student_id
        .as_ref()
        .ok_or_else(|| ReportError::invalid(RecordKind::Directory, index, "missing student_id"))?;
    let student_id = raw_id.to_id().ok_or_else(|| {
        ReportError::invalid(
            RecordKind::Directory,
            index,
            format!("student_id {raw_id} is not an integer"),
        )
    })?;

    let student_name = row
        .student_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| ReportError::invalid(RecordKind::Directory, index, "missing student_name"))?
        .to_string();

    // Present but malformed addresses are accepted here and dropped at merge time.
    let parent_email = row
        .parent_email
        .clone()
        .ok_or_else(|| ReportError::invalid(RecordKind::Directory, index, "missing parent_email"))?;

    Ok(StudentDirectoryEntry {
        student_id,
        student_name,
        parent_email,
    })
}

pub fn merge_from_raw(
    streaks: &[AbsenceStreak],
    directory: &[RawDirectoryEntry],
) -> Result<Vec<ReportRow>> {
    let entries = directory
        .iter()
        .enumerate()
        .map(|(index, row)| parse_entry(index, row))
        .collect::<Result<Vec<_>>>()?;

    Ok(merge(streaks, &entries))
}

/// Left-join streaks onto the directory and draft parent notifications.
///
/// Every streak yields one row. When a student appears more than once in the
/// directory the first entry is used.
pub fn merge(streaks: &[AbsenceStreak], directory: &[StudentDirectoryEntry]) -> Vec<ReportRow> {
    let mut lookup: HashMap<i64, &StudentDirectoryEntry> = HashMap::new();
    for entry in directory {
        if lookup.contains_key(&entry.student_id) {
            tracing::warn!(
                student_id = entry.student_id,
                "duplicate directory entry ignored"
            );
            continue;
        }
        lookup.insert(entry.student_id, entry);
    }

    let mut rows: Vec<ReportRow> = streaks
        .iter()
        .map(|streak| build_row(streak, lookup.get(&streak.student_id).copied()))
        .collect();

    rows.sort_by(|a, b| {
        a.student_id
            .cmp(&b.student_id)
            .then_with(|| a.start_date.cmp(&b.start_date))
    });

    let notified = rows.iter().filter(|row| row.notification.is_some()).count();
    tracing::debug!(rows = rows.len(), notified, "merged streaks with directory");
    rows
}

fn build_row(streak: &AbsenceStreak, entry: Option<&StudentDirectoryEntry>) -> ReportRow {
    let student_name = entry.map(|e| e.student_name.clone());
    let contact_email = entry
        .filter(|e| email::is_valid(&e.parent_email))
        .map(|e| e.parent_email.clone());

    let notification = match (&contact_email, &student_name) {
        (Some(_), Some(name)) => Some(notification_text(name, streak)),
        _ => None,
    };

    ReportRow {
        student_id: streak.student_id,
        student_name,
        start_date: streak.start_date,
        end_date: streak.end_date,
        absence_days: streak.absence_days,
        contact_email,
        notification,
    }
}

pub fn notification_text(student_name: &str, streak: &AbsenceStreak) -> String {
    format!(
        "Dear Parent, your child {} missed school from {} to {} for {} days. \
         Kindly ensure consistent attendance.",
        student_name,
        display_date(streak.start_date),
        display_date(streak.end_date),
        streak.absence_days
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawStudentId;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn streak(student_id: i64, start: NaiveDate, end: NaiveDate) -> AbsenceStreak {
        AbsenceStreak {
            student_id,
            start_date: start,
            end_date: end,
            absence_days: ((end - start).num_days() + 1) as u32,
        }
    }

    fn entry(student_id: i64, name: &str, email: &str) -> StudentDirectoryEntry {
        StudentDirectoryEntry {
            student_id,
            student_name: name.to_string(),
            parent_email: email.to_string(),
        }
    }

    fn directory() -> Vec<StudentDirectoryEntry> {
        vec![
            entry(1, "Aarav Sharma", "sharma_aarav@gmail.com"),
            entry(2, "Priya Patel", "patel.priya@outlook.com"),
            entry(3, "Vikram Singh", "invalid.email.com"),
        ]
    }

    #[test]
    fn valid_email_gets_notification() {
        let streaks = vec![streak(1, date(2024, 3, 1), date(2024, 3, 4))];
        let rows = merge(&streaks, &directory());

        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.student_name.as_deref(), Some("Aarav Sharma"));
        assert_eq!(row.contact_email.as_deref(), Some("sharma_aarav@gmail.com"));
        assert_eq!(
            row.notification.as_deref(),
            Some(
                "Dear Parent, your child Aarav Sharma missed school from 01-03-2024 \
                 to 04-03-2024 for 4 days. Kindly ensure consistent attendance."
            )
        );
    }

    #[test]
    fn invalid_email_yields_no_contact() {
        let streaks = vec![
            streak(2, date(2024, 3, 5), date(2024, 3, 9)),
            streak(3, date(2024, 3, 5), date(2024, 3, 9)),
        ];
        let rows = merge(&streaks, &directory());

        for row in &rows {
            assert!(row.student_name.is_some());
            assert_eq!(row.contact_email, None);
            assert_eq!(row.notification, None);
        }
    }

    #[test]
    fn unknown_student_is_kept_without_contact() {
        let streaks = vec![streak(42, date(2024, 3, 5), date(2024, 3, 9))];
        let rows = merge(&streaks, &directory());

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].student_id, 42);
        assert_eq!(rows[0].absence_days, 5);
        assert_eq!(rows[0].student_name, None);
        assert_eq!(rows[0].contact_email, None);
        assert_eq!(rows[0].notification, None);
    }

    #[test]
    fn first_directory_entry_wins() {
        let mut dir = directory();
        dir.push(entry(1, "Someone Else", "other@gmail.com"));
        let rows = merge(&[streak(1, date(2024, 3, 1), date(2024, 3, 1))], &dir);

        assert_eq!(rows[0].student_name.as_deref(), Some("Aarav Sharma"));
        assert_eq!(rows[0].contact_email.as_deref(), Some("sharma_aarav@gmail.com"));
    }

    #[test]
    fn sorts_by_date_value_not_display_string() {
        // "01-01-2025" sorts before "15-12-2024" as text.
        let streaks = vec![
            streak(1, date(2025, 1, 1), date(2025, 1, 1)),
            streak(1, date(2024, 12, 15), date(2024, 12, 16)),
            streak(0, date(2025, 6, 1), date(2025, 6, 1)),
        ];
        let rows = merge(&streaks, &directory());
        let keys: Vec<_> = rows.iter().map(|r| (r.student_id, r.start_date)).collect();

        assert_eq!(
            keys,
            vec![
                (0, date(2025, 6, 1)),
                (1, date(2024, 12, 15)),
                (1, date(2025, 1, 1)),
            ]
        );
    }

    #[test]
    fn empty_streaks_merge_to_nothing() {
        assert!(merge(&[], &directory()).is_empty());
    }

    #[test]
    fn raw_directory_missing_email_is_invalid() {
        let raw = vec![RawDirectoryEntry {
            student_id: Some(RawStudentId::Number(5)),
            student_name: Some("Meera Iyer".to_string()),
            parent_email: None,
        }];
        let err = merge_from_raw(&[streak(5, date(2024, 1, 8), date(2024, 1, 9))], &raw).unwrap_err();
        assert!(matches!(
            err,
            ReportError::InvalidRecord {
                kind: RecordKind::Directory,
                index: 0,
                ..
            }
        ));
        assert!(err.to_string().contains("missing parent_email"));
    }

    #[test]
    fn raw_directory_malformed_email_is_soft() {
        let raw = vec![RawDirectoryEntry::new(5, "Meera Iyer", "not an address")];
        let rows = merge_from_raw(&[streak(5, date(2024, 1, 8), date(2024, 1, 9))], &raw).unwrap();
        assert_eq!(rows[0].student_name.as_deref(), Some("Meera Iyer"));
        assert_eq!(rows[0].contact_email, None);
        assert_eq!(rows[0].notification, None);
    }

    #[test]
    fn raw_directory_non_integer_id_is_invalid() {
        let raw = vec![RawDirectoryEntry {
            student_id: Some(RawStudentId::Text("three".to_string())),
            student_name: Some("Vikram Singh".to_string()),
            parent_email: Some("singh@school.org".to_string()),
        }];
        assert!(matches!(
            merge_from_raw(&[], &raw),
            Err(ReportError::InvalidRecord {
                kind: RecordKind::Directory,
                index: 0,
                ..
            })
        ));
    }

    #[test]
    fn raw_directory_missing_name_is_invalid() {
        let raw = vec![
            RawDirectoryEntry::new(1, "Aarav Sharma", "sharma_aarav@gmail.com"),
            RawDirectoryEntry {
                student_id: Some(RawStudentId::Number(2)),
                student_name: None,
                parent_email: Some("x@y.com".to_string()),
            },
        ];
        let err = merge_from_raw(&[], &raw).unwrap_err();
        assert!(matches!(
            err,
            ReportError::InvalidRecord {
                kind: RecordKind::Directory,
                index: 1,
                ..
            }
        ));
    }

    #[test]
    fn raw_directory_missing_id_is_invalid() {
        let raw = vec![RawDirectoryEntry {
            student_id: None,
            student_name: Some("Ghost".to_string()),
            parent_email: Some("ghost@school.org".to_string()),
        }];
        assert!(merge_from_raw(&[], &raw).is_err());
    }
}
