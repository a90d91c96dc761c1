use crate::models::{RawAttendanceRecord, RawDirectoryEntry};

pub fn attendance() -> Vec<RawAttendanceRecord> {
    [
        (1, "2024-03-01"),
        (1, "2024-03-02"),
        (1, "2024-03-03"),
        (1, "2024-03-04"),
        (1, "2024-03-06"),
        (2, "2024-03-05"),
        (2, "2024-03-06"),
        (2, "2024-03-07"),
        (2, "2024-03-08"),
        (2, "2024-03-09"),
    ]
    .into_iter()
    .map(|(student_id, date)| RawAttendanceRecord::new(student_id, date))
    .collect()
}

pub fn directory() -> Vec<RawDirectoryEntry> {
    vec![
        RawDirectoryEntry::new(1, "Aarav Sharma", "sharma_aarav@gmail.com"),
        RawDirectoryEntry::new(2, "Priya Patel", "patel.priya@outlook.com"),
        RawDirectoryEntry::new(3, "Vikram Singh", "invalid.email.com"),
    ]
}
