use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Sick,
    Holiday,
}

impl AttendanceStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "PRESENT" => Some(AttendanceStatus::Present),
            "ABSENT" => Some(AttendanceStatus::Absent),
            "SICK" => Some(AttendanceStatus::Sick),
            "HOLIDAY" => Some(AttendanceStatus::Holiday),
            _ => None,
        }
    }
}

/// One register row per child per calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attendance {
    pub id: String,
    pub organisation_id: String,
    pub child_id: String,
    pub date: NaiveDate,
    pub check_in_time: Option<DateTime<Utc>>,
    pub check_out_time: Option<DateTime<Utc>>,
    pub status: AttendanceStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
