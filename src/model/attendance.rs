use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One check-in session. `check_out_time` stays `None` while the session is open.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "employee_id": 1000,
        "date": "2026-01-05",
        "check_in_time": "2026-01-05T09:00:00Z",
        "check_out_time": null,
        "year": 2026,
        "status": null
    })
)]
pub struct AttendanceRecord {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = 1000)]
    pub employee_id: u64,

    /// local calendar day the session is grouped under
    #[schema(example = "2026-01-05", value_type = String, format = "date")]
    pub date: NaiveDate,

    #[schema(example = "2026-01-05T09:00:00Z", value_type = String, format = "date-time")]
    pub check_in_time: DateTime<Utc>,

    #[schema(example = "2026-01-05T17:30:00Z", value_type = Option<String>, format = "date-time", nullable = true)]
    pub check_out_time: Option<DateTime<Utc>>,

    #[schema(example = 2026)]
    pub year: i32,

    #[schema(nullable = true)]
    pub status: Option<String>,
}

impl AttendanceRecord {
    pub fn is_open(&self) -> bool {
        self.check_out_time.is_none()
    }
}

/// Row shape of the all-employees view of a day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct AttendanceSummary {
    #[schema(example = 1000)]
    pub employee_id: u64,

    #[schema(example = "2026-01-05", value_type = String, format = "date")]
    pub date: NaiveDate,

    #[schema(example = "2026-01-05T09:00:00Z", value_type = String, format = "date-time")]
    pub check_in_time: DateTime<Utc>,

    #[schema(value_type = Option<String>, format = "date-time", nullable = true)]
    pub check_out_time: Option<DateTime<Utc>>,

    #[schema(nullable = true)]
    pub status: Option<String>,
}

impl From<&AttendanceRecord> for AttendanceSummary {
    fn from(record: &AttendanceRecord) -> Self {
        Self {
            employee_id: record.employee_id,
            date: record.date,
            check_in_time: record.check_in_time,
            check_out_time: record.check_out_time,
            status: record.status.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewAttendance {
    pub employee_id: u64,
    pub date: NaiveDate,
    pub check_in_time: DateTime<Utc>,
    pub year: i32,
}

/// Metadata row written after a backup file lands on disk.
#[derive(Debug, Clone, PartialEq)]
pub struct AttendanceBackup {
    pub id: u64,
    pub year: i32,
    pub file_url: String,
    pub created_at: DateTime<Utc>,
}
