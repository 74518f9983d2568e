//! Persistence seam for attendance sessions and backup metadata.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use crate::model::attendance::{
    AttendanceBackup, AttendanceRecord, AttendanceSummary, NewAttendance,
};

#[cfg(test)]
pub mod memory;
pub mod mysql;

pub use mysql::MySqlAttendanceStore;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AttendanceStore: Send + Sync {
    /// Insert a new open session and return it as stored
    async fn create(&self, new: NewAttendance) -> anyhow::Result<AttendanceRecord>;

    /// Most recent open session of an employee.
    ///
    /// Ordered by `check_in_time` descending, ties broken by the higher id.
    async fn latest_open(&self, employee_id: u64) -> anyhow::Result<Option<AttendanceRecord>>;

    /// Set `check_out_time` on a session that is still open and return the row
    async fn close(&self, id: u64, at: DateTime<Utc>) -> anyhow::Result<AttendanceRecord>;

    /// Sessions of one employee grouped under `day`, earliest check-in first
    async fn for_employee_on(
        &self,
        employee_id: u64,
        day: NaiveDate,
    ) -> anyhow::Result<Vec<AttendanceRecord>>;

    async fn all_on(&self, day: NaiveDate) -> anyhow::Result<Vec<AttendanceSummary>>;

    async fn for_year(&self, year: i32) -> anyhow::Result<Vec<AttendanceRecord>>;

    async fn record_backup(
        &self,
        year: i32,
        file_url: String,
        created_at: DateTime<Utc>,
    ) -> anyhow::Result<AttendanceBackup>;
}
