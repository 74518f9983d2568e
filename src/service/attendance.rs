use actix_web::web;
use chrono::{Datelike, Utc};
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::NamedTempFile;
use tracing::{debug, error, info, instrument};

use crate::clock::Clock;
use crate::error::AttendanceError;
use crate::model::attendance::{
    AttendanceBackup, AttendanceRecord, AttendanceSummary, NewAttendance,
};
use crate::store::AttendanceStore;

/// Result of a completed backup: the file on disk and its metadata row.
#[derive(Debug)]
pub struct BackupFile {
    pub path: PathBuf,
    pub record_count: usize,
    pub backup: AttendanceBackup,
}

pub struct AttendanceService {
    store: Arc<dyn AttendanceStore>,
    clock: Arc<dyn Clock>,
    backup_dir: PathBuf,
}

pub fn backup_file_name(year: i32) -> String {
    format!("attendance_{year}.json")
}

fn valid_employee(employee_id: Option<u64>) -> Result<u64, AttendanceError> {
    employee_id
        .filter(|id| *id != 0)
        .ok_or(AttendanceError::InvalidEmployee)
}

impl AttendanceService {
    pub fn new(
        store: Arc<dyn AttendanceStore>,
        clock: Arc<dyn Clock>,
        backup_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            store,
            clock,
            backup_dir: backup_dir.into(),
        }
    }

    /// Opens a new session. A session that is already open does not block this.
    #[instrument(name = "attendance_check_in", skip(self))]
    pub async fn check_in(
        &self,
        employee_id: Option<u64>,
    ) -> Result<AttendanceRecord, AttendanceError> {
        let employee_id = valid_employee(employee_id)?;
        let now = self.clock.now();

        let record = self
            .store
            .create(NewAttendance {
                employee_id,
                date: now.date_naive(),
                check_in_time: now.with_timezone(&Utc),
                year: now.year(),
            })
            .await
            .inspect_err(|e| error!(error = %e, employee_id, "Check-in failed"))?;

        info!(employee_id, attendance_id = record.id, "Checked in");
        Ok(record)
    }

    /// Closes the most recent open session of the employee.
    #[instrument(name = "attendance_check_out", skip(self))]
    pub async fn check_out(
        &self,
        employee_id: Option<u64>,
    ) -> Result<AttendanceRecord, AttendanceError> {
        let employee_id = valid_employee(employee_id)?;

        let open = self
            .store
            .latest_open(employee_id)
            .await
            .inspect_err(|e| error!(error = %e, employee_id, "Check-out lookup failed"))?
            .ok_or_else(|| {
                info!(employee_id, "Check-out without an open session");
                AttendanceError::NoActiveCheckIn
            })?;

        let now = self.clock.now().with_timezone(&Utc);
        let record = self
            .store
            .close(open.id, now)
            .await
            .inspect_err(|e| error!(error = %e, employee_id, "Check-out failed"))?;

        info!(employee_id, attendance_id = record.id, "Checked out");
        Ok(record)
    }

    #[instrument(name = "attendance_today", skip(self))]
    pub async fn today_attendance(
        &self,
        employee_id: Option<u64>,
    ) -> Result<Vec<AttendanceRecord>, AttendanceError> {
        let employee_id = valid_employee(employee_id)?;
        let today = self.clock.now().date_naive();

        let records = self
            .store
            .for_employee_on(employee_id, today)
            .await
            .inspect_err(|e| error!(error = %e, employee_id, "Failed to fetch today's attendance"))?;

        debug!(employee_id, count = records.len(), %today, "Fetched today's attendance");
        Ok(records)
    }

    #[instrument(name = "attendance_today_all", skip(self))]
    pub async fn all_today_attendance(&self) -> Result<Vec<AttendanceSummary>, AttendanceError> {
        let today = self.clock.now().date_naive();

        let rows = self
            .store
            .all_on(today)
            .await
            .inspect_err(|e| error!(error = %e, "Failed to fetch attendance for all employees"))?;

        debug!(count = rows.len(), %today, "Fetched attendance for all employees");
        Ok(rows)
    }

    /// Exports this year's sessions to `attendance_<year>.json` and records
    /// the export. The metadata row is written only once the file is on disk.
    #[instrument(name = "attendance_backup", skip(self))]
    pub async fn backup_attendance(&self) -> Result<BackupFile, AttendanceError> {
        let now = self.clock.now();
        let year = now.year();

        let records = self
            .store
            .for_year(year)
            .await
            .inspect_err(|e| error!(error = %e, year, "Failed to fetch attendance for backup"))
            .map_err(AttendanceError::BackupFailed)?;

        if records.is_empty() {
            info!(year, "No attendance data to backup");
            return Err(AttendanceError::NoBackupData);
        }

        let record_count = records.len();
        let dir = self.backup_dir.clone();
        let path = web::block(move || write_backup(&dir, year, &records))
            .await
            .map_err(|e| io::Error::other(e.to_string()))
            .and_then(|written| written)
            .inspect_err(|e| error!(error = %e, year, "Failed to write attendance backup"))?;

        let file_url = path.to_string_lossy().into_owned();
        let backup = self
            .store
            .record_backup(year, file_url, now.with_timezone(&Utc))
            .await
            .inspect_err(|e| error!(error = %e, year, "Failed to record attendance backup"))
            .map_err(AttendanceError::BackupFailed)?;

        info!(year, record_count, path = %path.display(), "Attendance backup written");
        Ok(BackupFile {
            path,
            record_count,
            backup,
        })
    }
}

/// Writes `records` as a pretty-printed JSON array into `dir`, creating it if
/// needed. Returns the absolute path of the file.
fn write_backup(dir: &Path, year: i32, records: &[AttendanceRecord]) -> io::Result<PathBuf> {
    write_replacing(dir, &backup_file_name(year), |writer| {
        serde_json::to_writer_pretty(writer, records).map_err(io::Error::from)
    })
}

/// Writes into a temp file next to `dir/name` and renames it into place, so
/// an existing file is either kept whole or fully replaced.
fn write_replacing<F>(dir: &Path, name: &str, write: F) -> io::Result<PathBuf>
where
    F: FnOnce(&mut dyn Write) -> io::Result<()>,
{
    fs::create_dir_all(dir)?;
    let dir = fs::canonicalize(dir)?;
    let path = dir.join(name);

    let mut tmp = NamedTempFile::new_in(&dir)?;
    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        write(&mut writer)?;
        writer.flush()?;
    }
    tmp.as_file().sync_all()?;
    tmp.persist(&path).map_err(|e| e.error)?;

    Ok(path)
}
