use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use std::sync::{Mutex, MutexGuard};

use super::AttendanceStore;
use crate::model::attendance::{
    AttendanceBackup, AttendanceRecord, AttendanceSummary, NewAttendance,
};

#[derive(Default)]
struct Tables {
    records: Vec<AttendanceRecord>,
    backups: Vec<AttendanceBackup>,
    next_id: u64,
}

impl Tables {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

/// Store kept in process memory, with the same ordering rules as the MySQL one.
#[derive(Default)]
pub struct MemoryAttendanceStore {
    tables: Mutex<Tables>,
}

impl MemoryAttendanceStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap()
    }

    /// Seed a row as-is, assigning it the next id
    pub fn insert(&self, mut record: AttendanceRecord) -> AttendanceRecord {
        let mut tables = self.tables();
        record.id = tables.next_id();
        tables.records.push(record.clone());
        record
    }

    pub fn records(&self) -> Vec<AttendanceRecord> {
        self.tables().records.clone()
    }

    pub fn backups(&self) -> Vec<AttendanceBackup> {
        self.tables().backups.clone()
    }
}

fn by_check_in(records: &mut [AttendanceRecord]) {
    records.sort_by(|a, b| {
        a.check_in_time
            .cmp(&b.check_in_time)
            .then(a.id.cmp(&b.id))
    });
}

#[async_trait]
impl AttendanceStore for MemoryAttendanceStore {
    async fn create(&self, new: NewAttendance) -> anyhow::Result<AttendanceRecord> {
        Ok(self.insert(AttendanceRecord {
            id: 0,
            employee_id: new.employee_id,
            date: new.date,
            check_in_time: new.check_in_time,
            check_out_time: None,
            year: new.year,
            status: None,
        }))
    }

    async fn latest_open(&self, employee_id: u64) -> anyhow::Result<Option<AttendanceRecord>> {
        Ok(self
            .tables()
            .records
            .iter()
            .filter(|r| r.employee_id == employee_id && r.is_open())
            .max_by(|a, b| {
                a.check_in_time
                    .cmp(&b.check_in_time)
                    .then(a.id.cmp(&b.id))
            })
            .cloned())
    }

    async fn close(&self, id: u64, at: DateTime<Utc>) -> anyhow::Result<AttendanceRecord> {
        let mut tables = self.tables();
        let record = tables
            .records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| anyhow::anyhow!("attendance record {id} not found"))?;
        if record.is_open() {
            record.check_out_time = Some(at);
        }
        Ok(record.clone())
    }

    async fn for_employee_on(
        &self,
        employee_id: u64,
        day: NaiveDate,
    ) -> anyhow::Result<Vec<AttendanceRecord>> {
        let mut found: Vec<_> = self
            .tables()
            .records
            .iter()
            .filter(|r| r.employee_id == employee_id && r.date == day)
            .cloned()
            .collect();
        by_check_in(&mut found);
        Ok(found)
    }

    async fn all_on(&self, day: NaiveDate) -> anyhow::Result<Vec<AttendanceSummary>> {
        let mut found: Vec<_> = self
            .tables()
            .records
            .iter()
            .filter(|r| r.date == day)
            .cloned()
            .collect();
        by_check_in(&mut found);
        Ok(found.iter().map(AttendanceSummary::from).collect())
    }

    async fn for_year(&self, year: i32) -> anyhow::Result<Vec<AttendanceRecord>> {
        Ok(self
            .tables()
            .records
            .iter()
            .filter(|r| r.year == year)
            .cloned()
            .collect())
    }

    async fn record_backup(
        &self,
        year: i32,
        file_url: String,
        created_at: DateTime<Utc>,
    ) -> anyhow::Result<AttendanceBackup> {
        let mut tables = self.tables();
        let backup = AttendanceBackup {
            id: tables.next_id(),
            year,
            file_url,
            created_at,
        };
        tables.backups.push(backup.clone());
        Ok(backup)
    }
}
