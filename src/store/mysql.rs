use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::MySqlPool;

use super::AttendanceStore;
use crate::model::attendance::{
    AttendanceBackup, AttendanceRecord, AttendanceSummary, NewAttendance,
};

#[derive(Clone)]
pub struct MySqlAttendanceStore {
    pool: MySqlPool,
}

impl MySqlAttendanceStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    async fn record_by_id(&self, id: u64) -> anyhow::Result<AttendanceRecord> {
        sqlx::query_as::<_, AttendanceRecord>(
            r#"
            SELECT id, employee_id, date, check_in_time, check_out_time, year, status
            FROM attendance
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .with_context(|| format!("failed to load attendance record {id}"))
    }
}

#[async_trait]
impl AttendanceStore for MySqlAttendanceStore {
    async fn create(&self, new: NewAttendance) -> anyhow::Result<AttendanceRecord> {
        let result = sqlx::query(
            r#"
            INSERT INTO attendance (employee_id, date, check_in_time, year)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(new.employee_id)
        .bind(new.date)
        .bind(new.check_in_time)
        .bind(new.year)
        .execute(&self.pool)
        .await
        .context("failed to insert attendance record")?;

        self.record_by_id(result.last_insert_id()).await
    }

    async fn latest_open(&self, employee_id: u64) -> anyhow::Result<Option<AttendanceRecord>> {
        sqlx::query_as::<_, AttendanceRecord>(
            r#"
            SELECT id, employee_id, date, check_in_time, check_out_time, year, status
            FROM attendance
            WHERE employee_id = ?
            AND check_out_time IS NULL
            ORDER BY check_in_time DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(employee_id)
        .fetch_optional(&self.pool)
        .await
        .context("failed to look up open attendance record")
    }

    async fn close(&self, id: u64, at: DateTime<Utc>) -> anyhow::Result<AttendanceRecord> {
        // A concurrent checkout that got here first keeps its timestamp
        sqlx::query(
            r#"
            UPDATE attendance
            SET check_out_time = ?
            WHERE id = ?
            AND check_out_time IS NULL
            "#,
        )
        .bind(at)
        .bind(id)
        .execute(&self.pool)
        .await
        .with_context(|| format!("failed to close attendance record {id}"))?;

        self.record_by_id(id).await
    }

    async fn for_employee_on(
        &self,
        employee_id: u64,
        day: NaiveDate,
    ) -> anyhow::Result<Vec<AttendanceRecord>> {
        sqlx::query_as::<_, AttendanceRecord>(
            r#"
            SELECT id, employee_id, date, check_in_time, check_out_time, year, status
            FROM attendance
            WHERE employee_id = ?
            AND date BETWEEN ? AND ?
            ORDER BY check_in_time ASC, id ASC
            "#,
        )
        .bind(employee_id)
        .bind(day)
        .bind(day)
        .fetch_all(&self.pool)
        .await
        .context("failed to fetch attendance for employee")
    }

    async fn all_on(&self, day: NaiveDate) -> anyhow::Result<Vec<AttendanceSummary>> {
        sqlx::query_as::<_, AttendanceSummary>(
            r#"
            SELECT employee_id, date, check_in_time, check_out_time, status
            FROM attendance
            WHERE date BETWEEN ? AND ?
            ORDER BY check_in_time ASC, id ASC
            "#,
        )
        .bind(day)
        .bind(day)
        .fetch_all(&self.pool)
        .await
        .context("failed to fetch attendance for all employees")
    }

    async fn for_year(&self, year: i32) -> anyhow::Result<Vec<AttendanceRecord>> {
        sqlx::query_as::<_, AttendanceRecord>(
            r#"
            SELECT id, employee_id, date, check_in_time, check_out_time, year, status
            FROM attendance
            WHERE year = ?
            ORDER BY id ASC
            "#,
        )
        .bind(year)
        .fetch_all(&self.pool)
        .await
        .with_context(|| format!("failed to fetch attendance for {year}"))
    }

    async fn record_backup(
        &self,
        year: i32,
        file_url: String,
        created_at: DateTime<Utc>,
    ) -> anyhow::Result<AttendanceBackup> {
        let result = sqlx::query(
            r#"
            INSERT INTO attendance_backups (year, file_url, created_at)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(year)
        .bind(&file_url)
        .bind(created_at)
        .execute(&self.pool)
        .await
        .context("failed to insert attendance backup")?;

        Ok(AttendanceBackup {
            id: result.last_insert_id(),
            year,
            file_url,
            created_at,
        })
    }
}

// Run with `DATABASE_URL=mysql://... cargo test -- --ignored`; each test gets a
// fresh database with the migrations applied.
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn new_attendance(employee_id: u64, at: DateTime<Utc>) -> NewAttendance {
        NewAttendance {
            employee_id,
            date: at.date_naive(),
            check_in_time: at,
            year: 2026,
        }
    }

    fn at(d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, d, h, 0, 0).unwrap()
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "needs a MySQL server in DATABASE_URL"]
    async fn latest_open_prefers_newest_row_on_equal_times(pool: MySqlPool) {
        let store = MySqlAttendanceStore::new(pool);
        let first = store.create(new_attendance(1, at(15, 9))).await.unwrap();
        let second = store.create(new_attendance(1, at(15, 9))).await.unwrap();
        store.create(new_attendance(2, at(15, 10))).await.unwrap();

        let open = store.latest_open(1).await.unwrap().unwrap();
        assert_eq!(open.id, second.id);

        store.close(second.id, at(15, 17)).await.unwrap();
        assert_eq!(store.latest_open(1).await.unwrap().unwrap().id, first.id);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "needs a MySQL server in DATABASE_URL"]
    async fn close_keeps_the_first_check_out_time(pool: MySqlPool) {
        let store = MySqlAttendanceStore::new(pool);
        let record = store.create(new_attendance(1, at(15, 9))).await.unwrap();

        store.close(record.id, at(15, 17)).await.unwrap();
        let again = store.close(record.id, at(15, 18)).await.unwrap();

        assert_eq!(again.check_out_time, Some(at(15, 17)));
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "needs a MySQL server in DATABASE_URL"]
    async fn day_queries_stay_inside_the_day(pool: MySqlPool) {
        let store = MySqlAttendanceStore::new(pool);
        store.create(new_attendance(1, at(14, 23))).await.unwrap();
        let late = store.create(new_attendance(1, at(15, 20))).await.unwrap();
        let early = store.create(new_attendance(1, at(15, 8))).await.unwrap();
        store.create(new_attendance(2, at(15, 12))).await.unwrap();
        store.create(new_attendance(1, at(16, 0))).await.unwrap();

        let day = at(15, 0).date_naive();
        let ids: Vec<_> = store
            .for_employee_on(1, day)
            .await
            .unwrap()
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![early.id, late.id]);

        let employees: Vec<_> = store
            .all_on(day)
            .await
            .unwrap()
            .iter()
            .map(|r| r.employee_id)
            .collect();
        assert_eq!(employees, vec![1, 2, 1]);
    }
}
