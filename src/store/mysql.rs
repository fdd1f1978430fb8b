use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, MySqlPool};
use uuid::Uuid;

use super::AttendanceStore;
use crate::error::StoreError;
use crate::model::attendance::{ArchivedAttendanceEvent, AttendanceEvent};
use crate::model::configuration::Configuration;
use crate::model::report::Report;
use crate::model::shift::Shift;
use crate::reconcile::calendar::DayBounds;

/// Id of the singleton row in `configuracion`.
const CONFIGURATION_ID: &str = "general";

#[derive(FromRow)]
struct ConfigurationRow {
    active_block_type: Option<String>,
}

#[derive(FromRow)]
struct ShiftRow {
    id: String,
    account_number: String,
    name: String,
    block_type: String,
    weekdays: Json<Vec<String>>,
    start_time: String,
    end_time: String,
}

impl From<ShiftRow> for Shift {
    fn from(row: ShiftRow) -> Self {
        Shift {
            id: row.id,
            account_number: row.account_number,
            name: row.name,
            block_type: row.block_type,
            weekdays: row.weekdays.0,
            start_time: row.start_time,
            end_time: row.end_time,
        }
    }
}

#[derive(FromRow)]
struct AttendanceRow {
    id: String,
    account_number: String,
    name: String,
    block_type: String,
    recorded_at: DateTime<Utc>,
    rounded_check_in: Option<String>,
    rounded_check_out: Option<String>,
    worked_hours: Option<f64>,
}

impl From<AttendanceRow> for AttendanceEvent {
    fn from(row: AttendanceRow) -> Self {
        AttendanceEvent {
            id: row.id,
            account_number: row.account_number,
            name: row.name,
            block_type: row.block_type,
            recorded_at: row.recorded_at,
            rounded_check_in: row.rounded_check_in,
            rounded_check_out: row.rounded_check_out,
            worked_hours: row.worked_hours,
        }
    }
}

/// `AttendanceStore` over the SICA MySQL schema (see `migrations/`).
#[derive(Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AttendanceStore for MySqlStore {
    async fn fetch_configuration(&self) -> Result<Option<Configuration>, StoreError> {
        let row = sqlx::query_as::<_, ConfigurationRow>(
            r#"
            SELECT active_block_type
            FROM configuracion
            WHERE id = ?
            "#,
        )
        .bind(CONFIGURATION_ID)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| Configuration {
            active_block_type: r.active_block_type,
        }))
    }

    async fn shifts_for(
        &self,
        block_type: &str,
        weekday: &str,
    ) -> Result<Vec<Shift>, StoreError> {
        let rows = sqlx::query_as::<_, ShiftRow>(
            r#"
            SELECT id, account_number, name, block_type, weekdays, start_time, end_time
            FROM horarios
            WHERE block_type = ?
            AND JSON_CONTAINS(weekdays, JSON_QUOTE(?))
            ORDER BY account_number, start_time
            "#,
        )
        .bind(block_type)
        .bind(weekday)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Shift::from).collect())
    }

    async fn find_attendance(
        &self,
        account_number: &str,
        block_type: &str,
        bounds: DayBounds,
    ) -> Result<Option<AttendanceEvent>, StoreError> {
        let row = sqlx::query_as::<_, AttendanceRow>(
            r#"
            SELECT id, account_number, name, block_type, recorded_at,
                   rounded_check_in, rounded_check_out, worked_hours
            FROM asistencias_semana
            WHERE account_number = ?
            AND block_type = ?
            AND recorded_at >= ?
            AND recorded_at < ?
            LIMIT 1
            "#,
        )
        .bind(account_number)
        .bind(block_type)
        .bind(bounds.start)
        .bind(bounds.end)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(AttendanceEvent::from))
    }

    async fn insert_reports(&self, reports: &[Report]) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        for report in reports {
            sqlx::query(
                r#"
                INSERT INTO reportes_asesores
                    (id, name, account_number, date, check_in, check_out,
                     worked_time, observations, block_type, status, created_at)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&report.name)
            .bind(&report.account_number)
            .bind(report.date)
            .bind(&report.check_in)
            .bind(&report.check_out)
            .bind(&report.worked_time)
            .bind(&report.observations)
            .bind(&report.block_type)
            .bind(report.status.to_string())
            .bind(report.created_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        log::info!("Committed {} reports", reports.len());
        Ok(())
    }

    async fn archive_events(
        &self,
        archived: &[ArchivedAttendanceEvent],
    ) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        for entry in archived {
            let event = &entry.event;
            sqlx::query(
                r#"
                INSERT INTO asistencias_revisadas
                    (id, original_id, account_number, name, block_type, recorded_at,
                     rounded_check_in, rounded_check_out, worked_hours, processed_at)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&entry.original_id)
            .bind(&event.account_number)
            .bind(&event.name)
            .bind(&event.block_type)
            .bind(event.recorded_at)
            .bind(&event.rounded_check_in)
            .bind(&event.rounded_check_out)
            .bind(event.worked_hours)
            .bind(entry.processed_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        log::info!("Archived {} attendance records", archived.len());
        Ok(())
    }

    async fn delete_events(&self, ids: &[String]) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        for id in ids {
            sqlx::query("DELETE FROM asistencias_semana WHERE id = ?")
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        log::info!("Removed {} reconciled attendance records", ids.len());
        Ok(())
    }
}
