//! Booking history persistence
//!
//! Append-only local record of confirmed bookings. Rows are created once
//! on successful submission, only their status ever changes, and this
//! subsystem never deletes them.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use tracing::info;

use crate::booking::{Booking, BookingStatus};
use crate::cart::ServiceSelection;
use crate::error::{Error, Result};

/// Store for the append-only booking history
#[derive(Debug, Clone)]
pub struct BookingHistoryStore {
    pool: SqlitePool,
}

#[derive(Debug, FromRow)]
struct BookingRow {
    id: String,
    salon_id: String,
    salon_name: String,
    services: String,
    date: String,
    time: String,
    status: String,
    created_at: String,
}

impl BookingRow {
    fn into_booking(self) -> Result<Booking> {
        let services: Vec<ServiceSelection> = serde_json::from_str(&self.services)?;
        let created_at = DateTime::parse_from_rfc3339(&self.created_at)
            .map_err(|e| Error::InvalidInput(format!("Bad booking timestamp: {e}")))?
            .with_timezone(&Utc);

        Ok(Booking {
            id: self
                .id
                .parse()
                .map_err(|e| Error::InvalidInput(format!("Bad booking id: {e}")))?,
            salon_id: self.salon_id,
            salon_name: self.salon_name,
            services,
            date: self.date,
            time: self.time,
            status: BookingStatus::parse(&self.status)?,
            created_at,
        })
    }
}

impl BookingHistoryStore {
    /// Create a history store backed by the given pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Append a booking record
    pub async fn append(&self, booking: &Booking) -> Result<()> {
        let services_json = serde_json::to_string(&booking.services)?;

        sqlx::query(
            r#"
            INSERT INTO bookings (id, salon_id, salon_name, services, date, time, status, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(booking.id.to_string())
        .bind(&booking.salon_id)
        .bind(&booking.salon_name)
        .bind(&services_json)
        .bind(&booking.date)
        .bind(&booking.time)
        .bind(booking.status.as_str())
        .bind(booking.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        info!(booking_id = %booking.id, salon_id = %booking.salon_id, "Booking recorded");
        Ok(())
    }

    /// All bookings, newest first
    pub async fn list(&self) -> Result<Vec<Booking>> {
        let rows: Vec<BookingRow> =
            sqlx::query_as("SELECT * FROM bookings ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await?;

        rows.into_iter().map(BookingRow::into_booking).collect()
    }

    /// Look up one booking by id
    pub async fn get(&self, booking_id: &str) -> Result<Option<Booking>> {
        let row: Option<BookingRow> = sqlx::query_as("SELECT * FROM bookings WHERE id = ?")
            .bind(booking_id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(BookingRow::into_booking).transpose()
    }

    /// Transition a booking's status
    pub async fn update_status(&self, booking_id: &str, status: BookingStatus) -> Result<()> {
        let result = sqlx::query("UPDATE bookings SET status = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(booking_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::InvalidInput(format!(
                "No booking with id {booking_id}"
            )));
        }
        Ok(())
    }
}
