use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::{Booking, BookingPatch, BookingView, EventCategory, NewBooking, RoleRequirement},
    error::{AppError, Result},
    repository::{
        event_repository::{row_to_event, EventRow, EVENT_COLUMNS},
        BookingRepository,
    },
};

#[derive(FromRow)]
struct BookingRow {
    id: String,
    organizer_first_name: String,
    organizer_last_name: String,
    organizer_email: String,
    event_location: String,
    category: String,
    organization_name: String,
    created_at: NaiveDateTime,
}

fn row_to_booking(row: BookingRow) -> Result<Booking> {
    let category = EventCategory::parse(&row.category)
        .ok_or_else(|| AppError::Database(format!("Invalid event category: {}", row.category)))?;

    Ok(Booking {
        id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
        organizer_first_name: row.organizer_first_name,
        organizer_last_name: row.organizer_last_name,
        organizer_email: row.organizer_email,
        event_location: row.event_location,
        category,
        organization_name: row.organization_name,
        created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
    })
}

pub struct SqliteBookingRepository {
    pool: SqlitePool,
}

impl SqliteBookingRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingRepository for SqliteBookingRepository {
    async fn create(&self, booking: NewBooking) -> Result<BookingView> {
        let booking_id = Uuid::new_v4();
        let event_id = Uuid::new_v4();
        let now = Utc::now().naive_utc();

        // Booking, event, and requirement land together or not at all.
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO bookings (
                id, organizer_first_name, organizer_last_name, organizer_email,
                event_location, category, organization_name, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(booking_id.to_string())
        .bind(&booking.organizer_first_name)
        .bind(&booking.organizer_last_name)
        .bind(&booking.organizer_email)
        .bind(&booking.event_location)
        .bind(booking.category.as_str())
        .bind(&booking.organization_name)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO events (
                id, booking_id, title, start_date, end_date, start_time, end_time,
                status, genre, theme, description, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, 'Pending', ?, ?, ?, ?)
            "#,
        )
        .bind(event_id.to_string())
        .bind(booking_id.to_string())
        .bind(&booking.title)
        .bind(booking.start_date)
        .bind(booking.end_date)
        .bind(booking.start_time)
        .bind(booking.end_time)
        .bind(&booking.genre)
        .bind(&booking.theme)
        .bind(&booking.description)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO role_requirements (
                event_id, guitarist, vocalist, bassist, keyboardist, percussionist
            ) VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(event_id.to_string())
        .bind(booking.roles.guitarist)
        .bind(booking.roles.vocalist)
        .bind(booking.roles.bassist)
        .bind(booking.roles.keyboardist)
        .bind(booking.roles.percussionist)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_view(booking_id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created booking".to_string())
        })
    }

    async fn update(&self, booking_id: Uuid, patch: BookingPatch) -> Result<BookingView> {
        let booking_id_str = booking_id.to_string();

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        sqlx::query(
            r#"
            UPDATE bookings
            SET organizer_first_name = ?, organizer_last_name = ?, organizer_email = ?,
                event_location = ?, category = ?, organization_name = ?
            WHERE id = ?
            "#,
        )
        .bind(&patch.organizer_first_name)
        .bind(&patch.organizer_last_name)
        .bind(&patch.organizer_email)
        .bind(&patch.event_location)
        .bind(patch.category.as_str())
        .bind(&patch.organization_name)
        .bind(&booking_id_str)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        sqlx::query(
            r#"
            UPDATE events
            SET title = ?, start_date = ?, end_date = ?, start_time = ?, end_time = ?,
                genre = ?, theme = ?, description = ?
            WHERE booking_id = ?
            "#,
        )
        .bind(&patch.title)
        .bind(patch.start_date)
        .bind(patch.end_date)
        .bind(patch.start_time)
        .bind(patch.end_time)
        .bind(&patch.genre)
        .bind(&patch.theme)
        .bind(&patch.description)
        .bind(&booking_id_str)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        sqlx::query(
            r#"
            UPDATE role_requirements
            SET guitarist = ?, vocalist = ?, bassist = ?, keyboardist = ?, percussionist = ?
            WHERE event_id = (SELECT id FROM events WHERE booking_id = ?)
            "#,
        )
        .bind(patch.roles.guitarist)
        .bind(patch.roles.vocalist)
        .bind(patch.roles.bassist)
        .bind(patch.roles.keyboardist)
        .bind(patch.roles.percussionist)
        .bind(&booking_id_str)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_view(booking_id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve updated booking".to_string())
        })
    }

    async fn find_view(&self, booking_id: Uuid) -> Result<Option<BookingView>> {
        let booking_id_str = booking_id.to_string();

        let booking_row = sqlx::query_as::<_, BookingRow>(
            r#"
            SELECT id, organizer_first_name, organizer_last_name, organizer_email,
                   event_location, category, organization_name, created_at
            FROM bookings
            WHERE id = ?
            "#,
        )
        .bind(&booking_id_str)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        let Some(booking_row) = booking_row else {
            return Ok(None);
        };
        let booking = row_to_booking(booking_row)?;

        let event_row = sqlx::query_as::<_, EventRow>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE booking_id = ?"
        ))
        .bind(&booking_id_str)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        let Some(event_row) = event_row else {
            return Ok(None);
        };
        let event = row_to_event(event_row)?;

        let requirement: RoleRequirement = {
            let row: Option<(i64, i64, i64, i64, i64)> = sqlx::query_as(
                r#"
                SELECT guitarist, vocalist, bassist, keyboardist, percussionist
                FROM role_requirements
                WHERE event_id = ?
                "#,
            )
            .bind(event.id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

            let Some((guitarist, vocalist, bassist, keyboardist, percussionist)) = row else {
                return Ok(None);
            };
            RoleRequirement {
                event_id: event.id,
                guitarist,
                vocalist,
                bassist,
                keyboardist,
                percussionist,
            }
        };

        Ok(Some(BookingView {
            booking,
            event,
            requirement,
        }))
    }

    async fn find_by_event(&self, event_id: Uuid) -> Result<Option<Booking>> {
        let event_id_str = event_id.to_string();
        let row = sqlx::query_as::<_, BookingRow>(
            r#"
            SELECT b.id, b.organizer_first_name, b.organizer_last_name, b.organizer_email,
                   b.event_location, b.category, b.organization_name, b.created_at
            FROM bookings b
            INNER JOIN events e ON e.booking_id = b.id
            WHERE e.id = ?
            "#,
        )
        .bind(event_id_str)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(row_to_booking(r)?)),
            None => Ok(None),
        }
    }
}
