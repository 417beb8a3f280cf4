use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::{Event, EventStatus, ParticipationTier, RoleRequirement},
    error::{AppError, Result},
    repository::EventRepository,
};

#[derive(FromRow)]
pub(crate) struct EventRow {
    pub id: String,
    pub booking_id: String,
    pub title: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub status: String,
    pub genre: Option<String>,
    pub theme: Option<String>,
    pub description: String,
    pub participation_tier: Option<String>,
    pub created_at: NaiveDateTime,
}

pub(crate) const EVENT_COLUMNS: &str = "id, booking_id, title, start_date, end_date, \
     start_time, end_time, status, genre, theme, description, participation_tier, created_at";

pub(crate) fn row_to_event(row: EventRow) -> Result<Event> {
    let status = EventStatus::parse(&row.status)
        .ok_or_else(|| AppError::Database(format!("Invalid event status: {}", row.status)))?;
    let participation_tier = row
        .participation_tier
        .map(|t| {
            ParticipationTier::parse(&t)
                .ok_or_else(|| AppError::Database(format!("Invalid participation tier: {}", t)))
        })
        .transpose()?;

    Ok(Event {
        id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
        booking_id: Uuid::parse_str(&row.booking_id)
            .map_err(|e| AppError::Database(e.to_string()))?,
        title: row.title,
        start_date: row.start_date,
        end_date: row.end_date,
        start_time: row.start_time,
        end_time: row.end_time,
        status,
        genre: row.genre,
        theme: row.theme,
        description: row.description,
        participation_tier,
        created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
    })
}

#[derive(FromRow)]
struct RequirementRow {
    event_id: String,
    guitarist: i64,
    vocalist: i64,
    bassist: i64,
    keyboardist: i64,
    percussionist: i64,
}

pub struct SqliteEventRepository {
    pool: SqlitePool,
}

impl SqliteEventRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventRepository for SqliteEventRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Event>> {
        let id_str = id.to_string();
        let row = sqlx::query_as::<_, EventRow>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE id = ?"
        ))
        .bind(id_str)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(row_to_event(r)?)),
            None => Ok(None),
        }
    }

    async fn list_by_status(&self, status: EventStatus) -> Result<Vec<Event>> {
        let rows = sqlx::query_as::<_, EventRow>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE status = ? ORDER BY start_date ASC"
        ))
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter().map(row_to_event).collect()
    }

    async fn list_past(&self, today: NaiveDate) -> Result<Vec<Event>> {
        let rows = sqlx::query_as::<_, EventRow>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE end_date < ? ORDER BY end_date DESC"
        ))
        .bind(today)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter().map(row_to_event).collect()
    }

    async fn list_open(&self) -> Result<Vec<Event>> {
        let rows = sqlx::query_as::<_, EventRow>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events \
             WHERE status IN ('Accepted', 'Ongoing') ORDER BY start_date ASC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter().map(row_to_event).collect()
    }

    async fn update_status(
        &self,
        id: Uuid,
        from: EventStatus,
        to: EventStatus,
        tier: Option<ParticipationTier>,
    ) -> Result<bool> {
        let id_str = id.to_string();
        let tier_str = tier.map(|t| t.as_str());

        // The WHERE clause on the current status is the serialization
        // point: of two concurrent transitions only one finds the row.
        let result = sqlx::query(
            r#"
            UPDATE events
            SET status = ?, participation_tier = COALESCE(?, participation_tier)
            WHERE id = ? AND status = ?
            "#,
        )
        .bind(to.as_str())
        .bind(tier_str)
        .bind(&id_str)
        .bind(from.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    async fn requirement(&self, event_id: Uuid) -> Result<Option<RoleRequirement>> {
        let event_id_str = event_id.to_string();
        let row = sqlx::query_as::<_, RequirementRow>(
            r#"
            SELECT event_id, guitarist, vocalist, bassist, keyboardist, percussionist
            FROM role_requirements
            WHERE event_id = ?
            "#,
        )
        .bind(event_id_str)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(RoleRequirement {
                event_id: Uuid::parse_str(&r.event_id)
                    .map_err(|e| AppError::Database(e.to_string()))?,
                guitarist: r.guitarist,
                vocalist: r.vocalist,
                bassist: r.bassist,
                keyboardist: r.keyboardist,
                percussionist: r.percussionist,
            })),
            None => Ok(None),
        }
    }
}
