use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::{MusicianRole, ParticipationRecord, ParticipationStatus},
    error::{AppError, Result},
    repository::ParticipationRepository,
};

/// Outcome of the conditional join insert.
#[derive(Debug)]
pub enum JoinOutcome {
    Inserted(ParticipationRecord),
    /// The active count for (event, role) was already at the requirement.
    RoleFull,
    /// A record for (event, member, role) already exists.
    Duplicate,
}

#[derive(FromRow)]
struct ParticipationRow {
    id: String,
    event_id: String,
    member_id: String,
    role: String,
    status: String,
    joined_at: NaiveDateTime,
}

fn row_to_record(row: ParticipationRow) -> Result<ParticipationRecord> {
    let role = MusicianRole::parse(&row.role)
        .ok_or_else(|| AppError::Database(format!("Invalid musician role: {}", row.role)))?;
    let status = ParticipationStatus::parse(&row.status).ok_or_else(|| {
        AppError::Database(format!("Invalid participation status: {}", row.status))
    })?;

    Ok(ParticipationRecord {
        id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
        event_id: Uuid::parse_str(&row.event_id).map_err(|e| AppError::Database(e.to_string()))?,
        member_id: Uuid::parse_str(&row.member_id)
            .map_err(|e| AppError::Database(e.to_string()))?,
        role,
        status,
        joined_at: DateTime::from_naive_utc_and_offset(row.joined_at, Utc),
    })
}

pub struct SqliteParticipationRepository {
    pool: SqlitePool,
}

impl SqliteParticipationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ParticipationRepository for SqliteParticipationRepository {
    async fn try_insert(
        &self,
        event_id: Uuid,
        member_id: Uuid,
        role: MusicianRole,
        required: i64,
    ) -> Result<JoinOutcome> {
        let id = Uuid::new_v4();
        let event_id_str = event_id.to_string();
        let member_id_str = member_id.to_string();
        let now = Utc::now().naive_utc();

        // Single statement: the capacity re-check and the insert execute
        // atomically, so two racing joins cannot both observe a free slot.
        // A concurrent duplicate trips the unique index instead.
        let result = sqlx::query(
            r#"
            INSERT INTO participation (id, event_id, member_id, role, status, joined_at)
            SELECT ?, ?, ?, ?, 'Pending', ?
            WHERE (
                SELECT COUNT(*) FROM participation
                WHERE event_id = ? AND role = ? AND status IN ('Pending', 'Confirmed')
            ) < ?
            "#,
        )
        .bind(id.to_string())
        .bind(&event_id_str)
        .bind(&member_id_str)
        .bind(role.as_str())
        .bind(now)
        .bind(&event_id_str)
        .bind(role.as_str())
        .bind(required)
        .execute(&self.pool)
        .await;

        match result {
            Ok(done) if done.rows_affected() == 0 => Ok(JoinOutcome::RoleFull),
            Ok(_) => Ok(JoinOutcome::Inserted(ParticipationRecord {
                id,
                event_id,
                member_id,
                role,
                status: ParticipationStatus::Pending,
                joined_at: DateTime::from_naive_utc_and_offset(now, Utc),
            })),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Ok(JoinOutcome::Duplicate)
            }
            Err(e) => Err(AppError::Database(e.to_string())),
        }
    }

    async fn active_count(&self, event_id: Uuid, role: MusicianRole) -> Result<i64> {
        let row: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM participation
            WHERE event_id = ? AND role = ? AND status IN ('Pending', 'Confirmed')
            "#,
        )
        .bind(event_id.to_string())
        .bind(role.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(row.0)
    }

    async fn exists(&self, event_id: Uuid, member_id: Uuid, role: MusicianRole) -> Result<bool> {
        let row: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM participation
            WHERE event_id = ? AND member_id = ? AND role = ?
            "#,
        )
        .bind(event_id.to_string())
        .bind(member_id.to_string())
        .bind(role.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(row.0 > 0)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ParticipationRecord>> {
        let row = sqlx::query_as::<_, ParticipationRow>(
            r#"
            SELECT id, event_id, member_id, role, status, joined_at
            FROM participation
            WHERE id = ?
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(row_to_record(r)?)),
            None => Ok(None),
        }
    }

    async fn list_for_event(&self, event_id: Uuid) -> Result<Vec<ParticipationRecord>> {
        let rows = sqlx::query_as::<_, ParticipationRow>(
            r#"
            SELECT id, event_id, member_id, role, status, joined_at
            FROM participation
            WHERE event_id = ?
            ORDER BY joined_at ASC
            "#,
        )
        .bind(event_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter().map(row_to_record).collect()
    }

    async fn list_for_member(&self, member_id: Uuid) -> Result<Vec<ParticipationRecord>> {
        let rows = sqlx::query_as::<_, ParticipationRow>(
            r#"
            SELECT id, event_id, member_id, role, status, joined_at
            FROM participation
            WHERE member_id = ?
            ORDER BY joined_at ASC
            "#,
        )
        .bind(member_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter().map(row_to_record).collect()
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: ParticipationStatus,
    ) -> Result<ParticipationRecord> {
        let id_str = id.to_string();
        sqlx::query("UPDATE participation SET status = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(&id_str)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::NotFound("Participation record not found".to_string())
        })
    }

    async fn try_activate(
        &self,
        id: Uuid,
        status: ParticipationStatus,
        required: i64,
    ) -> Result<Option<ParticipationRecord>> {
        // Same shape as try_insert: the capacity check rides inside the
        // statement, so a racing join cannot slip between check and write.
        // The record's own row is excluded from the count; it holds no
        // slot while inactive.
        let done = sqlx::query(
            r#"
            UPDATE participation SET status = ?
            WHERE id = ?
            AND (
                SELECT COUNT(*) FROM participation AS p
                WHERE p.event_id = participation.event_id
                  AND p.role = participation.role
                  AND p.id != participation.id
                  AND p.status IN ('Pending', 'Confirmed')
            ) < ?
            "#,
        )
        .bind(status.as_str())
        .bind(id.to_string())
        .bind(required)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        if done.rows_affected() == 0 {
            return Ok(None);
        }

        self.find_by_id(id).await
    }
}
