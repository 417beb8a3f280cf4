use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::{Notification, NotificationKind},
    error::{AppError, Result},
    repository::NotificationRepository,
};

#[derive(FromRow)]
struct NotificationRow {
    id: String,
    event_id: Option<String>,
    member_id: Option<String>,
    kind: String,
    content: String,
    sent_at: NaiveDateTime,
}

fn row_to_notification(row: NotificationRow) -> Result<Notification> {
    let kind = NotificationKind::parse(&row.kind)
        .ok_or_else(|| AppError::Database(format!("Invalid notification kind: {}", row.kind)))?;
    let event_id = row
        .event_id
        .as_deref()
        .map(Uuid::parse_str)
        .transpose()
        .map_err(|e| AppError::Database(e.to_string()))?;
    let member_id = row
        .member_id
        .as_deref()
        .map(Uuid::parse_str)
        .transpose()
        .map_err(|e| AppError::Database(e.to_string()))?;

    Ok(Notification {
        id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
        event_id,
        member_id,
        kind,
        content: row.content,
        sent_at: DateTime::from_naive_utc_and_offset(row.sent_at, Utc),
    })
}

pub struct SqliteNotificationRepository {
    pool: SqlitePool,
}

impl SqliteNotificationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationRepository for SqliteNotificationRepository {
    async fn record(
        &self,
        event_id: Option<Uuid>,
        member_id: Option<Uuid>,
        kind: NotificationKind,
        content: &str,
    ) -> Result<Notification> {
        let id = Uuid::new_v4();
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            INSERT INTO notifications (id, event_id, member_id, kind, content, sent_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id.to_string())
        .bind(event_id.map(|v| v.to_string()))
        .bind(member_id.map(|v| v.to_string()))
        .bind(kind.as_str())
        .bind(content)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(Notification {
            id,
            event_id,
            member_id,
            kind,
            content: content.to_string(),
            sent_at: DateTime::from_naive_utc_and_offset(now, Utc),
        })
    }

    async fn record_once(
        &self,
        event_id: Uuid,
        kind: NotificationKind,
        content: &str,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO notifications (id, event_id, member_id, kind, content, sent_at)
            VALUES (?, ?, NULL, ?, ?, ?)
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(event_id.to_string())
        .bind(kind.as_str())
        .bind(content)
        .bind(Utc::now().naive_utc())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(true),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => Ok(false),
            Err(e) => Err(AppError::Database(e.to_string())),
        }
    }

    async fn exists_for_event(&self, event_id: Uuid, kind: NotificationKind) -> Result<bool> {
        let row: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM notifications WHERE event_id = ? AND kind = ?",
        )
        .bind(event_id.to_string())
        .bind(kind.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(row.0 > 0)
    }

    async fn list_recent(&self, limit: i64) -> Result<Vec<Notification>> {
        let rows = sqlx::query_as::<_, NotificationRow>(
            r#"
            SELECT id, event_id, member_id, kind, content, sent_at
            FROM notifications
            ORDER BY sent_at DESC
            LIMIT ?
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter().map(row_to_notification).collect()
    }
}
