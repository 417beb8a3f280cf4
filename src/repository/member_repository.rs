use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::{CreateMemberRequest, Member, MemberStatus, MusicianRole, UpdateMemberRequest},
    error::{AppError, Result},
    repository::MemberRepository,
};

#[derive(FromRow)]
struct MemberRow {
    id: String,
    name: String,
    email: String,
    mobile: Option<String>,
    capabilities: String,
    genres: String,
    status: String,
    bio: Option<String>,
    profile_image: Option<String>,
    created_at: NaiveDateTime,
}

// Capabilities and genres live as JSON arrays in a TEXT column. This is
// the only place they are parsed or serialized.
fn parse_capabilities(s: &str) -> Result<Vec<MusicianRole>> {
    let tags: Vec<String> =
        serde_json::from_str(s).map_err(|e| AppError::Database(e.to_string()))?;
    tags.iter()
        .map(|tag| {
            MusicianRole::parse(tag)
                .ok_or_else(|| AppError::Database(format!("Invalid musician role: {}", tag)))
        })
        .collect()
}

fn capabilities_to_json(capabilities: &[MusicianRole]) -> String {
    let tags: Vec<&str> = capabilities.iter().map(|r| r.as_str()).collect();
    serde_json::to_string(&tags).unwrap_or_else(|_| "[]".to_string())
}

fn row_to_member(row: MemberRow) -> Result<Member> {
    let status = MemberStatus::parse(&row.status)
        .ok_or_else(|| AppError::Database(format!("Invalid member status: {}", row.status)))?;
    let genres: Vec<String> =
        serde_json::from_str(&row.genres).map_err(|e| AppError::Database(e.to_string()))?;

    Ok(Member {
        id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
        name: row.name,
        email: row.email,
        mobile: row.mobile,
        capabilities: parse_capabilities(&row.capabilities)?,
        genres,
        status,
        bio: row.bio,
        profile_image: row.profile_image,
        created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
    })
}

const MEMBER_COLUMNS: &str =
    "id, name, email, mobile, capabilities, genres, status, bio, profile_image, created_at";

pub struct SqliteMemberRepository {
    pool: SqlitePool,
}

impl SqliteMemberRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MemberRepository for SqliteMemberRepository {
    async fn create(&self, member: CreateMemberRequest) -> Result<Member> {
        let id = Uuid::new_v4();
        let now = Utc::now().naive_utc();
        let capabilities_json = capabilities_to_json(&member.capabilities);
        let genres_json =
            serde_json::to_string(&member.genres).unwrap_or_else(|_| "[]".to_string());

        sqlx::query(
            r#"
            INSERT INTO members (id, name, email, mobile, capabilities, genres, status, created_at)
            VALUES (?, ?, ?, ?, ?, ?, 'Active', ?)
            "#,
        )
        .bind(id.to_string())
        .bind(&member.name)
        .bind(&member.email)
        .bind(&member.mobile)
        .bind(&capabilities_json)
        .bind(&genres_json)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Database("Failed to retrieve created member".to_string()))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Member>> {
        let row = sqlx::query_as::<_, MemberRow>(&format!(
            "SELECT {MEMBER_COLUMNS} FROM members WHERE id = ?"
        ))
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(row_to_member(r)?)),
            None => Ok(None),
        }
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Member>> {
        let row = sqlx::query_as::<_, MemberRow>(&format!(
            "SELECT {MEMBER_COLUMNS} FROM members WHERE email = ?"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(row_to_member(r)?)),
            None => Ok(None),
        }
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Member>> {
        let rows = sqlx::query_as::<_, MemberRow>(&format!(
            "SELECT {MEMBER_COLUMNS} FROM members ORDER BY name ASC LIMIT ? OFFSET ?"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter().map(row_to_member).collect()
    }

    async fn update(&self, id: Uuid, update: UpdateMemberRequest) -> Result<Member> {
        let current = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Member not found".to_string()))?;

        let name = update.name.unwrap_or(current.name);
        let mobile = update.mobile.or(current.mobile);
        let capabilities = update.capabilities.unwrap_or(current.capabilities);
        let genres = update.genres.unwrap_or(current.genres);
        let status = update.status.unwrap_or(current.status);
        let bio = update.bio.or(current.bio);
        let profile_image = update.profile_image.or(current.profile_image);

        sqlx::query(
            r#"
            UPDATE members
            SET name = ?, mobile = ?, capabilities = ?, genres = ?,
                status = ?, bio = ?, profile_image = ?
            WHERE id = ?
            "#,
        )
        .bind(&name)
        .bind(&mobile)
        .bind(capabilities_to_json(&capabilities))
        .bind(serde_json::to_string(&genres).unwrap_or_else(|_| "[]".to_string()))
        .bind(status.as_str())
        .bind(&bio)
        .bind(&profile_image)
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Database("Failed to retrieve updated member".to_string()))
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM members WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }
}
