//! PostgreSQL-based recruitment post backend.
//!
//! Rows live in the `recruitment_posts` table (see `postgres::schema`),
//! with the link buttons kept as a JSONB array.

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;

use super::backend::{PostBackend, PostBackendError};
use super::types::{LinkButton, RecruitmentPost};

/// PostgreSQL-based post backend.
///
/// Every call runs a single statement on a connection borrowed from the
/// pool for the duration of that statement.
pub struct PostgresPostBackend {
    pool: PgPool,
}

impl PostgresPostBackend {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct PostRow {
    guild_id: i64,
    name: String,
    title: String,
    details: String,
    image_url: Option<String>,
    buttons: Option<Json<Vec<LinkButton>>>,
    ping_role: Option<String>,
    color: Option<String>,
}

impl From<PostRow> for RecruitmentPost {
    fn from(row: PostRow) -> Self {
        RecruitmentPost {
            guild_id: row.guild_id,
            name: row.name,
            title: row.title,
            details: row.details,
            image_url: row.image_url,
            buttons: row.buttons.map(|Json(buttons)| buttons).unwrap_or_default(),
            ping_role: row.ping_role,
            color: row.color,
        }
    }
}

/// Connection-level failures mean the store is unavailable rather than
/// that the statement itself failed.
fn classify(err: sqlx::Error) -> PostBackendError {
    match err {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            PostBackendError::Unavailable(err.to_string())
        }
        other => PostBackendError::Postgres(other),
    }
}

/// Escape LIKE wildcards so the needle matches literally.
fn escape_like(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len() + 2);
    for c in needle.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[async_trait]
impl PostBackend for PostgresPostBackend {
    fn backend_type(&self) -> &'static str {
        "postgres"
    }

    async fn get(
        &self,
        guild_id: i64,
        name: &str,
    ) -> Result<Option<RecruitmentPost>, PostBackendError> {
        let row: Option<PostRow> = sqlx::query_as(
            r#"
            SELECT guild_id, name, title, details, image_url, buttons, ping_role, color
            FROM recruitment_posts
            WHERE guild_id = $1 AND name = $2
            "#,
        )
        .bind(guild_id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(classify)?;

        Ok(row.map(RecruitmentPost::from))
    }

    async fn upsert(&self, post: &RecruitmentPost) -> Result<(), PostBackendError> {
        sqlx::query(
            r#"
            INSERT INTO recruitment_posts
                (guild_id, name, title, details, image_url, buttons, ping_role, color)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (guild_id, name) DO UPDATE SET
                title = EXCLUDED.title,
                details = EXCLUDED.details,
                image_url = EXCLUDED.image_url,
                buttons = EXCLUDED.buttons,
                ping_role = EXCLUDED.ping_role,
                color = EXCLUDED.color
            "#,
        )
        .bind(post.guild_id)
        .bind(&post.name)
        .bind(&post.title)
        .bind(&post.details)
        .bind(&post.image_url)
        .bind(Json(&post.buttons))
        .bind(&post.ping_role)
        .bind(&post.color)
        .execute(&self.pool)
        .await
        .map_err(classify)?;

        Ok(())
    }

    async fn replace(&self, post: &RecruitmentPost) -> Result<bool, PostBackendError> {
        let result = sqlx::query(
            r#"
            UPDATE recruitment_posts SET
                title = $3,
                details = $4,
                image_url = $5,
                buttons = $6,
                ping_role = $7,
                color = $8
            WHERE guild_id = $1 AND name = $2
            "#,
        )
        .bind(post.guild_id)
        .bind(&post.name)
        .bind(&post.title)
        .bind(&post.details)
        .bind(&post.image_url)
        .bind(Json(&post.buttons))
        .bind(&post.ping_role)
        .bind(&post.color)
        .execute(&self.pool)
        .await
        .map_err(classify)?;

        Ok(result.rows_affected() > 0)
    }

    async fn remove(&self, guild_id: i64, name: &str) -> Result<bool, PostBackendError> {
        let result = sqlx::query("DELETE FROM recruitment_posts WHERE guild_id = $1 AND name = $2")
            .bind(guild_id)
            .bind(name)
            .execute(&self.pool)
            .await
            .map_err(classify)?;

        Ok(result.rows_affected() > 0)
    }

    async fn names_matching(
        &self,
        guild_id: i64,
        needle: &str,
        limit: usize,
    ) -> Result<Vec<String>, PostBackendError> {
        let pattern = format!("%{}%", escape_like(needle));

        let names: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT name FROM recruitment_posts
            WHERE guild_id = $1 AND name ILIKE $2
            ORDER BY name
            LIMIT $3
            "#,
        )
        .bind(guild_id)
        .bind(pattern)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(classify)?;

        Ok(names)
    }
}
