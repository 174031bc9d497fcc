//! Schema bootstrap for the recruitment post table.

use sqlx::PgPool;

const CREATE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS recruitment_posts (
    id SERIAL PRIMARY KEY,
    guild_id BIGINT NOT NULL,
    name TEXT NOT NULL,
    title TEXT NOT NULL,
    details TEXT NOT NULL,
    image_url TEXT,
    buttons JSONB,
    UNIQUE(guild_id, name)
)
"#;

/// Columns added after the first schema version
const UPGRADES: &[&str] = &[
    "ALTER TABLE recruitment_posts ADD COLUMN IF NOT EXISTS ping_role TEXT",
    "ALTER TABLE recruitment_posts ADD COLUMN IF NOT EXISTS color TEXT",
];

/// Create the table if missing and bring older tables up to date.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(CREATE_TABLE).execute(pool).await?;

    for statement in UPGRADES {
        sqlx::query(statement).execute(pool).await?;
    }

    tracing::info!("recruitment_posts table verified");
    Ok(())
}
