use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{postgres::PgPool, FromRow};

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: i32,
    pub name: String,
    #[serde(skip)]
    pub login_token_hash: String, // 登录令牌的 SHA-256
    pub created_at: DateTime<Utc>,
}

pub async fn create(db: &PgPool, name: &str, login_token_hash: &str) -> Result<User> {
    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (name, login_token_hash, created_at)
        VALUES ($1, $2, NOW())
        RETURNING *
        "#,
    )
    .bind(name)
    .bind(login_token_hash)
    .fetch_one(db)
    .await?;

    Ok(user)
}

pub async fn find_by_login_token_hash(db: &PgPool, login_token_hash: &str) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT * FROM users WHERE login_token_hash = $1
        "#,
    )
    .bind(login_token_hash)
    .fetch_optional(db)
    .await?;

    Ok(user)
}
