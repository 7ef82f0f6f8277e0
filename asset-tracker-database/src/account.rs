use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::{postgres::PgPool, FromRow};

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Account {
    pub id: i32,
    pub account_name: String,      // 账户名称
    pub start_date: NaiveDate,     // 开始日期
    pub created_at: DateTime<Utc>, // 创建时间
}

pub async fn create(db: &PgPool, account_name: &str, start_date: NaiveDate) -> Result<Account> {
    let account = sqlx::query_as::<_, Account>(
        r#"
        INSERT INTO accounts (account_name, start_date, created_at)
        VALUES ($1, $2, NOW())
        RETURNING *
        "#,
    )
    .bind(account_name)
    .bind(start_date)
    .fetch_one(db)
    .await?;

    Ok(account)
}

// 关联用户与账户
pub async fn link_user(db: &PgPool, user_id: i32, account_id: i32) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO user_accounts (user_id, account_id)
        VALUES ($1, $2)
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(user_id)
    .bind(account_id)
    .execute(db)
    .await?;

    Ok(())
}

pub async fn list_by_user(db: &PgPool, user_id: i32) -> Result<Vec<Account>> {
    let accounts = sqlx::query_as::<_, Account>(
        r#"
        SELECT a.* FROM accounts a
            JOIN user_accounts ua ON ua.account_id = a.id
            WHERE ua.user_id = $1
            ORDER BY a.id ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await?;

    Ok(accounts)
}
