use crate::HistoryQuery;
use anyhow::Result;
use bon::bon;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{postgres::PgPool, FromRow};

#[derive(Debug, Clone, Default, FromRow, Serialize)]
pub struct BalanceHistory {
    pub id: i32,                   // 主键ID
    pub account_id: i32,           // 账户ID
    pub strategy_id: i32,          // 策略ID
    pub strategy_name: String,     // 策略名称
    pub balance: Decimal,          // 实时余额
    pub created_at: DateTime<Utc>, // 快照时间
}

#[bon]
impl BalanceHistory {
    #[builder(on(String, into))]
    pub fn new(
        account_id: i32,
        strategy_id: i32,
        strategy_name: String,
        balance: Decimal,
        created_at: Option<DateTime<Utc>>,
    ) -> Self {
        BalanceHistory {
            account_id,
            strategy_id,
            strategy_name,
            balance,
            created_at: created_at.unwrap_or_else(Utc::now),
            ..Default::default()
        }
    }
}

pub async fn create(db: &PgPool, data: &BalanceHistory) -> Result<BalanceHistory> {
    let history = sqlx::query_as::<_, BalanceHistory>(
        r#"
        INSERT INTO account_balance_history (
            account_id, strategy_id, strategy_name, balance, created_at
        )
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(data.account_id)
    .bind(data.strategy_id)
    .bind(&data.strategy_name)
    .bind(data.balance)
    .bind(data.created_at)
    .fetch_one(db)
    .await?;

    Ok(history)
}

// 用户名下账户的余额历史，新的在前
pub async fn list_by_user(
    db: &PgPool,
    user_id: i32,
    query: &HistoryQuery,
) -> Result<Vec<BalanceHistory>> {
    let histories = sqlx::query_as::<_, BalanceHistory>(
        r#"
        SELECT h.* FROM account_balance_history h
            JOIN user_accounts ua ON ua.account_id = h.account_id
            WHERE
                ua.user_id = $1 AND
                ($2::TIMESTAMPTZ IS NULL OR h.created_at >= $2) AND
                ($3::TIMESTAMPTZ IS NULL OR h.created_at <= $3)
            ORDER BY h.created_at DESC, h.id DESC
            LIMIT $4 OFFSET $5
        "#,
    )
    .bind(user_id)
    .bind(query.start)
    .bind(query.end)
    .bind(query.limit())
    .bind(query.offset())
    .fetch_all(db)
    .await?;

    Ok(histories)
}
