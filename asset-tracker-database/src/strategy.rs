use anyhow::Result;
use asset_tracker_base::{BaseError, Credential, Exchange};
use bon::bon;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{postgres::PgPool, FromRow};
use std::fmt;

/// 一组交易所 API 凭证
#[derive(Clone, Default, FromRow)]
pub struct Strategy {
    pub id: i32,                    // 主键ID
    pub account_id: i32,            // 所属账户ID
    pub strategy_name: String,      // 策略名称
    pub api_key: String,            // API key
    pub secret_key: String,         // API secret
    pub passphrase: Option<String>, // 部分交易所需要
    pub exchange_type: String,      // 交易所
    pub preset_balance: Decimal,    // 预设余额
    pub created_at: DateTime<Utc>,  // 创建时间
}

#[bon]
impl Strategy {
    #[builder(on(String, into))]
    pub fn new(
        account_id: i32,
        strategy_name: String,
        api_key: String,
        secret_key: String,
        passphrase: Option<String>,
        exchange_type: String,
        preset_balance: Decimal,
        created_at: Option<DateTime<Utc>>, // 方便测试
    ) -> Self {
        Strategy {
            account_id,
            strategy_name,
            api_key,
            secret_key,
            passphrase,
            exchange_type,
            preset_balance,
            created_at: created_at.unwrap_or_else(Utc::now),
            ..Default::default()
        }
    }
}

impl fmt::Debug for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Strategy")
            .field("id", &self.id)
            .field("account_id", &self.account_id)
            .field("strategy_name", &self.strategy_name)
            .field("api_key", &self.api_key)
            .field("secret_key", &"***")
            .field("passphrase", &self.passphrase.as_ref().map(|_| "***"))
            .field("exchange_type", &self.exchange_type)
            .field("preset_balance", &self.preset_balance)
            .field("created_at", &self.created_at)
            .finish()
    }
}

// 转为估值用的只读凭证，交易所标识在此校验
impl TryFrom<&Strategy> for Credential {
    type Error = BaseError;

    fn try_from(strategy: &Strategy) -> Result<Self, Self::Error> {
        let exchange = Exchange::parse(&strategy.exchange_type)?;

        Ok(Credential::builder()
            .id(strategy.id)
            .account_id(strategy.account_id)
            .label(strategy.strategy_name.clone())
            .exchange(exchange)
            .api_key(strategy.api_key.clone())
            .secret_key(strategy.secret_key.clone())
            .maybe_passphrase(strategy.passphrase.clone())
            .initial_value(strategy.preset_balance)
            .build())
    }
}

// 拆分为可用凭证和无法转换的策略
pub fn split_credentials(strategies: &[Strategy]) -> (Vec<Credential>, Vec<(&Strategy, BaseError)>) {
    let mut credentials = Vec::with_capacity(strategies.len());
    let mut invalid = Vec::new();

    for strategy in strategies {
        match Credential::try_from(strategy) {
            Ok(credential) => credentials.push(credential),
            Err(e) => invalid.push((strategy, e)),
        }
    }

    (credentials, invalid)
}

pub async fn create(db: &PgPool, data: &Strategy) -> Result<Strategy> {
    let strategy = sqlx::query_as::<_, Strategy>(
        r#"
        INSERT INTO strategies (
            account_id, strategy_name, api_key, secret_key, passphrase, exchange_type, preset_balance, created_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, NOW())
        RETURNING *
        "#,
    )
    .bind(data.account_id)
    .bind(&data.strategy_name)
    .bind(&data.api_key)
    .bind(&data.secret_key)
    .bind(&data.passphrase)
    .bind(&data.exchange_type)
    .bind(data.preset_balance)
    .fetch_one(db)
    .await?;

    Ok(strategy)
}

pub async fn list_all(db: &PgPool) -> Result<Vec<Strategy>> {
    let strategies = sqlx::query_as::<_, Strategy>(
        r#"
        SELECT * FROM strategies ORDER BY account_id ASC, id ASC
        "#,
    )
    .fetch_all(db)
    .await?;

    Ok(strategies)
}

pub async fn list_by_user(db: &PgPool, user_id: i32) -> Result<Vec<Strategy>> {
    let strategies = sqlx::query_as::<_, Strategy>(
        r#"
        SELECT s.* FROM strategies s
            JOIN user_accounts ua ON ua.account_id = s.account_id
            WHERE ua.user_id = $1
            ORDER BY s.account_id ASC, s.id ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await?;

    Ok(strategies)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{account, user};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn gen_strategy(account_id: i32) -> Strategy {
        Strategy::builder()
            .account_id(account_id)
            .strategy_name("grid-1")
            .api_key("key")
            .secret_key("secret")
            .exchange_type("Binance")
            .preset_balance(dec!(1000))
            .build()
    }

    #[test]
    fn test_strategy_into_credential() -> Result<()> {
        let strategy = Strategy {
            id: 7,
            ..gen_strategy(3)
        };
        let credential = Credential::try_from(&strategy)?;

        assert_eq!(credential.id, 7);
        assert_eq!(credential.account_id, 3);
        assert_eq!(credential.label, "grid-1");
        assert_eq!(credential.exchange, Exchange::Binance);
        assert_eq!(credential.initial_value, dec!(1000));
        assert_eq!(credential.passphrase, None);

        Ok(())
    }

    #[test]
    fn test_strategy_unsupported_exchange() {
        let strategy = Strategy {
            exchange_type: "kraken".to_string(),
            ..gen_strategy(1)
        };

        assert_eq!(
            Credential::try_from(&strategy),
            Err(BaseError::UnsupportedExchange("kraken".to_string()))
        );
    }

    #[test]
    fn test_split_credentials() {
        let strategies = vec![
            Strategy {
                id: 1,
                ..gen_strategy(1)
            },
            Strategy {
                id: 2,
                exchange_type: "unknown".to_string(),
                ..gen_strategy(1)
            },
        ];

        let (credentials, invalid) = split_credentials(&strategies);

        assert_eq!(credentials.len(), 1);
        assert_eq!(credentials[0].id, 1);
        assert_eq!(invalid.len(), 1);
        assert_eq!(invalid[0].0.id, 2);
        assert_eq!(invalid[0].1.to_string(), "unsupported exchange: unknown");
    }

    #[test]
    fn test_strategy_debug_hides_secret() {
        let output = format!("{:?}", gen_strategy(1));

        assert!(output.contains("grid-1"));
        assert!(!output.contains("\"secret\""));
    }

    #[sqlx::test(migrator = "crate::MIGRATOR")]
    #[ignore = "requires postgres"]
    async fn test_strategy_list(db: PgPool) -> Result<()> {
        let alice = user::create(&db, "alice", "hash-a").await?;
        let start_date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let main = account::create(&db, "main", start_date).await?;
        let other = account::create(&db, "other", start_date).await?;
        account::link_user(&db, alice.id, main.id).await?;

        create(&db, &gen_strategy(main.id)).await?;
        create(&db, &gen_strategy(other.id)).await?;

        assert_eq!(list_all(&db).await?.len(), 2);

        let strategies = list_by_user(&db, alice.id).await?;
        assert_eq!(strategies.len(), 1);
        assert_eq!(strategies[0].account_id, main.id);
        assert_eq!(strategies[0].preset_balance, dec!(1000));

        Ok(())
    }
}
