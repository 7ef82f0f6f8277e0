use crate::task_core::{status::TaskStatus, traits::Executable};
use anyhow::Result;
use asset_tracker_database::{
    balance_history::{self, BalanceHistory},
    strategy,
};
use asset_tracker_valuation::{BatchReport, ClientFactory, Valuator};
use async_stream::stream;
use bon::bon;
use chrono::{DateTime, Utc};
use futures::stream::BoxStream;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{info, warn};

/// 每日余额快照：每个策略写入一条余额记录
pub struct BalanceSnapshotTask<F> {
    db: Arc<PgPool>,
    valuator: Arc<Valuator<F>>,
}

#[bon]
impl<F> BalanceSnapshotTask<F>
where
    F: ClientFactory + Send + Sync + 'static,
{
    #[builder]
    pub fn new(db: Arc<PgPool>, valuator: Arc<Valuator<F>>) -> Self {
        BalanceSnapshotTask { db, valuator }
    }
}

fn snapshot_rows(report: &BatchReport, created_at: DateTime<Utc>) -> Vec<BalanceHistory> {
    report
        .accounts
        .iter()
        .map(|account| {
            BalanceHistory::builder()
                .account_id(account.account_id)
                .strategy_id(account.credential_id)
                .strategy_name(account.label.clone())
                .balance(account.valuation.total_value)
                .created_at(created_at)
                .build()
        })
        .collect()
}

impl<F> Executable for BalanceSnapshotTask<F>
where
    F: ClientFactory + Send + Sync + 'static,
{
    type Output = BoxStream<'static, Result<TaskStatus<BalanceHistory>>>;

    async fn execute(&self) -> Result<Self::Output> {
        let db = Arc::clone(&self.db);
        let valuator = Arc::clone(&self.valuator);

        let stream = stream! {
            yield Ok(TaskStatus::Initializing);

            let strategies = match strategy::list_all(&db).await {
                Ok(strategies) => strategies,
                Err(e) => {
                    yield Err(e);
                    return;
                }
            };
            let (credentials, invalid) = strategy::split_credentials(&strategies);

            for (item, e) in invalid {
                let failure = format!("Error fetching data for {}: {}", item.strategy_name, e);
                warn!("{}", failure);
                yield Ok(TaskStatus::Failed(failure));
            }

            let report = valuator.value_batch(&credentials).await;
            let created_at = Utc::now();

            for failure in &report.failures {
                yield Ok(TaskStatus::Failed(failure.to_string()));
            }

            for row in snapshot_rows(&report, created_at) {
                let row = match balance_history::create(&db, &row).await {
                    Ok(row) => row,
                    Err(e) => {
                        yield Err(e);
                        return;
                    }
                };
                info!(strategy = %row.strategy_name, balance = %row.balance, "balance snapshot saved");

                yield Ok(TaskStatus::Running(row));
            }

            yield Ok(TaskStatus::Finished);
        };

        Ok(Box::pin(stream))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use asset_tracker_base::Credential;
    use asset_tracker_database::strategy::Strategy;
    use asset_tracker_valuation::{PriceResolver, ValuationError};
    use asset_tracker_exchange::client::{AccountClientKind, AssetBalance, MockAccountClient};
    use rust_decimal_macros::dec;

    struct MockFactory;

    impl ClientFactory for MockFactory {
        fn create(&self, credential: &Credential) -> Result<AccountClientKind, ValuationError> {
            credential.validate()?;

            let client = MockAccountClient::builder()
                .spot_balances(vec![AssetBalance::new("USDT", dec!(1200), dec!(0))])
                .build();

            Ok(client.into())
        }
    }

    fn gen_strategy(id: i32, exchange_type: &str) -> Strategy {
        Strategy {
            id,
            ..Strategy::builder()
                .account_id(1)
                .strategy_name(format!("strategy-{}", id))
                .api_key("key")
                .secret_key("secret")
                .exchange_type(exchange_type)
                .preset_balance(dec!(1000))
                .build()
        }
    }

    #[tokio::test]
    async fn test_snapshot_rows() -> Result<()> {
        let valuator = Valuator::builder()
            .factory(MockFactory)
            .resolver(PriceResolver::builder().currency("USDT").build())
            .build();
        let strategies = [gen_strategy(1, "binance")];
        let (credentials, _) = strategy::split_credentials(&strategies);
        let report = valuator.value_batch(&credentials).await;

        let created_at = Utc::now();
        let rows = snapshot_rows(&report, created_at);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].strategy_id, 1);
        assert_eq!(rows[0].account_id, 1);
        assert_eq!(rows[0].strategy_name, "strategy-1");
        assert_eq!(rows[0].balance, dec!(1200));
        assert_eq!(rows[0].created_at, created_at);

        Ok(())
    }
}
