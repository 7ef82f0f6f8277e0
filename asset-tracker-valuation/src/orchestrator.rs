use crate::{
    aggregator::{aggregate, AccountValuation},
    baseline::{BaselineComparison, BatchTotals},
    client_service::ClientServiceConfig,
    error::ValuationError,
    fetcher::{AccountFetcher, LegResult},
    price_resolver::PriceResolver,
    registry::ClientFactory,
};
use asset_tracker_base::{Credential, Exchange};
use bon::bon;
use futures::future::join_all;
use serde::Serialize;
use std::fmt;
use tracing::{debug, error, instrument, warn};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountReport {
    pub credential_id: i32,
    pub account_id: i32,
    pub label: String,
    pub exchange: Exchange,
    pub valuation: AccountValuation,
    pub baseline: BaselineComparison,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountFailure {
    pub credential_id: i32,
    pub account_id: i32,
    pub label: String,
    pub reason: String,
}

impl fmt::Display for AccountFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Error fetching data for {}: {}", self.label, self.reason)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchReport {
    pub currency: String,
    pub totals: BatchTotals,
    pub accounts: Vec<AccountReport>, // 与输入顺序一致
    pub failures: Vec<AccountFailure>,
}

/// 多账户估值入口
#[derive(Debug, Clone)]
pub struct Valuator<F> {
    factory: F,
    resolver: PriceResolver,
    client_config: ClientServiceConfig,
}

#[bon]
impl<F: ClientFactory> Valuator<F> {
    #[builder]
    pub fn new(
        factory: F,
        resolver: PriceResolver,
        #[builder(default)] client_config: ClientServiceConfig,
    ) -> Self {
        Valuator {
            factory,
            resolver,
            client_config,
        }
    }
}

impl<F: ClientFactory> Valuator<F> {
    pub fn currency(&self) -> &str {
        self.resolver.currency()
    }

    // 单组凭证：取数 => 价格 => 汇总 => 对比基准
    #[instrument(name = "value_account", skip_all, fields(label = %credential.label))]
    pub async fn value_account(
        &self,
        credential: &Credential,
    ) -> Result<AccountReport, ValuationError> {
        let client = self.factory.create(credential)?;
        let fetcher = AccountFetcher::new(&credential.label, &client, &self.client_config);

        let legs = fetcher.fetch_all().await;

        if legs.all_accounts_failed() {
            let reason = legs
                .failures()
                .into_iter()
                .map(|(leg, reason)| format!("{}: {}", leg, reason))
                .collect::<Vec<_>>()
                .join("; ");

            return Err(ValuationError::AllLegsFailed(reason));
        }

        let prices = match &legs.tickers {
            LegResult::Fetched(tickers) => self.resolver.resolve(tickers),
            LegResult::Failed(_) => self.resolver.degraded(),
        };

        let valuation = aggregate(&legs, &prices, self.resolver.currency());

        for gap in &valuation.price_gaps {
            warn!(
                label = %credential.label,
                market = %gap.leg,
                asset = %gap.asset,
                amount = %gap.amount,
                "no price for asset, counted as zero"
            );
        }

        debug!(
            spot = %valuation.spot_value,
            margin = %valuation.margin_value,
            futures = %valuation.futures_value,
            total = %valuation.total_value,
            "valuation breakdown"
        );

        let baseline = BaselineComparison::compare(valuation.total_value, credential.initial_value);

        Ok(AccountReport {
            credential_id: credential.id,
            account_id: credential.account_id,
            label: credential.label.clone(),
            exchange: credential.exchange,
            valuation,
            baseline,
        })
    }

    // 并发估值，单个凭证失败不影响其他
    pub async fn value_batch(&self, credentials: &[Credential]) -> BatchReport {
        let results = join_all(
            credentials
                .iter()
                .map(|credential| self.value_account(credential)),
        )
        .await;

        let mut accounts = Vec::with_capacity(credentials.len());
        let mut failures = Vec::new();

        for (credential, result) in credentials.iter().zip(results) {
            match result {
                Ok(report) => accounts.push(report),
                Err(e) => {
                    let failure = AccountFailure {
                        credential_id: credential.id,
                        account_id: credential.account_id,
                        label: credential.label.clone(),
                        reason: e.to_string(),
                    };
                    error!("{}", failure);
                    failures.push(failure);
                }
            }
        }

        let totals = accounts
            .iter()
            .map(|report| &report.baseline)
            .collect::<BatchTotals>();

        BatchReport {
            currency: self.currency().to_string(),
            totals,
            accounts,
            failures,
        }
    }
}
