use crate::client_service::{AccountClientService, ClientServiceConfig};
use anyhow::Error;
use asset_tracker_base::Market;
use asset_tracker_exchange::client::{
    AccountClientKind, AccountClientRequest, AccountClientResponse, AssetBalance,
    FuturesBalance, MarginAsset, PositionRecord, SymbolPrice, UsdmAccount,
};
use serde::Serialize;
use strum_macros::{AsRefStr, Display, EnumIter};
use tracing::{error, warn};

/// 一次估值中的单个请求
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, AsRefStr, EnumIter)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Leg {
    Tickers,
    Spot,
    Margin,
    UsdmAccount,
    Coinm,
    Positions,
}

impl Leg {
    pub fn market(&self) -> Option<Market> {
        match self {
            Leg::Tickers => None,
            Leg::Spot => Some(Market::Spot),
            Leg::Margin => Some(Market::Margin),
            Leg::UsdmAccount | Leg::Positions => Some(Market::Usdm),
            Leg::Coinm => Some(Market::Coinm),
        }
    }

    fn request(&self) -> AccountClientRequest {
        match self {
            Leg::Tickers => AccountClientRequest::GetAllTickers,
            Leg::Spot => AccountClientRequest::GetSpotBalances,
            Leg::Margin => AccountClientRequest::GetMarginAssets,
            Leg::UsdmAccount => AccountClientRequest::GetUsdmAccount,
            Leg::Coinm => AccountClientRequest::GetCoinmBalances,
            Leg::Positions => AccountClientRequest::GetOpenPositions,
        }
    }
}

/// 请求结果，区分"余额为零"和"请求失败"
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum LegResult<T> {
    Fetched(T),
    Failed(String),
}

impl<T> LegResult<T> {
    pub fn is_failed(&self) -> bool {
        matches!(self, LegResult::Failed(_))
    }

    pub fn fetched(&self) -> Option<&T> {
        match self {
            LegResult::Fetched(value) => Some(value),
            LegResult::Failed(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&str> {
        match self {
            LegResult::Fetched(_) => None,
            LegResult::Failed(reason) => Some(reason),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> LegResult<U> {
        match self {
            LegResult::Fetched(value) => LegResult::Fetched(f(value)),
            LegResult::Failed(reason) => LegResult::Failed(reason),
        }
    }
}

impl<T> From<anyhow::Result<T>> for LegResult<T> {
    fn from(value: anyhow::Result<T>) -> Self {
        match value {
            Ok(value) => LegResult::Fetched(value),
            Err(e) => LegResult::Failed(e.to_string()),
        }
    }
}

/// 一组凭证的全部请求结果
#[derive(Debug, Clone, PartialEq)]
pub struct AccountLegs {
    pub tickers: LegResult<Vec<SymbolPrice>>,
    pub spot: LegResult<Vec<AssetBalance>>,
    pub margin: LegResult<Vec<MarginAsset>>,
    pub usdm_account: LegResult<UsdmAccount>,
    pub coinm: LegResult<Vec<FuturesBalance>>,
    pub positions: LegResult<Vec<PositionRecord>>,
}

impl AccountLegs {
    // 失败的请求，按固定顺序
    pub fn failures(&self) -> Vec<(Leg, &str)> {
        [
            (Leg::Tickers, self.tickers.failure()),
            (Leg::Spot, self.spot.failure()),
            (Leg::Margin, self.margin.failure()),
            (Leg::UsdmAccount, self.usdm_account.failure()),
            (Leg::Coinm, self.coinm.failure()),
            (Leg::Positions, self.positions.failure()),
        ]
        .into_iter()
        .filter_map(|(leg, reason)| reason.map(|reason| (leg, reason)))
        .collect()
    }

    // 所有账户请求都失败，行情不计入
    pub fn all_accounts_failed(&self) -> bool {
        self.spot.is_failed()
            && self.margin.is_failed()
            && self.usdm_account.is_failed()
            && self.coinm.is_failed()
            && self.positions.is_failed()
    }
}

/// 单组凭证的取数器，所有请求共用同一个客户端
pub struct AccountFetcher {
    label: String,
    client: AccountClientKind,
    config: ClientServiceConfig,
}

impl AccountClientService for AccountFetcher {}

impl AccountFetcher {
    pub fn new(
        label: impl Into<String>,
        client: &AccountClientKind,
        config: &ClientServiceConfig,
    ) -> Self {
        AccountFetcher {
            label: label.into(),
            client: client.clone(),
            config: *config,
        }
    }

    async fn fetch<T>(&self, leg: Leg) -> LegResult<T>
    where
        T: TryFrom<AccountClientResponse, Error = Error>,
    {
        let mut svc = self.account_client_svc(&self.client, &self.config);
        let result = self
            .account_client_svc_call(&mut svc, leg.request())
            .await
            .and_then(T::try_from);

        if let Err(e) = &result {
            match leg.market() {
                Some(market) => warn!(
                    label = %self.label,
                    market = %market,
                    leg = %leg,
                    "leg failed, counted as zero: {:#}",
                    e
                ),
                None => error!(label = %self.label, "ticker feed failed: {:#}", e),
            }
        }

        result.into()
    }

    pub async fn fetch_tickers(&self) -> LegResult<Vec<SymbolPrice>> {
        self.fetch(Leg::Tickers).await
    }

    // 可用 + 锁定，过滤零余额
    pub async fn fetch_spot(&self) -> LegResult<Vec<AssetBalance>> {
        self.fetch::<Vec<AssetBalance>>(Leg::Spot)
            .await
            .map(|balances| {
                balances
                    .into_iter()
                    .filter(|balance| !balance.total().is_zero())
                    .collect()
            })
    }

    // 净资产可为负，只过滤恰好为零的
    pub async fn fetch_margin(&self) -> LegResult<Vec<MarginAsset>> {
        self.fetch::<Vec<MarginAsset>>(Leg::Margin)
            .await
            .map(|assets| {
                assets
                    .into_iter()
                    .filter(|asset| !asset.net_asset.is_zero())
                    .collect()
            })
    }

    pub async fn fetch_usdm_account(&self) -> LegResult<UsdmAccount> {
        self.fetch(Leg::UsdmAccount).await
    }

    pub async fn fetch_coinm(&self) -> LegResult<Vec<FuturesBalance>> {
        self.fetch::<Vec<FuturesBalance>>(Leg::Coinm)
            .await
            .map(|balances| {
                balances
                    .into_iter()
                    .filter(|balance| {
                        !balance.balance.is_zero() || !balance.cross_unrealized_pnl.is_zero()
                    })
                    .collect()
            })
    }

    pub async fn fetch_positions(&self) -> LegResult<Vec<PositionRecord>> {
        self.fetch::<Vec<PositionRecord>>(Leg::Positions)
            .await
            .map(|positions| positions.into_iter().filter(PositionRecord::is_open).collect())
    }

    // 并发请求，全部返回后再汇总
    pub async fn fetch_all(&self) -> AccountLegs {
        let (tickers, spot, margin, usdm_account, coinm, positions) = tokio::join!(
            self.fetch_tickers(),
            self.fetch_spot(),
            self.fetch_margin(),
            self.fetch_usdm_account(),
            self.fetch_coinm(),
            self.fetch_positions(),
        );

        AccountLegs {
            tickers,
            spot,
            margin,
            usdm_account,
            coinm,
            positions,
        }
    }
}
