use super::base::{
    AssetBalance, FuturesBalance, MarginAsset, PositionRecord, SymbolPrice, UsdmAccount,
};
use crate::client::account_client_kind::AccountClientExecutable;
use anyhow::{anyhow, Result};
use asset_tracker_base::{Exchange, Market};
use bon::bon;
use std::{collections::HashSet, time::Duration};

/// 测试用客户端，返回预置数据，可按市场模拟失败或慢请求
#[derive(Debug, Clone, Default)]
pub struct MockAccountClient {
    tickers: Vec<SymbolPrice>,
    spot_balances: Vec<AssetBalance>,
    margin_assets: Vec<MarginAsset>,
    usdm_account: UsdmAccount,
    coinm_balances: Vec<FuturesBalance>,
    positions: Vec<PositionRecord>,
    failing_markets: HashSet<Market>,
    tickers_unavailable: bool,
    slow_markets: HashSet<Market>,
    delay: Option<Duration>, // slow_markets 的响应延迟
}

#[bon]
impl MockAccountClient {
    #[builder]
    pub fn new(
        #[builder(default)] tickers: Vec<SymbolPrice>,
        #[builder(default)] spot_balances: Vec<AssetBalance>,
        #[builder(default)] margin_assets: Vec<MarginAsset>,
        #[builder(default)] usdm_account: UsdmAccount,
        #[builder(default)] coinm_balances: Vec<FuturesBalance>,
        #[builder(default)] positions: Vec<PositionRecord>,
        #[builder(default)] failing_markets: Vec<Market>,
        #[builder(default)] tickers_unavailable: bool,
        #[builder(default)] slow_markets: Vec<Market>,
        delay: Option<Duration>,
    ) -> Self {
        MockAccountClient {
            tickers,
            spot_balances,
            margin_assets,
            usdm_account,
            coinm_balances,
            positions,
            failing_markets: failing_markets.into_iter().collect(),
            tickers_unavailable,
            slow_markets: slow_markets.into_iter().collect(),
            delay,
        }
    }

    async fn check(&self, market: Market) -> Result<()> {
        if let Some(delay) = self.delay {
            if self.slow_markets.contains(&market) {
                tokio::time::sleep(delay).await;
            }
        }

        if self.failing_markets.contains(&market) {
            return Err(anyhow!("mock {} request failed", market));
        }

        Ok(())
    }
}

impl AccountClientExecutable for MockAccountClient {
    fn exchange(&self) -> Exchange {
        Exchange::Binance
    }

    async fn get_all_tickers(&self) -> Result<Vec<SymbolPrice>> {
        if self.tickers_unavailable {
            return Err(anyhow!("mock ticker request failed"));
        }

        Ok(self.tickers.clone())
    }

    async fn get_spot_balances(&self) -> Result<Vec<AssetBalance>> {
        self.check(Market::Spot).await?;
        Ok(self.spot_balances.clone())
    }

    async fn get_margin_assets(&self) -> Result<Vec<MarginAsset>> {
        self.check(Market::Margin).await?;
        Ok(self.margin_assets.clone())
    }

    async fn get_usdm_account(&self) -> Result<UsdmAccount> {
        self.check(Market::Usdm).await?;
        Ok(self.usdm_account.clone())
    }

    async fn get_coinm_balances(&self) -> Result<Vec<FuturesBalance>> {
        self.check(Market::Coinm).await?;
        Ok(self.coinm_balances.clone())
    }

    async fn get_open_positions(&self) -> Result<Vec<PositionRecord>> {
        self.check(Market::Usdm).await?;
        Ok(self.positions.clone())
    }
}
