use super::base::{
    AssetBalance, FuturesBalance, MarginAsset, PositionRecord, SymbolPrice, UsdmAccount,
};
use crate::{
    client::account_client_kind::AccountClientExecutable,
    exchange::binance::{BinanceClient, Config},
};
use anyhow::Result;
use asset_tracker_base::{Credential, Exchange};
use bon::bon;

#[derive(Debug, Clone)]
pub struct BinanceAccountClient {
    client: BinanceClient,
}

#[bon]
impl BinanceAccountClient {
    #[builder(on(String, into))]
    pub fn new(
        api_key: Option<String>,
        secret_key: Option<String>,
        config: Option<Config>,
    ) -> Self {
        let client = BinanceClient::builder()
            .maybe_api_key(api_key)
            .maybe_secret_key(secret_key)
            .maybe_config(config)
            .build();

        BinanceAccountClient { client }
    }
}

impl From<&Credential> for BinanceAccountClient {
    fn from(credential: &Credential) -> Self {
        BinanceAccountClient::builder()
            .api_key(credential.api_key.clone())
            .secret_key(credential.secret_key.clone())
            .build()
    }
}

impl AccountClientExecutable for BinanceAccountClient {
    fn exchange(&self) -> Exchange {
        Exchange::Binance
    }

    async fn get_all_tickers(&self) -> Result<Vec<SymbolPrice>> {
        let prices = self.client.spot().get_all_prices().await?;

        prices.into_iter().map(SymbolPrice::try_from).collect()
    }

    async fn get_spot_balances(&self) -> Result<Vec<AssetBalance>> {
        let account = self.client.spot().get_account().await?;

        account
            .balances
            .into_iter()
            .map(AssetBalance::try_from)
            .collect()
    }

    async fn get_margin_assets(&self) -> Result<Vec<MarginAsset>> {
        let account = self.client.margin().get_account().await?;

        account
            .user_assets
            .into_iter()
            .map(MarginAsset::try_from)
            .collect()
    }

    async fn get_usdm_account(&self) -> Result<UsdmAccount> {
        let account = self.client.futures().get_account().await?;

        account.try_into()
    }

    async fn get_coinm_balances(&self) -> Result<Vec<FuturesBalance>> {
        let balances = self.client.coin_futures().get_balances().await?;

        balances.into_iter().map(FuturesBalance::try_from).collect()
    }

    async fn get_open_positions(&self) -> Result<Vec<PositionRecord>> {
        let positions = self.client.futures().get_position_risk().await?;

        // 只保留有持仓的记录
        let positions = positions
            .into_iter()
            .map(PositionRecord::try_from)
            .collect::<Result<Vec<_>>>()?
            .into_iter()
            .filter(PositionRecord::is_open)
            .collect();

        Ok(positions)
    }
}
