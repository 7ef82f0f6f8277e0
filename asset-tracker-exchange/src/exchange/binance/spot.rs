use super::{model, BinanceClient};
use anyhow::Result;

pub struct Spot<'a> {
    client: &'a BinanceClient,
}

impl<'a> Spot<'a> {
    pub fn new(client: &'a BinanceClient) -> Self {
        Spot { client }
    }

    // 获取全部交易对的最新价格
    pub async fn get_all_prices(&self) -> Result<Vec<model::SymbolPrice>> {
        self.client
            .get(&self.client.config.rest_api_endpoint, "/api/v3/ticker/price")
            .await
    }

    // 获取账户信息
    pub async fn get_account(&self) -> Result<model::AccountInformation> {
        self.client
            .get_signed(
                &self.client.config.rest_api_endpoint,
                "/api/v3/account",
                &[("omitZeroBalances", "true")],
            )
            .await
    }
}
