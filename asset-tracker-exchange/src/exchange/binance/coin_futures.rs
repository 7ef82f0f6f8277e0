use super::{model, BinanceClient};
use anyhow::Result;

/// 币本位合约
pub struct CoinFutures<'a> {
    client: &'a BinanceClient,
}

impl<'a> CoinFutures<'a> {
    pub fn new(client: &'a BinanceClient) -> Self {
        CoinFutures { client }
    }

    // 各币种余额
    pub async fn get_balances(&self) -> Result<Vec<model::CoinFuturesBalance>> {
        self.client
            .get_signed(
                &self.client.config.coin_futures_rest_api_endpoint,
                "/dapi/v1/balance",
                &[],
            )
            .await
    }
}
