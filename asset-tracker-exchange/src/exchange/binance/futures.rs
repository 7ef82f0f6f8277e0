use super::{model, BinanceClient};
use anyhow::Result;

/// U本位合约
pub struct Futures<'a> {
    client: &'a BinanceClient,
}

impl<'a> Futures<'a> {
    pub fn new(client: &'a BinanceClient) -> Self {
        Futures { client }
    }

    // 账户信息
    pub async fn get_account(&self) -> Result<model::FuturesAccountInformation> {
        self.client
            .get_signed(
                &self.client.config.futures_rest_api_endpoint,
                "/fapi/v2/account",
                &[],
            )
            .await
    }

    // 持仓风险，包含空仓位
    pub async fn get_position_risk(&self) -> Result<Vec<model::PositionRisk>> {
        self.client
            .get_signed(
                &self.client.config.futures_rest_api_endpoint,
                "/fapi/v2/positionRisk",
                &[],
            )
            .await
    }
}
