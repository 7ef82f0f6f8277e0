use super::{model, BinanceClient};
use anyhow::Result;

pub struct Margin<'a> {
    client: &'a BinanceClient,
}

impl<'a> Margin<'a> {
    pub fn new(client: &'a BinanceClient) -> Self {
        Margin { client }
    }

    // 全仓杠杆账户详情
    pub async fn get_account(&self) -> Result<model::MarginAccountDetails> {
        self.client
            .get_signed(
                &self.client.config.rest_api_endpoint,
                "/sapi/v1/margin/account",
                &[],
            )
            .await
    }
}
