use super::account_client::{
    base::{
        AccountClientRequest, AccountClientResponse, AssetBalance, FuturesBalance, MarginAsset,
        PositionRecord, SymbolPrice, UsdmAccount,
    },
    binance_account_client::BinanceAccountClient,
    mock_account_client::MockAccountClient,
};
use anyhow::Result;
use asset_tracker_base::Exchange;
use enum_dispatch::enum_dispatch;
use futures::future::BoxFuture;
use std::task::{Context, Poll};
use tower::Service;

/// 只读账户接口，每个方法对应一个账户维度
#[enum_dispatch]
#[allow(async_fn_in_trait)]
pub trait AccountClientExecutable {
    fn exchange(&self) -> Exchange;

    // 全部交易对最新价格
    async fn get_all_tickers(&self) -> Result<Vec<SymbolPrice>>;

    // 现货余额
    async fn get_spot_balances(&self) -> Result<Vec<AssetBalance>>;

    // 全仓杠杆净资产
    async fn get_margin_assets(&self) -> Result<Vec<MarginAsset>>;

    // U本位合约账户汇总
    async fn get_usdm_account(&self) -> Result<UsdmAccount>;

    // 币本位合约余额
    async fn get_coinm_balances(&self) -> Result<Vec<FuturesBalance>>;

    // U本位合约持仓
    async fn get_open_positions(&self) -> Result<Vec<PositionRecord>>;
}

#[derive(Debug, Clone)]
#[enum_dispatch(AccountClientExecutable)]
pub enum AccountClientKind {
    BinanceAccountClient(BinanceAccountClient),
    MockAccountClient(MockAccountClient),
}

impl Service<AccountClientRequest> for AccountClientKind {
    type Response = AccountClientResponse;
    type Error = anyhow::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: AccountClientRequest) -> Self::Future {
        let client = self.clone();

        let fut = async move {
            let res = match req {
                AccountClientRequest::Exchange => client.exchange().into(),
                AccountClientRequest::GetAllTickers => client.get_all_tickers().await?.into(),
                AccountClientRequest::GetSpotBalances => client.get_spot_balances().await?.into(),
                AccountClientRequest::GetMarginAssets => client.get_margin_assets().await?.into(),
                AccountClientRequest::GetUsdmAccount => client.get_usdm_account().await?.into(),
                AccountClientRequest::GetCoinmBalances => {
                    client.get_coinm_balances().await?.into()
                }
                AccountClientRequest::GetOpenPositions => {
                    client.get_open_positions().await?.into()
                }
            };

            Ok(res)
        };

        Box::pin(fut)
    }
}
