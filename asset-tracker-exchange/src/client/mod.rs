mod account_client;
mod account_client_kind;
mod client_error;

pub use account_client::{
    base::{
        AccountClientRequest, AccountClientResponse, AssetBalance, FuturesBalance, MarginAsset,
        PositionRecord, SymbolPrice, UsdmAccount,
    },
    binance_account_client::BinanceAccountClient,
    mock_account_client::MockAccountClient,
};
pub use account_client_kind::{AccountClientExecutable, AccountClientKind};
pub(crate) use client_error::ClientError;
