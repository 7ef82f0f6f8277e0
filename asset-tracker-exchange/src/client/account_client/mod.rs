pub(crate) mod base;
pub(crate) mod binance_account_client;
pub(crate) mod mock_account_client;
