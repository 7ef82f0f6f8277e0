use anyhow::{anyhow, Error, Result};
use asset_tracker_base::{Exchange, Symbol};
use bon::Builder;
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SymbolPrice {
    pub symbol: Symbol,  // 交易对
    pub price: Decimal, // 最新价格
}

impl SymbolPrice {
    pub fn new(symbol: impl Into<Symbol>, price: Decimal) -> Self {
        SymbolPrice {
            symbol: symbol.into(),
            price,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetBalance {
    pub asset: String,   // 币种
    pub free: Decimal,   // 可用余额
    pub locked: Decimal, // 锁定余额
}

impl AssetBalance {
    pub fn new(asset: impl Into<String>, free: Decimal, locked: Decimal) -> Self {
        AssetBalance {
            asset: asset.into(),
            free,
            locked,
        }
    }

    pub fn total(&self) -> Decimal {
        self.free + self.locked
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarginAsset {
    pub asset: String,      // 币种
    pub net_asset: Decimal, // 净资产，可为负
}

impl MarginAsset {
    pub fn new(asset: impl Into<String>, net_asset: Decimal) -> Self {
        MarginAsset {
            asset: asset.into(),
            net_asset,
        }
    }
}

/// U本位合约账户汇总，只做展示
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UsdmAccount {
    pub wallet_balance: Decimal,
    pub unrealized_pnl: Decimal,
    pub margin_balance: Decimal,
    pub cross_wallet_balance: Decimal,
    pub cross_unrealized_pnl: Decimal,
    pub available_balance: Decimal,
}

/// 币本位合约余额，以币计价
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FuturesBalance {
    pub asset: String,
    pub balance: Decimal,
    pub cross_unrealized_pnl: Decimal,
}

impl FuturesBalance {
    pub fn new(asset: impl Into<String>, balance: Decimal, cross_unrealized_pnl: Decimal) -> Self {
        FuturesBalance {
            asset: asset.into(),
            balance,
            cross_unrealized_pnl,
        }
    }

    // 余额 + 未实现盈亏
    pub fn equity(&self) -> Decimal {
        self.balance + self.cross_unrealized_pnl
    }
}

#[derive(Builder, Debug, Clone, PartialEq, Serialize)]
pub struct PositionRecord {
    #[builder(into)]
    pub symbol: Symbol,          // 交易对
    pub position_amount: Decimal, // 持仓数量，空单为负
    pub entry_price: Decimal,     // 开仓均价
    pub mark_price: Decimal,      // 标记价格
    pub unrealized_pnl: Decimal,  // 未实现盈亏
    #[builder(default = 1)]
    pub leverage: u32, // 杠杆倍数
}

impl PositionRecord {
    // 名义价值，取绝对值
    pub fn notional(&self) -> Decimal {
        (self.position_amount * self.mark_price).abs()
    }

    pub fn is_open(&self) -> bool {
        !self.position_amount.is_zero()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountClientRequest {
    Exchange,
    GetAllTickers,
    GetSpotBalances,
    GetMarginAssets,
    GetUsdmAccount,
    GetCoinmBalances,
    GetOpenPositions,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AccountClientResponse {
    Exchange(Exchange),
    Tickers(Vec<SymbolPrice>),
    SpotBalances(Vec<AssetBalance>),
    MarginAssets(Vec<MarginAsset>),
    UsdmAccount(UsdmAccount),
    CoinmBalances(Vec<FuturesBalance>),
    Positions(Vec<PositionRecord>),
}

macro_rules! impl_response_conversion {
    ($variant:ident, $ty:ty) => {
        impl From<$ty> for AccountClientResponse {
            fn from(value: $ty) -> Self {
                AccountClientResponse::$variant(value)
            }
        }

        impl TryFrom<AccountClientResponse> for $ty {
            type Error = Error;

            fn try_from(value: AccountClientResponse) -> Result<Self> {
                match value {
                    AccountClientResponse::$variant(inner) => Ok(inner),
                    other => Err(anyhow!(
                        "unexpected response, expected {}: {:?}",
                        stringify!($variant),
                        other
                    )),
                }
            }
        }
    };
}

impl_response_conversion!(Exchange, Exchange);
impl_response_conversion!(Tickers, Vec<SymbolPrice>);
impl_response_conversion!(SpotBalances, Vec<AssetBalance>);
impl_response_conversion!(MarginAssets, Vec<MarginAsset>);
impl_response_conversion!(UsdmAccount, UsdmAccount);
impl_response_conversion!(CoinmBalances, Vec<FuturesBalance>);
impl_response_conversion!(Positions, Vec<PositionRecord>);

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_position_notional() {
        let position = PositionRecord::builder()
            .symbol("BTCUSDT")
            .position_amount(dec!(-0.5))
            .entry_price(dec!(42000))
            .mark_price(dec!(40000))
            .unrealized_pnl(dec!(1000))
            .build();

        assert_eq!(position.notional(), dec!(20000));
        assert_eq!(position.leverage, 1);
        assert!(position.is_open());
    }

    #[test]
    fn test_response_conversion() -> Result<()> {
        let response: AccountClientResponse =
            vec![AssetBalance::new("BTC", dec!(1), dec!(0.5))].into();
        let balances: Vec<AssetBalance> = response.clone().try_into()?;
        assert_eq!(balances[0].total(), dec!(1.5));

        let tickers: Result<Vec<SymbolPrice>> = response.try_into();
        assert!(tickers.is_err());

        Ok(())
    }
}
