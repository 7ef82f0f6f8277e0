//! 币安接口原始返回结构，数值字段均为字符串
use crate::client::{
    AssetBalance, FuturesBalance, MarginAsset, PositionRecord, SymbolPrice as DomainSymbolPrice,
    UsdmAccount,
};
use anyhow::{Error, Result};
use rust_decimal::Decimal;
use serde::Deserialize;

#[derive(Deserialize, Debug, Clone)]
pub struct SymbolPrice {
    pub symbol: String,
    pub price: String,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AccountInformation {
    pub balances: Vec<Balance>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Balance {
    pub asset: String,
    pub free: String,
    pub locked: String,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MarginAccountDetails {
    pub user_assets: Vec<UserAsset>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UserAsset {
    pub asset: String,
    pub free: String,
    pub locked: String,
    pub borrowed: String,
    pub interest: String,
    pub net_asset: String,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct FuturesAccountInformation {
    pub total_wallet_balance: String,
    pub total_unrealized_profit: String,
    pub total_margin_balance: String,
    pub total_cross_wallet_balance: String,
    pub total_cross_un_pnl: String,
    pub available_balance: String,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PositionRisk {
    pub symbol: String,
    pub position_amt: String,
    pub entry_price: String,
    pub mark_price: String,
    pub un_realized_profit: String,
    pub leverage: String,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CoinFuturesBalance {
    pub asset: String,
    pub balance: String,
    pub cross_un_pnl: String,
}

fn decimal(value: &str) -> Result<Decimal> {
    Ok(value.parse::<Decimal>()?)
}

impl TryFrom<SymbolPrice> for DomainSymbolPrice {
    type Error = Error;

    fn try_from(value: SymbolPrice) -> Result<Self> {
        Ok(DomainSymbolPrice::new(value.symbol, decimal(&value.price)?))
    }
}

impl TryFrom<Balance> for AssetBalance {
    type Error = Error;

    fn try_from(value: Balance) -> Result<Self> {
        Ok(AssetBalance::new(
            value.asset,
            decimal(&value.free)?,
            decimal(&value.locked)?,
        ))
    }
}

impl TryFrom<UserAsset> for MarginAsset {
    type Error = Error;

    fn try_from(value: UserAsset) -> Result<Self> {
        Ok(MarginAsset::new(value.asset, decimal(&value.net_asset)?))
    }
}

impl TryFrom<FuturesAccountInformation> for UsdmAccount {
    type Error = Error;

    fn try_from(value: FuturesAccountInformation) -> Result<Self> {
        Ok(UsdmAccount {
            wallet_balance: decimal(&value.total_wallet_balance)?,
            unrealized_pnl: decimal(&value.total_unrealized_profit)?,
            margin_balance: decimal(&value.total_margin_balance)?,
            cross_wallet_balance: decimal(&value.total_cross_wallet_balance)?,
            cross_unrealized_pnl: decimal(&value.total_cross_un_pnl)?,
            available_balance: decimal(&value.available_balance)?,
        })
    }
}

impl TryFrom<PositionRisk> for PositionRecord {
    type Error = Error;

    fn try_from(value: PositionRisk) -> Result<Self> {
        Ok(PositionRecord::builder()
            .symbol(value.symbol)
            .position_amount(decimal(&value.position_amt)?)
            .entry_price(decimal(&value.entry_price)?)
            .mark_price(decimal(&value.mark_price)?)
            .unrealized_pnl(decimal(&value.un_realized_profit)?)
            .leverage(value.leverage.parse::<u32>()?)
            .build())
    }
}

impl TryFrom<CoinFuturesBalance> for FuturesBalance {
    type Error = Error;

    fn try_from(value: CoinFuturesBalance) -> Result<Self> {
        Ok(FuturesBalance::new(
            value.asset,
            decimal(&value.balance)?,
            decimal(&value.cross_un_pnl)?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_decode_account_information() -> Result<()> {
        let body = r#"{
            "makerCommission": 15,
            "canTrade": true,
            "balances": [
                {"asset": "BTC", "free": "4723846.89208129", "locked": "0.00000000"},
                {"asset": "LTC", "free": "4763368.68006011", "locked": "1.5"}
            ]
        }"#;
        let account: AccountInformation = serde_json::from_str(body)?;
        let balances = account
            .balances
            .into_iter()
            .map(AssetBalance::try_from)
            .collect::<Result<Vec<_>>>()?;

        assert_eq!(balances.len(), 2);
        assert_eq!(balances[1].asset, "LTC");
        assert_eq!(balances[1].total(), dec!(4763370.18006011));

        Ok(())
    }

    #[test]
    fn test_decode_position_risk() -> Result<()> {
        let body = r#"[{
            "entryPrice": "1900.0",
            "marginType": "cross",
            "isAutoAddMargin": "false",
            "isolatedMargin": "0.00000000",
            "leverage": "10",
            "liquidationPrice": "0",
            "markPrice": "2000.00000000",
            "maxNotionalValue": "2000000",
            "positionAmt": "-1.000",
            "notional": "-2000.0",
            "symbol": "ETHUSDT",
            "unRealizedProfit": "-100.00000000",
            "positionSide": "BOTH",
            "updateTime": 1625474304765
        }]"#;
        let positions: Vec<PositionRisk> = serde_json::from_str(body)?;
        let position = PositionRecord::try_from(positions[0].clone())?;

        assert_eq!(position.symbol.as_ref(), "ETHUSDT");
        assert_eq!(position.leverage, 10);
        assert_eq!(position.notional(), dec!(2000));
        assert_eq!(position.unrealized_pnl, dec!(-100));

        Ok(())
    }

    #[test]
    fn test_decode_coin_futures_balance() -> Result<()> {
        let body = r#"[{
            "accountAlias": "SgsR",
            "asset": "BTC",
            "balance": "0.00250000",
            "withdrawAvailable": "0.00250000",
            "crossWalletBalance": "0.00241969",
            "crossUnPnl": "0.00000000",
            "availableBalance": "0.00241969",
            "updateTime": 1592468353979
        }]"#;
        let balances: Vec<CoinFuturesBalance> = serde_json::from_str(body)?;
        let balance = FuturesBalance::try_from(balances[0].clone())?;

        assert_eq!(balance.asset, "BTC");
        assert_eq!(balance.balance, dec!(0.0025));
        assert_eq!(balance.cross_unrealized_pnl, Decimal::ZERO);

        Ok(())
    }

    #[test]
    fn test_invalid_number() {
        let balance = Balance {
            asset: "BTC".to_string(),
            free: "abc".to_string(),
            locked: "0".to_string(),
        };

        assert!(AssetBalance::try_from(balance).is_err());
    }
}
