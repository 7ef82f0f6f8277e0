use crate::{
    fetcher::{AccountLegs, Leg},
    price_resolver::PriceMap,
};
use asset_tracker_exchange::client::UsdmAccount;
use rust_decimal::Decimal;
use serde::Serialize;

/// 有持仓但没有价格的资产，按 0 计入
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceGap {
    pub leg: Leg,
    pub asset: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FuturesBreakdown {
    pub linear_notional: Decimal,       // U本位持仓名义价值
    pub linear_unrealized_pnl: Decimal, // U本位未实现盈亏
    pub linear_value: Decimal,          // 名义价值 + 未实现盈亏
    pub inverse_value: Decimal,         // 币本位折算价值
    pub usdm_account: Option<UsdmAccount>, // 仅展示，不计入合计
}

impl FuturesBreakdown {
    pub fn total(&self) -> Decimal {
        self.linear_value + self.inverse_value
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountValuation {
    pub currency: String,
    pub spot_value: Decimal,
    pub margin_value: Decimal,
    pub futures_value: Decimal,
    pub total_value: Decimal,
    pub futures: FuturesBreakdown,
    pub price_gaps: Vec<PriceGap>,
    pub failed_legs: Vec<Leg>,
    pub prices_degraded: bool, // 行情获取失败
}

/// 汇总各账户维度，纯计算
pub fn aggregate(legs: &AccountLegs, prices: &PriceMap, currency: &str) -> AccountValuation {
    let mut price_gaps = Vec::new();

    let mut value_of = |leg: Leg, asset: &str, amount: Decimal| match prices.value_of(asset, amount)
    {
        Some(value) => value,
        None => {
            price_gaps.push(PriceGap {
                leg,
                asset: asset.to_string(),
                amount,
            });
            Decimal::ZERO
        }
    };

    let spot_value = legs
        .spot
        .fetched()
        .into_iter()
        .flatten()
        .map(|balance| value_of(Leg::Spot, &balance.asset, balance.total()))
        .sum::<Decimal>();

    let margin_value = legs
        .margin
        .fetched()
        .into_iter()
        .flatten()
        .map(|asset| value_of(Leg::Margin, &asset.asset, asset.net_asset))
        .sum::<Decimal>();

    let inverse_value = legs
        .coinm
        .fetched()
        .into_iter()
        .flatten()
        .filter(|balance| !balance.equity().is_zero())
        .map(|balance| value_of(Leg::Coinm, &balance.asset, balance.equity()))
        .sum::<Decimal>();

    let positions = legs.positions.fetched().into_iter().flatten();
    let (linear_notional, linear_unrealized_pnl) = positions.fold(
        (Decimal::ZERO, Decimal::ZERO),
        |(notional, pnl), position| {
            (
                notional + position.notional(),
                pnl + position.unrealized_pnl,
            )
        },
    );

    let futures = FuturesBreakdown {
        linear_notional,
        linear_unrealized_pnl,
        linear_value: linear_notional + linear_unrealized_pnl,
        inverse_value,
        usdm_account: legs.usdm_account.fetched().cloned(),
    };
    let futures_value = futures.total();

    let failed_legs = legs
        .failures()
        .into_iter()
        .map(|(leg, _)| leg)
        .collect::<Vec<_>>();

    AccountValuation {
        currency: currency.to_string(),
        spot_value,
        margin_value,
        futures_value,
        total_value: spot_value + margin_value + futures_value,
        futures,
        price_gaps,
        prices_degraded: failed_legs.contains(&Leg::Tickers),
        failed_legs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::LegResult;
    use asset_tracker_exchange::client::{
        AssetBalance, FuturesBalance, MarginAsset, PositionRecord,
    };
    use rust_decimal_macros::dec;

    fn empty_legs() -> AccountLegs {
        AccountLegs {
            tickers: LegResult::Fetched(vec![]),
            spot: LegResult::Fetched(vec![]),
            margin: LegResult::Fetched(vec![]),
            usdm_account: LegResult::Fetched(UsdmAccount::default()),
            coinm: LegResult::Fetched(vec![]),
            positions: LegResult::Fetched(vec![]),
        }
    }

    fn gen_prices() -> PriceMap {
        PriceMap::from_iter([
            ("USDT", dec!(1)),
            ("ADA", dec!(0.6)),
            ("BTC", dec!(50000)),
        ])
    }

    #[test]
    fn test_aggregate_spot() {
        let legs = AccountLegs {
            spot: LegResult::Fetched(vec![
                AssetBalance::new("USDT", dec!(100), dec!(0)),
                AssetBalance::new("ADA", dec!(40), dec!(10)),
            ]),
            ..empty_legs()
        };

        let valuation = aggregate(&legs, &gen_prices(), "USDT");

        assert_eq!(valuation.spot_value, dec!(130));
        assert_eq!(valuation.total_value, dec!(130));
        assert!(valuation.price_gaps.is_empty());
    }

    #[test]
    fn test_aggregate_linear_futures() {
        let legs = AccountLegs {
            positions: LegResult::Fetched(vec![PositionRecord::builder()
                .symbol("ETHUSDT")
                .position_amount(dec!(1))
                .entry_price(dec!(1990))
                .mark_price(dec!(2000))
                .unrealized_pnl(dec!(10))
                .build()]),
            ..empty_legs()
        };

        let valuation = aggregate(&legs, &gen_prices(), "USDT");

        assert_eq!(valuation.futures.linear_notional, dec!(2000));
        assert_eq!(valuation.futures_value, dec!(2010));
        assert_eq!(valuation.total_value, dec!(2010));
    }

    #[test]
    fn test_aggregate_short_position() {
        let legs = AccountLegs {
            positions: LegResult::Fetched(vec![PositionRecord::builder()
                .symbol("BTCUSDT")
                .position_amount(dec!(-0.1))
                .entry_price(dec!(51000))
                .mark_price(dec!(50000))
                .unrealized_pnl(dec!(100))
                .build()]),
            ..empty_legs()
        };

        let valuation = aggregate(&legs, &gen_prices(), "USDT");

        assert_eq!(valuation.futures.linear_notional, dec!(5000));
        assert_eq!(valuation.futures_value, dec!(5100));
    }

    #[test]
    fn test_aggregate_margin_and_inverse() {
        let legs = AccountLegs {
            margin: LegResult::Fetched(vec![
                MarginAsset::new("BTC", dec!(0.1)),
                MarginAsset::new("USDT", dec!(-1000)),
            ]),
            coinm: LegResult::Fetched(vec![FuturesBalance::new("BTC", dec!(0.02), dec!(-0.001))]),
            ..empty_legs()
        };

        let valuation = aggregate(&legs, &gen_prices(), "USDT");

        assert_eq!(valuation.margin_value, dec!(4000));
        assert_eq!(valuation.futures.inverse_value, dec!(950));
        assert_eq!(valuation.futures_value, dec!(950));
        assert_eq!(valuation.total_value, dec!(4950));
    }

    #[test]
    fn test_aggregate_price_gap() {
        let legs = AccountLegs {
            spot: LegResult::Fetched(vec![
                AssetBalance::new("USDT", dec!(10), dec!(0)),
                AssetBalance::new("XYZ", dec!(5), dec!(0)),
            ]),
            coinm: LegResult::Fetched(vec![FuturesBalance::new("DOT", dec!(3), dec!(0))]),
            ..empty_legs()
        };

        let valuation = aggregate(&legs, &gen_prices(), "USDT");

        assert_eq!(valuation.spot_value, dec!(10));
        assert_eq!(
            valuation.price_gaps,
            vec![
                PriceGap {
                    leg: Leg::Spot,
                    asset: "XYZ".to_string(),
                    amount: dec!(5),
                },
                PriceGap {
                    leg: Leg::Coinm,
                    asset: "DOT".to_string(),
                    amount: dec!(3),
                },
            ]
        );
    }

    #[test]
    fn test_aggregate_failed_leg_counts_zero() {
        let legs = AccountLegs {
            tickers: LegResult::Failed("timeout".to_string()),
            spot: LegResult::Fetched(vec![AssetBalance::new("USDT", dec!(10), dec!(0))]),
            margin: LegResult::Failed("forbidden".to_string()),
            ..empty_legs()
        };

        let valuation = aggregate(&legs, &gen_prices(), "USDT");

        assert_eq!(valuation.margin_value, Decimal::ZERO);
        assert_eq!(valuation.total_value, dec!(10));
        assert_eq!(valuation.failed_legs, vec![Leg::Tickers, Leg::Margin]);
        assert!(valuation.prices_degraded);
    }

    #[test]
    fn test_aggregate_deterministic() {
        let legs = AccountLegs {
            spot: LegResult::Fetched(vec![
                AssetBalance::new("ADA", dec!(33.3), dec!(0)),
                AssetBalance::new("BTC", dec!(0.0012345), dec!(0)),
            ]),
            margin: LegResult::Fetched(vec![MarginAsset::new("ADA", dec!(-1.1))]),
            ..empty_legs()
        };
        let prices = gen_prices();

        let first = aggregate(&legs, &prices, "USDT");
        let second = aggregate(&legs, &prices, "USDT");

        assert_eq!(first, second);
        assert_eq!(
            first.total_value,
            first.spot_value + first.margin_value + first.futures_value
        );
    }
}
