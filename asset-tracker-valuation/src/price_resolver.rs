use asset_tracker_exchange::client::SymbolPrice;
use bon::bon;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;

type PriceMapInner = HashMap<String, Decimal>;

/// 资产 => 计价货币价格，解析不到的资产不在表中
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PriceMap {
    inner: PriceMapInner,
}

impl AsRef<PriceMapInner> for PriceMap {
    fn as_ref(&self) -> &PriceMapInner {
        &self.inner
    }
}

impl PriceMap {
    pub fn new() -> Self {
        PriceMap {
            inner: HashMap::new(),
        }
    }

    // 只在解析时写入
    pub(crate) fn insert(&mut self, asset: impl Into<String>, price: Decimal) {
        self.inner.insert(asset.into(), price);
    }

    pub fn price(&self, asset: impl AsRef<str>) -> Option<&Decimal> {
        self.as_ref().get(asset.as_ref())
    }

    // 折算为计价货币，没有价格返回 None
    pub fn value_of(&self, asset: impl AsRef<str>, amount: Decimal) -> Option<Decimal> {
        self.price(asset).map(|price| amount * price)
    }

    pub fn len(&self) -> usize {
        self.as_ref().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_ref().is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, Decimal)> for PriceMap {
    fn from_iter<T: IntoIterator<Item = (S, Decimal)>>(iter: T) -> Self {
        PriceMap {
            inner: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// 用全量行情构建价格表：直接交易对优先，其次按顺序尝试中间货币
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceResolver {
    currency: String,           // 计价货币
    bridge_assets: Vec<String>, // 中间货币，按优先级排列
}

#[bon]
impl PriceResolver {
    #[builder(on(String, into))]
    pub fn new(
        currency: String,
        #[builder(default = vec!["BTC".to_string(), "ETH".to_string()])] bridge_assets: Vec<String>,
    ) -> Self {
        PriceResolver {
            currency: currency.to_uppercase(),
            bridge_assets: bridge_assets
                .into_iter()
                .map(|asset| asset.to_uppercase())
                .collect(),
        }
    }
}

impl PriceResolver {
    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn bridge_assets(&self) -> &[String] {
        &self.bridge_assets
    }

    pub fn resolve(&self, tickers: &[SymbolPrice]) -> PriceMap {
        let mut prices = PriceMap::new();

        // 1. 直接以计价货币报价的交易对
        for ticker in tickers {
            if let Some(base_asset) = ticker.symbol.base_asset(&self.currency) {
                prices.insert(base_asset, ticker.price);
            }
        }

        // 中间货币只用直接报价，不经过其他中间货币
        let direct = prices.clone();

        // 2. 通过中间货币换算，先到先得
        for bridge in &self.bridge_assets {
            let Some(bridge_price) = direct.price(bridge).copied() else {
                continue;
            };

            for ticker in tickers {
                let Some(base_asset) = ticker.symbol.base_asset(bridge) else {
                    continue;
                };

                if base_asset == self.currency || prices.price(base_asset).is_some() {
                    continue;
                }

                prices.insert(base_asset, ticker.price * bridge_price);
            }
        }

        prices.insert(self.currency.clone(), Decimal::ONE);

        prices
    }

    // 行情获取失败时，只有计价货币本身有价格
    pub fn degraded(&self) -> PriceMap {
        PriceMap::from_iter([(self.currency.clone(), Decimal::ONE)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn gen_resolver() -> PriceResolver {
        PriceResolver::builder().currency("USDT").build()
    }

    fn tickers(items: &[(&str, Decimal)]) -> Vec<SymbolPrice> {
        items
            .iter()
            .map(|(symbol, price)| SymbolPrice::new(*symbol, *price))
            .collect()
    }

    #[test]
    fn test_resolve_direct_pairs() {
        let prices = gen_resolver().resolve(&tickers(&[
            ("BTCUSDT", dec!(50000)),
            ("ETHUSDT", dec!(2000)),
            ("ETHBTC", dec!(0.05)),
        ]));

        assert_eq!(prices.price("BTC"), Some(&dec!(50000)));
        assert_eq!(prices.price("ETH"), Some(&dec!(2000)));
        assert_eq!(prices.price("USDT"), Some(&dec!(1)));
        assert_eq!(prices.len(), 3);
    }

    #[test]
    fn test_resolve_bridge_through_eth() {
        let prices = gen_resolver().resolve(&tickers(&[
            ("ETHUSDT", dec!(2000)),
            ("ADAETH", dec!(0.0003)),
        ]));

        assert_eq!(prices.price("ADA"), Some(&dec!(0.6)));
    }

    #[test]
    fn test_resolve_bridge_priority() {
        // BTC 优先于 ETH
        let prices = gen_resolver().resolve(&tickers(&[
            ("BTCUSDT", dec!(50000)),
            ("ETHUSDT", dec!(2000)),
            ("XRPETH", dec!(0.0003)),
            ("XRPBTC", dec!(0.00001)),
        ]));
        assert_eq!(prices.price("XRP"), Some(&dec!(0.5)));

        let resolver = PriceResolver::builder()
            .currency("USDT")
            .bridge_assets(vec!["ETH".to_string(), "BTC".to_string()])
            .build();
        let prices = resolver.resolve(&tickers(&[
            ("BTCUSDT", dec!(50000)),
            ("ETHUSDT", dec!(2000)),
            ("XRPETH", dec!(0.0003)),
            ("XRPBTC", dec!(0.00001)),
        ]));
        assert_eq!(prices.price("XRP"), Some(&dec!(0.6)));
    }

    #[test]
    fn test_resolve_bridge_requires_direct_price() {
        // ETH 经 BTC 换算得到价格，但不能再作为 ADA 的中间货币
        let prices = gen_resolver().resolve(&tickers(&[
            ("BTCUSDT", dec!(50000)),
            ("ETHBTC", dec!(0.05)),
            ("ADAETH", dec!(0.0003)),
        ]));

        assert_eq!(prices.price("ETH"), Some(&dec!(2500)));
        assert_eq!(prices.price("ADA"), None);

        let resolver = PriceResolver::builder()
            .currency("USDT")
            .bridge_assets(vec!["ETH".to_string(), "BTC".to_string()])
            .build();
        let reversed = resolver.resolve(&tickers(&[
            ("BTCUSDT", dec!(50000)),
            ("ETHBTC", dec!(0.05)),
            ("ADAETH", dec!(0.0003)),
        ]));

        assert_eq!(reversed, prices);
    }

    #[test]
    fn test_resolve_direct_wins_over_bridge() {
        let prices = gen_resolver().resolve(&tickers(&[
            ("BTCUSDT", dec!(50000)),
            ("SOLBTC", dec!(0.002)),
            ("SOLUSDT", dec!(99)),
        ]));

        assert_eq!(prices.price("SOL"), Some(&dec!(99)));
    }

    #[test]
    fn test_resolve_unpriced_asset() {
        // 中间货币自身没有价格时无法换算
        let prices = gen_resolver().resolve(&tickers(&[("DOTBNB", dec!(0.01))]));

        assert_eq!(prices.price("DOT"), None);
        assert_eq!(prices.price("USDT"), Some(&dec!(1)));
    }

    #[test]
    fn test_resolve_valuation_currency_override() {
        // 计价货币固定为 1，即使行情里有相反的报价
        let prices = gen_resolver().resolve(&tickers(&[
            ("BTCUSDT", dec!(50000)),
            ("USDTBTC", dec!(0.00002)),
        ]));

        assert_eq!(prices.price("USDT"), Some(&dec!(1)));
    }

    #[test]
    fn test_degraded() {
        let prices = gen_resolver().degraded();

        assert_eq!(prices.len(), 1);
        assert_eq!(prices.value_of("USDT", dec!(12.5)), Some(dec!(12.5)));
        assert_eq!(prices.value_of("BTC", dec!(1)), None);
    }
}
