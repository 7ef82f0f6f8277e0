use serde::{Deserialize, Serialize};
use std::fmt;

/// 交易对，例如 `BTCUSDT`
#[derive(Default, Serialize, Deserialize, PartialEq, Eq, Hash, Debug, Clone)]
pub struct Symbol(String);

impl Symbol {
    pub fn new(s: impl Into<String>) -> Self {
        Symbol(s.into().to_uppercase())
    }

    // 按计价资产拆出基础资产，`ADAETH` + `ETH` => `ADA`
    pub fn base_asset(&self, quote_asset: &str) -> Option<&str> {
        self.0
            .strip_suffix(quote_asset)
            .filter(|base_asset| !base_asset.is_empty())
    }
}

impl From<String> for Symbol {
    fn from(value: String) -> Self {
        Symbol::new(value)
    }
}

impl From<&str> for Symbol {
    fn from(value: &str) -> Self {
        Symbol::new(value)
    }
}

impl From<Symbol> for String {
    fn from(value: Symbol) -> Self {
        value.0
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
