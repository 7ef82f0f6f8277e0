use crate::BaseError;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use strum_macros::{AsRefStr, EnumIter, EnumString};

#[derive(
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Clone,
    Copy,
    EnumString,
    AsRefStr,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Exchange {
    #[default]
    Binance,
}

impl Exchange {
    pub fn symbol(&self, base_asset: &str, quote_asset: &str) -> String {
        match self {
            Exchange::Binance => format!("{}{}", base_asset, quote_asset).to_uppercase(),
        }
    }

    // 是否需要 passphrase
    pub fn requires_passphrase(&self) -> bool {
        match self {
            Exchange::Binance => false,
        }
    }

    pub fn parse(value: impl AsRef<str>) -> Result<Self, BaseError> {
        let value = value.as_ref().trim();
        Exchange::from_str(value).map_err(|_| BaseError::UnsupportedExchange(value.to_string()))
    }
}

impl TryFrom<String> for Exchange {
    type Error = BaseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Exchange::parse(value)
    }
}

impl From<Exchange> for String {
    fn from(value: Exchange) -> Self {
        value.as_ref().to_string()
    }
}

impl fmt::Display for Exchange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_ref())
    }
}
