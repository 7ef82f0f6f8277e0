use crate::BaseError;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use strum_macros::{AsRefStr, EnumIter, EnumString};

/// 账户类型，一次估值中的每条拉取分支都带着这个标签
#[derive(
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Clone,
    Copy,
    EnumString,
    AsRefStr,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Market {
    #[default]
    Spot, // 现货
    Margin, // 全仓杠杆
    Usdm,   // U本位合约
    Coinm,  // 币本位合约
}

impl Market {
    pub fn parse(value: impl AsRef<str>) -> Result<Self, BaseError> {
        let value = value.as_ref();
        Market::from_str(value).map_err(|_| BaseError::UnknownMarket(value.to_string()))
    }

    pub fn is_futures(&self) -> bool {
        matches!(self, Market::Usdm | Market::Coinm)
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_ref())
    }
}
