use super::Exchange;
use crate::BaseError;
use bon::Builder;
use rust_decimal::Decimal;
use std::fmt;

/// 一组交易所 API 凭证（策略），估值引擎只读
#[derive(Builder, Clone, PartialEq, Eq)]
#[builder(on(String, into))]
pub struct Credential {
    #[builder(default)]
    pub id: i32, // 策略ID
    #[builder(default)]
    pub account_id: i32, // 所属账户ID
    pub label: String, // 策略名称
    #[builder(default)]
    pub exchange: Exchange, // 交易所
    pub api_key: String,
    pub secret_key: String,
    pub passphrase: Option<String>,
    #[builder(default)]
    pub initial_value: Decimal, // 预设余额（基准）
}

impl Credential {
    pub fn validate(&self) -> Result<(), BaseError> {
        let invalid = |reason: &str| BaseError::InvalidCredential {
            label: self.label.clone(),
            reason: reason.to_string(),
        };

        if self.api_key.trim().is_empty() {
            return Err(invalid("api key is empty"));
        }

        if self.secret_key.trim().is_empty() {
            return Err(invalid("secret key is empty"));
        }

        if self.exchange.requires_passphrase()
            && self.passphrase.as_deref().map_or(true, str::is_empty)
        {
            return Err(invalid("passphrase is required"));
        }

        if self.initial_value.is_sign_negative() {
            return Err(invalid("initial value is negative"));
        }

        Ok(())
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("id", &self.id)
            .field("account_id", &self.account_id)
            .field("label", &self.label)
            .field("exchange", &self.exchange)
            .field("api_key", &self.api_key)
            .field("secret_key", &"***")
            .field("passphrase", &self.passphrase.as_ref().map(|_| "***"))
            .field("initial_value", &self.initial_value)
            .finish()
    }
}
