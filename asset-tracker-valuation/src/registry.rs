use crate::error::ValuationError;
use asset_tracker_base::{Credential, Exchange};
use asset_tracker_exchange::client::{AccountClientKind, BinanceAccountClient};
use std::{collections::HashMap, fmt};

/// 按凭证创建客户端，每组凭证一个独立实例
pub trait ClientFactory {
    fn create(&self, credential: &Credential) -> Result<AccountClientKind, ValuationError>;
}

type ClientConstructor = fn(&Credential) -> AccountClientKind;

fn binance_client(credential: &Credential) -> AccountClientKind {
    BinanceAccountClient::from(credential).into()
}

#[derive(Clone)]
pub struct ExchangeRegistry {
    constructors: HashMap<Exchange, ClientConstructor>,
}

impl ExchangeRegistry {
    pub fn new() -> Self {
        ExchangeRegistry {
            constructors: HashMap::new(),
        }
    }

    pub fn register(mut self, exchange: Exchange, constructor: ClientConstructor) -> Self {
        self.constructors.insert(exchange, constructor);
        self
    }

    pub fn contains(&self, exchange: &Exchange) -> bool {
        self.constructors.contains_key(exchange)
    }

    // 估值前校验：交易所已注册，凭证字段齐全
    pub fn validate(&self, credential: &Credential) -> Result<(), ValuationError> {
        if !self.contains(&credential.exchange) {
            return Err(ValuationError::UnregisteredExchange(credential.exchange));
        }

        credential.validate()?;

        Ok(())
    }
}

impl fmt::Debug for ExchangeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.constructors.keys()).finish()
    }
}

impl Default for ExchangeRegistry {
    fn default() -> Self {
        ExchangeRegistry::new().register(Exchange::Binance, binance_client)
    }
}

impl ClientFactory for ExchangeRegistry {
    fn create(&self, credential: &Credential) -> Result<AccountClientKind, ValuationError> {
        self.validate(credential)?;

        let constructor = self
            .constructors
            .get(&credential.exchange)
            .ok_or(ValuationError::UnregisteredExchange(credential.exchange))?;

        Ok(constructor(credential))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use asset_tracker_base::BaseError;

    fn gen_credential() -> Credential {
        Credential::builder()
            .label("main")
            .api_key("key")
            .secret_key("secret")
            .build()
    }

    #[test]
    fn test_registry_create() {
        let registry = ExchangeRegistry::default();
        let client = registry.create(&gen_credential());

        assert!(matches!(
            client,
            Ok(AccountClientKind::BinanceAccountClient(_))
        ));
    }

    #[test]
    fn test_registry_unregistered() {
        let registry = ExchangeRegistry::new();

        assert_eq!(
            registry.validate(&gen_credential()),
            Err(ValuationError::UnregisteredExchange(Exchange::Binance))
        );
    }

    #[test]
    fn test_registry_invalid_credential() {
        let credential = Credential {
            secret_key: String::new(),
            ..gen_credential()
        };

        assert_eq!(
            ExchangeRegistry::default().validate(&credential),
            Err(ValuationError::InvalidCredential(
                BaseError::InvalidCredential {
                    label: "main".to_string(),
                    reason: "secret key is empty".to_string(),
                }
            ))
        );
    }
}
