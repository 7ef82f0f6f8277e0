use asset_tracker_base::{BaseError, Exchange};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValuationError {
    #[error("exchange not registered: {0}")]
    UnregisteredExchange(Exchange),

    #[error(transparent)]
    InvalidCredential(#[from] BaseError),

    #[error("every account request failed: {0}")]
    AllLegsFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valuation_error() {
        let err: ValuationError = BaseError::InvalidCredential {
            label: "main".to_string(),
            reason: "api key is empty".to_string(),
        }
        .into();

        assert_eq!(
            err.to_string(),
            "invalid credential main: api key is empty"
        );
    }
}
