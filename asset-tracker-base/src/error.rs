use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BaseError {
    #[error("unsupported exchange: {0}")]
    UnsupportedExchange(String),

    #[error("unknown market: {0}")]
    UnknownMarket(String),

    #[error("invalid credential {label}: {reason}")]
    InvalidCredential { label: String, reason: String },
}
