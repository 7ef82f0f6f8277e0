use serde::Deserialize;
use thiserror::Error;

// 币安接口返回的错误体
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub(crate) struct BinanceContentError {
    pub code: i64,
    pub msg: String,
}

#[derive(Error, Debug)]
pub(crate) enum ClientError {
    #[error("binance error: {}", .0.msg)]
    BinanceError(BinanceContentError),

    #[error("http status {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("request error: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("decode error: {0}")]
    DecodeError(#[from] serde_json::Error),

    #[error("invalid secret key: {0}")]
    SignatureError(String),

    #[error("missing api key or secret key")]
    MissingCredentials,
}

impl ClientError {
    // 非 2xx 响应，优先解析币安的错误体
    pub(crate) fn from_response(status: u16, body: String) -> Self {
        match serde_json::from_str::<BinanceContentError>(&body) {
            Ok(content) => ClientError::BinanceError(content),
            Err(_) => ClientError::HttpStatus { status, body },
        }
    }
}
