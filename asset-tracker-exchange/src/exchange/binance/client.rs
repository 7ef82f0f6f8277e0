use super::{CoinFutures, Futures, Margin, Spot};
use crate::client::ClientError;
use anyhow::Result;
use bon::bon;
use chrono::Utc;
use hmac::{Hmac, Mac};
use serde::de::DeserializeOwned;
use sha2::Sha256;
use std::fmt;
use tracing::{debug, instrument};

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub rest_api_endpoint: String,              // 现货、杠杆
    pub futures_rest_api_endpoint: String,      // U本位合约
    pub coin_futures_rest_api_endpoint: String, // 币本位合约
    pub recv_window: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            rest_api_endpoint: "https://api.binance.com".to_string(),
            futures_rest_api_endpoint: "https://fapi.binance.com".to_string(),
            coin_futures_rest_api_endpoint: "https://dapi.binance.com".to_string(),
            recv_window: 5000,
        }
    }
}

/// 币安 REST 客户端，一组 API key 对应一个实例，内部的连接池在各个市场之间复用
#[derive(Clone)]
pub struct BinanceClient {
    pub(crate) api_key: Option<String>,
    pub(crate) secret_key: Option<String>,
    pub(crate) config: Config,
    http: reqwest::Client,
}

#[bon]
impl BinanceClient {
    #[builder(on(String, into))]
    pub fn new(
        api_key: Option<String>,
        secret_key: Option<String>,
        config: Option<Config>,
    ) -> Self {
        BinanceClient {
            api_key,
            secret_key,
            config: config.unwrap_or_default(),
            http: reqwest::Client::new(),
        }
    }

    pub fn spot(&self) -> Spot<'_> {
        Spot::new(self)
    }

    pub fn margin(&self) -> Margin<'_> {
        Margin::new(self)
    }

    pub fn futures(&self) -> Futures<'_> {
        Futures::new(self)
    }

    pub fn coin_futures(&self) -> CoinFutures<'_> {
        CoinFutures::new(self)
    }

    #[instrument(name = "binance_get", skip(self))]
    pub(crate) async fn get<T: DeserializeOwned>(&self, host: &str, path: &str) -> Result<T> {
        let url = format!("{}{}", host, path);

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(ClientError::RequestError)?;

        Self::handle_response(response).await
    }

    // 签名参数不进入日志
    #[instrument(name = "binance_get_signed", skip(self, params))]
    pub(crate) async fn get_signed<T: DeserializeOwned>(
        &self,
        host: &str,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T> {
        let (Some(api_key), Some(secret_key)) = (&self.api_key, &self.secret_key) else {
            return Err(ClientError::MissingCredentials.into());
        };

        let query = self.signed_query(secret_key, params, Utc::now().timestamp_millis())?;
        let url = format!("{}{}?{}", host, path, query);

        let response = self
            .http
            .get(&url)
            .header("X-MBX-APIKEY", api_key)
            .send()
            .await
            .map_err(ClientError::RequestError)?;

        Self::handle_response(response).await
    }

    fn signed_query(
        &self,
        secret_key: &str,
        params: &[(&str, &str)],
        timestamp: i64,
    ) -> Result<String, ClientError> {
        let mut pairs: Vec<String> = params.iter().map(|(k, v)| format!("{k}={v}")).collect();
        pairs.push(format!("recvWindow={}", self.config.recv_window));
        pairs.push(format!("timestamp={timestamp}"));

        let query = pairs.join("&");
        let signature = sign(secret_key, &query)?;

        Ok(format!("{query}&signature={signature}"))
    }

    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        let body = response.text().await.map_err(ClientError::RequestError)?;
        debug!(status = status.as_u16(), len = body.len(), "binance response");

        if !status.is_success() {
            return Err(ClientError::from_response(status.as_u16(), body).into());
        }

        let data = serde_json::from_str(&body).map_err(ClientError::DecodeError)?;

        Ok(data)
    }
}

impl fmt::Debug for BinanceClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinanceClient")
            .field("api_key", &self.api_key)
            .field("secret_key", &self.secret_key.as_ref().map(|_| "***"))
            .field("config", &self.config)
            .finish()
    }
}

// HMAC-SHA256 签名，十六进制输出
pub(crate) fn sign(secret_key: &str, payload: &str) -> Result<String, ClientError> {
    let mut mac = HmacSha256::new_from_slice(secret_key.as_bytes())
        .map_err(|e| ClientError::SignatureError(e.to_string()))?;
    mac.update(payload.as_bytes());

    Ok(hex::encode(mac.finalize().into_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET_KEY: &str = "NhqPtmdSJYdKjVHjA7PZj4Mge3R5YNiP1e3UZjInClVN65XAbvqqM6A7H5fATj0j";

    #[test]
    fn test_sign() -> Result<()> {
        // 币安文档中的签名示例
        let payload = "symbol=LTCBTC&side=BUY&type=LIMIT&timeInForce=GTC&quantity=1&price=0.1&recvWindow=5000&timestamp=1499827319559";
        let signature = sign(SECRET_KEY, payload)?;

        assert_eq!(
            signature,
            "c8db56825ae71d6d79447849e617115f4a920fa2acdcab2b053c4b2838bd6b71"
        );

        Ok(())
    }

    #[test]
    fn test_signed_query() -> Result<()> {
        let client = BinanceClient::builder()
            .api_key("key")
            .secret_key(SECRET_KEY)
            .build();

        let query = client.signed_query(SECRET_KEY, &[("omitZeroBalances", "true")], 1499827319559)?;
        let (payload, signature) = query
            .split_once("&signature=")
            .ok_or_else(|| anyhow::anyhow!("signature missing"))?;

        assert_eq!(
            payload,
            "omitZeroBalances=true&recvWindow=5000&timestamp=1499827319559"
        );
        assert_eq!(signature, sign(SECRET_KEY, payload)?);

        Ok(())
    }

    #[tokio::test]
    async fn test_get_signed_without_credentials() {
        let client = BinanceClient::builder().build();
        let result: Result<serde_json::Value> = client
            .get_signed("http://127.0.0.1:9", "/api/v3/account", &[])
            .await;

        let err = result.unwrap_err();
        assert_eq!(err.to_string(), "missing api key or secret key");
    }

    #[test]
    fn test_debug_hides_secret() {
        let client = BinanceClient::builder()
            .api_key("key")
            .secret_key("top-secret")
            .build();

        assert!(!format!("{:?}", client).contains("top-secret"));
    }
}
