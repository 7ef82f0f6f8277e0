use config::{Config, ConfigError, Environment, File, FileFormat, Source};
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Setting {
    pub debug: bool,
    pub database: Database,
    pub valuation: Valuation,
    pub client: Client,
    pub snapshot: Snapshot,
    pub telemetry: Telemetry,
    #[serde(default)]
    pub auth: Auth,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Database {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,
}

fn default_max_connections() -> u32 {
    10
}

fn default_acquire_timeout_secs() -> u64 {
    5
}

#[derive(Debug, Clone, Deserialize)]
pub struct Valuation {
    pub currency: String,           // 计价货币
    pub bridge_assets: Vec<String>, // 中间货币，按优先级
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Client {
    pub timeout_secs: u64,
    pub retry_max_retries: u64,
    pub retry_wait_secs: u64,
}

// 每日快照时间，UTC
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Snapshot {
    pub hour: u32,
    pub minute: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Telemetry {
    pub service_name: String,
    pub log_dir: String,
    pub otlp_endpoint: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Auth {
    pub admin_token_hash: Option<String>, // 管理员令牌的 SHA-256
}

impl Setting {
    pub fn try_new() -> Result<Self, ConfigError> {
        // .env 文件可选
        dotenvy::dotenv().ok();

        let run_mode = env::var("RUN_MODE").unwrap_or("dev".to_string());

        Self::from_sources(vec![
            Box::new(File::with_name("config/default.toml")),
            // 当前环境的配置文件，可选
            Box::new(File::with_name(&format!("config/{}.toml", run_mode)).required(false)),
            // 本地配置，不提交
            Box::new(File::with_name("config/local.toml").required(false)),
            // 环境变量，例如 `APP_VALUATION__CURRENCY=USDC`
            Box::new(
                Environment::with_prefix("app")
                    .prefix_separator("_")
                    .separator("__"),
            ),
        ])
    }

    fn from_sources(sources: Vec<Box<dyn Source + Send + Sync>>) -> Result<Self, ConfigError> {
        let config = Config::builder().add_source(sources).build()?;

        let setting: Setting = config.try_deserialize()?;
        setting.validate()?;

        Ok(setting)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Self::from_sources(vec![Box::new(File::from_str(content, FileFormat::Toml))])
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let currency = self.valuation.currency.trim();

        if currency.is_empty() {
            return Err(ConfigError::Message(
                "valuation.currency must not be empty".to_string(),
            ));
        }

        if self
            .valuation
            .bridge_assets
            .iter()
            .any(|asset| asset.eq_ignore_ascii_case(currency))
        {
            return Err(ConfigError::Message(format!(
                "valuation.bridge_assets must not contain {}",
                currency
            )));
        }

        if self.database.max_connections == 0 {
            return Err(ConfigError::Message(
                "database.max_connections must be at least 1".to_string(),
            ));
        }

        if self.snapshot.hour > 23 || self.snapshot.minute > 59 {
            return Err(ConfigError::Message(format!(
                "invalid snapshot time {}:{}",
                self.snapshot.hour, self.snapshot.minute
            )));
        }

        Ok(())
    }
}
