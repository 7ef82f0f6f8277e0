use crate::setting::Setting;
use anyhow::Result;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{sync::Arc, time::Duration};

#[derive(Debug)]
pub struct AppContext {
    pub setting: Setting,
    pub db: Arc<PgPool>,
}

impl AppContext {
    pub fn try_new() -> Result<Self> {
        let setting = Setting::try_new()?;

        Self::with_setting(setting)
    }

    // 连接池延迟建立，首次查询时才连接
    pub fn with_setting(setting: Setting) -> Result<Self> {
        let database = &setting.database;
        let db = PgPoolOptions::new()
            .max_connections(database.max_connections)
            .acquire_timeout(Duration::from_secs(database.acquire_timeout_secs))
            .connect_lazy(&database.url)?;

        Ok(Self {
            setting,
            db: Arc::new(db),
        })
    }
}
