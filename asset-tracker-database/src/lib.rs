pub mod account;
pub mod balance_history;
pub mod strategy;
pub mod user;

pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../migrations");

use bon::Builder;
use chrono::{DateTime, Utc};

/// 余额历史分页查询
#[derive(Debug, Clone, Builder)]
pub struct HistoryQuery {
    #[builder(default = 1)]
    pub page: i64,
    #[builder(default = 20)]
    pub page_size: i64,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl HistoryQuery {
    pub fn limit(&self) -> i64 {
        self.page_size.clamp(1, 500)
    }

    // 页码从 1 开始
    pub fn offset(&self) -> i64 {
        (self.page.max(1) - 1) * self.limit()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_query_paging() {
        let query = HistoryQuery::builder().build();
        assert_eq!(query.limit(), 20);
        assert_eq!(query.offset(), 0);

        let query = HistoryQuery::builder().page(3).page_size(50).build();
        assert_eq!(query.offset(), 100);

        let query = HistoryQuery::builder().page(0).page_size(10_000).build();
        assert_eq!(query.limit(), 500);
        assert_eq!(query.offset(), 0);
    }
}
