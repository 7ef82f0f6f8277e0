use anyhow::{anyhow, Result};
use chrono::{DateTime, Duration, NaiveTime, Utc};

// 下一次执行时间，严格晚于 now
pub fn next_run_after(now: DateTime<Utc>, hour: u32, minute: u32) -> Result<DateTime<Utc>> {
    let time = NaiveTime::from_hms_opt(hour, minute, 0)
        .ok_or_else(|| anyhow!("invalid schedule time {}:{}", hour, minute))?;

    let today = now.date_naive().and_time(time).and_utc();

    if today > now {
        Ok(today)
    } else {
        Ok(today + Duration::days(1))
    }
}
