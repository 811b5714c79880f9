use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveTime, Utc};
use paisa_core::config::{ConfigError, SessionConfig};

/// # Summary
/// 交易时段时钟：固定时区偏移下的工作日 + 开收盘窗口判定。
/// 纯时间函数，不触发任何副作用。
///
/// # Invariants
/// - 目标市场使用无夏令时的固定 UTC 偏移。
/// - 工作日集合固定为周一至周五。
/// - 收盘时刻同时是当日汇总的触发线。
#[derive(Debug, Clone)]
pub struct MarketSession {
    offset: FixedOffset,
    open: NaiveTime,
    close: NaiveTime,
}

impl MarketSession {
    /// # Summary
    /// 由配置构造交易时段。
    ///
    /// # Logic
    /// 1. 将分钟偏移换算为 `FixedOffset`。
    /// 2. 按 `HH:MM` 解析开收盘时刻。
    /// 3. 开盘必须早于收盘。
    ///
    /// # Arguments
    /// * `config` - 交易时段配置段。
    ///
    /// # Returns
    /// * 会话实例或 `ConfigError::InvalidSession`。
    pub fn from_config(config: &SessionConfig) -> Result<Self, ConfigError> {
        let offset = FixedOffset::east_opt(config.utc_offset_minutes * 60).ok_or_else(|| {
            ConfigError::InvalidSession(format!(
                "utc_offset_minutes {} out of range",
                config.utc_offset_minutes
            ))
        })?;
        let open = NaiveTime::parse_from_str(&config.open, "%H:%M")
            .map_err(|e| ConfigError::InvalidSession(format!("open '{}': {}", config.open, e)))?;
        let close = NaiveTime::parse_from_str(&config.close, "%H:%M")
            .map_err(|e| ConfigError::InvalidSession(format!("close '{}': {}", config.close, e)))?;
        if open >= close {
            return Err(ConfigError::InvalidSession(
                "open must be before close".to_string(),
            ));
        }
        Ok(Self {
            offset,
            open,
            close,
        })
    }

    /// 将 UTC 时刻换算到行情时区
    pub fn local(&self, now: DateTime<Utc>) -> DateTime<FixedOffset> {
        now.with_timezone(&self.offset)
    }

    /// 行情时区下的交易日，作为状态存储的日期键
    pub fn trading_date(&self, now: DateTime<Utc>) -> NaiveDate {
        self.local(now).date_naive()
    }

    /// 当前是否为交易工作日（周一至周五）
    fn is_trading_day(&self, now: DateTime<Utc>) -> bool {
        self.local(now).weekday().number_from_monday() <= 5
    }

    /// # Summary
    /// 当前是否处于盘中。
    ///
    /// # Logic
    /// 工作日且当地时刻落在 [开盘, 收盘] 闭区间内。
    ///
    /// # Arguments
    /// * `now` - 当前 UTC 时刻。
    ///
    /// # Returns
    /// * 盘中返回 true。
    pub fn is_open(&self, now: DateTime<Utc>) -> bool {
        if !self.is_trading_day(now) {
            return false;
        }
        let t = self.local(now).time();
        self.open <= t && t <= self.close
    }

    /// # Summary
    /// 当前是否已过当日收盘（汇总触发线）。
    ///
    /// # Logic
    /// 工作日且当地时刻不早于收盘时刻。非交易日不触发汇总。
    ///
    /// # Arguments
    /// * `now` - 当前 UTC 时刻。
    ///
    /// # Returns
    /// * 已过收盘返回 true。
    pub fn is_past_close(&self, now: DateTime<Utc>) -> bool {
        self.is_trading_day(now) && self.local(now).time() >= self.close
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use paisa_core::config::AppConfig;

    fn session() -> MarketSession {
        MarketSession::from_config(&AppConfig::default().session).unwrap()
    }

    /// IST 当地时刻构造对应的 UTC 时刻（IST = UTC+05:30）
    fn ist(y: i32, m: u32, d: u32, hh: u32, mm: u32) -> DateTime<Utc> {
        FixedOffset::east_opt(5 * 3600 + 1800)
            .unwrap()
            .with_ymd_and_hms(y, m, d, hh, mm, 0)
            .single()
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_open_window_boundaries() {
        let s = session();
        // 2026-03-02 是周一
        assert!(!s.is_open(ist(2026, 3, 2, 9, 14)));
        assert!(s.is_open(ist(2026, 3, 2, 9, 15)));
        assert!(s.is_open(ist(2026, 3, 2, 12, 0)));
        assert!(s.is_open(ist(2026, 3, 2, 15, 30)));
        assert!(!s.is_open(ist(2026, 3, 2, 15, 31)));
    }

    #[test]
    fn test_weekend_is_closed() {
        let s = session();
        // 2026-03-07 周六 / 2026-03-08 周日
        assert!(!s.is_open(ist(2026, 3, 7, 11, 0)));
        assert!(!s.is_open(ist(2026, 3, 8, 11, 0)));
        assert!(!s.is_past_close(ist(2026, 3, 7, 16, 0)));
    }

    #[test]
    fn test_past_close_cutoff() {
        let s = session();
        assert!(!s.is_past_close(ist(2026, 3, 2, 15, 29)));
        assert!(s.is_past_close(ist(2026, 3, 2, 15, 30)));
        assert!(s.is_past_close(ist(2026, 3, 2, 19, 0)));
    }

    #[test]
    fn test_trading_date_uses_market_offset() {
        let s = session();
        // IST 清晨 00:30 在 UTC 看仍是前一天 19:00
        let now = ist(2026, 3, 3, 0, 30);
        assert_eq!(
            s.trading_date(now),
            NaiveDate::from_ymd_opt(2026, 3, 3).unwrap()
        );
    }

    #[test]
    fn test_rejects_invalid_config() {
        let mut cfg = AppConfig::default().session;
        cfg.open = "25:00".to_string();
        assert!(MarketSession::from_config(&cfg).is_err());

        let mut cfg = AppConfig::default().session;
        cfg.close = "08:00".to_string();
        assert!(MarketSession::from_config(&cfg).is_err());
    }
}
