use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// # Summary
/// 配置错误枚举，启动期校验失败时返回。
///
/// # Invariants
/// - 配置错误必须在任何网络活动之前暴露并终止进程。
#[derive(Error, Debug)]
pub enum ConfigError {
    /// 缺少必需的凭据
    #[error("Missing credential: {0}")]
    MissingCredential(&'static str),
    /// 交易时段配置非法
    #[error("Invalid session config: {0}")]
    InvalidSession(String),
    /// 阈值表配置非法
    #[error("Invalid threshold table: {0}")]
    InvalidThresholds(String),
}

/// 全局应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub telegram: TelegramConfig,
    pub storage: StorageConfig,
    pub session: SessionConfig,
    pub watchlist: WatchlistConfig,
    pub thresholds: ThresholdsConfig,
}

/// Telegram Bot 凭据
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_dir: String,
}

/// # Summary
/// 交易时段配置：固定时区偏移 + 固定开收盘时刻。
///
/// # Invariants
/// - 偏移量按分钟计（IST 为 +330），目标市场无夏令时。
/// - `open` / `close` 为 `HH:MM` 格式的当地时刻。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub utc_offset_minutes: i32,
    pub open: String,
    pub close: String,
}

/// 追踪标的清单（裸交易代码，行情源自行补全后缀）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchlistConfig {
    pub etf_symbols: Vec<String>,
    pub stock_symbols: Vec<String>,
}

/// 按类别的跌幅阈值表（负百分比）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThresholdsConfig {
    pub etf: Vec<Decimal>,
    pub stock: Vec<Decimal>,
}

impl AppConfig {
    /// # Summary
    /// 启动期校验：凭据必须在任何网络请求之前就位。
    ///
    /// # Logic
    /// 1. 检查 Bot Token 与 Chat ID 非空。
    ///
    /// # Returns
    /// * 校验通过返回 Ok，否则返回 `ConfigError::MissingCredential`。
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.telegram.bot_token.trim().is_empty() {
            return Err(ConfigError::MissingCredential("telegram.bot_token"));
        }
        if self.telegram.chat_id.trim().is_empty() {
            return Err(ConfigError::MissingCredential("telegram.chat_id"));
        }
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            telegram: TelegramConfig {
                bot_token: String::new(), // 必须由配置文件或环境变量提供
                chat_id: String::new(),
            },
            storage: StorageConfig {
                data_dir: "data".to_string(),
            },
            session: SessionConfig {
                // IST (UTC+05:30)，NSE 无夏令时
                utc_offset_minutes: 330,
                open: "09:15".to_string(),
                close: "15:30".to_string(),
            },
            watchlist: WatchlistConfig {
                etf_symbols: default_etf_symbols(),
                stock_symbols: default_stock_symbols(),
            },
            thresholds: ThresholdsConfig {
                etf: vec![
                    Decimal::new(-25, 1),
                    Decimal::new(-35, 1),
                    Decimal::new(-50, 1),
                    Decimal::new(-80, 1),
                    Decimal::new(-100, 1),
                ],
                stock: vec![
                    Decimal::new(-50, 1),
                    Decimal::new(-80, 1),
                    Decimal::new(-100, 1),
                ],
            },
        }
    }
}

/// NSE ETF 默认清单，Yahoo Finance 兼容（`.NS` 后缀由行情源补全）
fn default_etf_symbols() -> Vec<String> {
    [
        // 宽基
        "NIFTYBEES",
        "SETFNIF50",
        "ICICINIFTY",
        "HDFCNIFTY",
        "UTINIFTY",
        "SBINIFTY",
        // 银行 / 金融
        "BANKBEES",
        "SETFNIFBK",
        "ICICIBANKETF",
        "SBIETFBANK",
        "PSUBNKBEES",
        // 中小盘
        "MID150BEES",
        "SBIETFMID",
        "SBIETFSML",
        // 行业
        "ITBEES",
        "PHARMABEES",
        "AUTOBEES",
        "FMCGBEES",
        "ENERGYBEES",
        "METALBEES",
        // Smart Beta
        "SBIETFQLTY",
        "SBIETFMOM",
        "SBIETFALPH",
        "SBIETFCON",
        // 黄金
        "GOLDBEES",
        "HDFCGOLD",
        "KOTAKGOLD",
        "AXISGOLD",
        "SBIGOLD",
        "ICICIGOLD",
        // 白银
        "SILVERBEES",
        "SILVERETF",
        // CPSE / PSU
        "CPSEETF",
        // 海外
        "MON100",
        "MOSESETF",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// 个股默认清单
fn default_stock_symbols() -> Vec<String> {
    ["HUDCO", "IRCTC", "SBIN", "TATASTEEL", "RELIANCE"]
        .into_iter()
        .map(String::from)
        .collect()
}
