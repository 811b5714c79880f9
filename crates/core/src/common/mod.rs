use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub mod time;

/// # Summary
/// 标的类别枚举，区分 ETF 与个股。
///
/// # Invariants
/// - 类别决定标的适用的跌幅阈值表。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Category {
    // 交易所交易基金
    Etf,
    // 个股
    Stock,
}

impl Category {
    /// 根据类别前缀与交易代码拼出全局唯一的标的标识符 (例如 `ETF:NIFTYBEES`)。
    pub fn instrument_id(&self, symbol: &str) -> String {
        format!("{}:{}", self, symbol)
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ETF" => Ok(Category::Etf),
            "STOCK" => Ok(Category::Stock),
            _ => Err(format!("Unknown Category: {}", s)),
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Etf => write!(f, "ETF"),
            Category::Stock => write!(f, "STOCK"),
        }
    }
}

/// # Summary
/// 单个标的的盘中快照实体，记录一次轮询时刻的价格与涨跌幅。
///
/// # Invariants
/// - `id` 在同一交易日内必须稳定，格式为 `<类别>:<代码>`。
/// - `price` 必须非负。
/// - 快照本身不做持久化，仅其评估结果会进入告警状态。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    // 标的标识符 (例如: ETF:GOLDBEES, STOCK:RELIANCE)
    pub id: String,
    // 标的类别
    pub category: Category,
    // 最新成交价
    pub price: Decimal,
    // 相对前收盘的涨跌幅（百分比，带符号）
    pub change_percent: Decimal,
}

impl Snapshot {
    /// # Summary
    /// 由类别与裸交易代码构造快照。
    ///
    /// # Logic
    /// 1. 通过 `Category::instrument_id` 生成带前缀的标识符。
    /// 2. 填充价格与涨跌幅。
    ///
    /// # Arguments
    /// * `category` - 标的类别。
    /// * `symbol` - 不带前缀的交易代码。
    /// * `price` - 最新成交价。
    /// * `change_percent` - 相对前收盘的涨跌幅。
    ///
    /// # Returns
    /// * 新的快照实体。
    pub fn new(category: Category, symbol: &str, price: Decimal, change_percent: Decimal) -> Self {
        Self {
            id: category.instrument_id(symbol),
            category,
            price,
            change_percent,
        }
    }
}
