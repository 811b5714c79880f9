use super::error::StoreError;
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// # Summary
/// 单个交易日的告警记忆实体，是跨进程调用之间唯一的共享状态。
///
/// # Invariants
/// - `alerted` 中每个标的的阈值只会单调加深（数值更负），当日内绝不回浅。
/// - `summary_sent` 一旦置真，当日不再翻转。
/// - 新的日历日从空状态开始，前一日的记录被整体弃用而非合并。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayState {
    // 状态所属的交易日（行情时区下的日历日）
    pub date: NaiveDate,
    // 标的标识符 -> 当日已告警的最深阈值
    pub alerted: BTreeMap<String, Decimal>,
    // 收盘汇总是否已发送
    pub summary_sent: bool,
    // 最近一次轮询追踪到的 ETF 数量
    pub etfs_tracked: u32,
    // 最近一次轮询追踪到的个股数量
    pub stocks_tracked: u32,
}

impl DayState {
    /// # Summary
    /// 构造指定日期的全新空状态。
    ///
    /// # Logic
    /// 告警映射为空、汇总未发送、追踪计数归零。
    ///
    /// # Arguments
    /// * `date` - 状态所属的交易日。
    ///
    /// # Returns
    /// * 空的 `DayState`。
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            alerted: BTreeMap::new(),
            summary_sent: false,
            etfs_tracked: 0,
            stocks_tracked: 0,
        }
    }
}

/// # Summary
/// 日级告警状态存储接口，按日期键读写 `DayState`。
///
/// # Invariants
/// - `load` 对不存在的日期返回空状态，绝不报错。
/// - `save` 必须整体覆盖该日期键下的旧内容，且写入具备崩溃原子性。
/// - 每个轮询周期恰好读一次、写一次，无需细粒度锁。
#[async_trait]
pub trait AlertStore: Send + Sync {
    /// # Summary
    /// 加载指定交易日的告警状态。
    ///
    /// # Logic
    /// 1. 按日期键查询持久化记录。
    /// 2. 记录存在则组装返回。
    /// 3. 记录不存在则返回以该日期初始化的空状态。
    ///
    /// # Arguments
    /// * `date` - 目标交易日。
    ///
    /// # Returns
    /// * 成功返回 `DayState`。
    /// * 仅在底层数据不可读或损坏时返回 `Err(StoreError)`。
    async fn load(&self, date: NaiveDate) -> Result<DayState, StoreError>;

    /// # Summary
    /// 持久化指定交易日的告警状态。
    ///
    /// # Logic
    /// 1. 以 `state.date` 为键，整体覆盖旧记录。
    /// 2. 写入必须在单个事务内完成，崩溃不得留下半写状态。
    ///
    /// # Arguments
    /// * `state` - 待保存的状态实体。
    ///
    /// # Returns
    /// * 操作结果。
    async fn save(&self, state: &DayState) -> Result<(), StoreError>;
}
