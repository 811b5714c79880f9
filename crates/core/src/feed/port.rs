use crate::common::{Category, Snapshot};
use crate::feed::error::FeedError;
use async_trait::async_trait;

/// # Summary
/// 行情源接口，按类别返回一批盘中快照。
///
/// # Invariants
/// - 实现必须是 `Send` 和 `Sync` 以支持并发调用。
/// - 允许返回部分结果：无法定价的标的直接跳过，不视为错误。
/// - 空列表是合法返回值，语义为"本周期无可用数据"。
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// # Summary
    /// 抓取指定类别下所有可定价标的的当前快照。
    ///
    /// # Logic
    /// 1. 向上游数据源发起请求（HTTP API、页面抓取等由实现决定）。
    /// 2. 逐个标的解析价格与相对前收盘的涨跌幅。
    /// 3. 解析失败或数据不足的标的静默跳过。
    ///
    /// # Arguments
    /// * `category` - 标的类别（ETF 或个股）。
    ///
    /// # Returns
    /// * 成功返回快照列表（可能为空）。
    /// * 整体请求失败返回 `Err(FeedError)`。
    async fn fetch(&self, category: Category) -> Result<Vec<Snapshot>, FeedError>;
}
