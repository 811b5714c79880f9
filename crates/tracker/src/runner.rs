use crate::digest;
use crate::evaluator::{self, Crossing};
use crate::messages;
use crate::session::MarketSession;
use crate::thresholds::ThresholdTables;
use paisa_core::common::time::TimeProvider;
use paisa_core::common::{Category, Snapshot};
use paisa_core::config::ConfigError;
use paisa_core::feed::port::PriceSource;
use paisa_core::notify::port::Notifier;
use paisa_core::store::error::StoreError;
use paisa_core::store::port::{AlertStore, DayState};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// # Summary
/// Runner 层的统一错误类型。
///
/// # Invariants
/// - 存储错误整周期致命：状态不可读时绝不猜测或静默重置，
///   否则当日所有告警会被重放。
#[derive(Error, Debug)]
pub enum RunError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// # Summary
/// 运行模式：计划任务 or 人工核验。
///
/// # Invariants
/// - 人工模式绕过去重（每个越档都上报）且不落盘，
///   保证核验运行不污染当日去重记忆。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Scheduled,
    Manual,
}

/// 单次运行的结果摘要，供入口进程打日志
#[derive(Debug, Default)]
pub struct RunReport {
    // 本周期是否处于盘中
    pub market_open: bool,
    // 判定过的快照数量
    pub snapshots_evaluated: usize,
    // 成功投递的告警数量
    pub alerts_sent: usize,
    // 投递失败（但状态已落子）的告警数量
    pub alerts_failed: usize,
    // 本周期是否发出了收盘汇总
    pub summary_fired: bool,
}

/// # Summary
/// 单次运行编排器，系统的应用服务层门面 (Facade)。
/// 编译期仅依赖 `paisa-core` 中的 Trait 定义，所有具体实现通过构造函数注入。
///
/// # Invariants
/// - 每次进程调用执行一个完整的跑批周期后返回，无常驻事件循环。
/// - 状态在周期开始读一次、周期结束写一次；外部调度契约保证
///   同一日期键不会被并发周期同时写。
pub struct TrackerRunner {
    // 行情源（可为兜底链）
    source: Arc<dyn PriceSource>,
    // 消息投递通道
    notifier: Arc<dyn Notifier>,
    // 日级告警状态存储
    store: Arc<dyn AlertStore>,
    // 可注入时钟
    clock: Arc<dyn TimeProvider>,
    // 按类别阈值表
    tables: ThresholdTables,
    // 交易时段时钟
    session: MarketSession,
}

impl TrackerRunner {
    /// # Summary
    /// 创建 TrackerRunner 实例。
    ///
    /// # Arguments
    /// * `source` - 行情源端口实现。
    /// * `notifier` - 通知端口实现。
    /// * `store` - 告警状态存储实现。
    /// * `clock` - 时间供给器。
    /// * `tables` - 校验过的阈值表集合。
    /// * `session` - 交易时段时钟。
    ///
    /// # Returns
    /// * 编排器实例。
    pub fn new(
        source: Arc<dyn PriceSource>,
        notifier: Arc<dyn Notifier>,
        store: Arc<dyn AlertStore>,
        clock: Arc<dyn TimeProvider>,
        tables: ThresholdTables,
        session: MarketSession,
    ) -> Self {
        Self {
            source,
            notifier,
            store,
            clock,
            tables,
            session,
        }
    }

    /// # Summary
    /// 执行一个完整的轮询周期。
    ///
    /// # Logic
    /// 1. 取当前时刻，换算交易日并加载当日状态（不可读则整周期中止）。
    /// 2. 盘中：抓取两类快照，逐个判定越档并投递告警；
    ///    投递失败只记日志，判定结果照常落子（至多一次告警优先于必达）。
    ///    盘外：整段跳过，不抓取、不判定。
    /// 3. 汇总步骤与是否轮询无关：过收盘线且当日未发过，
    ///    则由当日状态重建摘要并发送，成功后才置位 `summary_sent`。
    /// 4. 计划模式在周期末尾恰好持久化一次；人工模式从不持久化。
    ///
    /// # Arguments
    /// * `mode` - 运行模式。
    ///
    /// # Returns
    /// * 成功返回 `RunReport`，存储故障返回 `RunError`。
    pub async fn run_once(&self, mode: RunMode) -> Result<RunReport, RunError> {
        let now = self.clock.now();
        let today = self.session.trading_date(now);
        let mut state = self.store.load(today).await?;
        let mut report = RunReport::default();

        if self.session.is_open(now) {
            report.market_open = true;
            let etfs = self.fetch_batch(Category::Etf).await;
            let stocks = self.fetch_batch(Category::Stock).await;
            state.etfs_tracked = u32::try_from(etfs.len()).unwrap_or(u32::MAX);
            state.stocks_tracked = u32::try_from(stocks.len()).unwrap_or(u32::MAX);
            info!(
                etfs = etfs.len(),
                stocks = stocks.len(),
                date = %today,
                "Polling cycle started"
            );

            for snapshot in etfs.iter().chain(stocks.iter()) {
                report.snapshots_evaluated += 1;
                let Some(crossing) = self.decide(snapshot, mode, &state) else {
                    continue;
                };
                info!(
                    id = %snapshot.id,
                    change = %snapshot.change_percent,
                    slab = %crossing.slab,
                    previous = ?crossing.previous,
                    "Threshold crossed"
                );

                let message =
                    messages::alert_message(snapshot, crossing.slab, self.session.local(now));
                match self.notifier.notify(&message).await {
                    Ok(()) => report.alerts_sent += 1,
                    Err(e) => {
                        // 单条投递失败隔离处理，不中断其余标的
                        warn!(id = %snapshot.id, error = %e, "Alert delivery failed");
                        report.alerts_failed += 1;
                    }
                }
                // 投递成败都记入状态：判定本身就是"已尝试告警"的持久记录，
                // 通道恢复后不会补发洪水
                if mode == RunMode::Scheduled {
                    state.alerted.insert(snapshot.id.clone(), crossing.slab);
                }
            }
        } else {
            info!(date = %today, "Market closed, skipping poll");
        }

        if !state.summary_sent && self.session.is_past_close(now) {
            let summary = digest::render(&state, self.session.local(now));
            match self.notifier.notify(&summary).await {
                Ok(()) => {
                    info!(date = %today, alerts = state.alerted.len(), "Daily summary sent");
                    state.summary_sent = true;
                    report.summary_fired = true;
                }
                Err(e) => {
                    // 汇总失败不置位，下个周期重试
                    warn!(error = %e, "Daily summary delivery failed");
                }
            }
        }

        if mode == RunMode::Scheduled {
            self.store.save(&state).await?;
        }

        Ok(report)
    }

    /// 按模式做越档判定：计划模式走去重状态机，人工模式逢越档必报
    fn decide(
        &self,
        snapshot: &Snapshot,
        mode: RunMode,
        state: &DayState,
    ) -> Option<Crossing> {
        let table = self.tables.for_category(snapshot.category);
        match mode {
            RunMode::Scheduled => evaluator::evaluate(snapshot, table, &state.alerted),
            RunMode::Manual => table
                .deepest_crossed(snapshot.change_percent)
                .map(|slab| Crossing {
                    slab,
                    previous: state.alerted.get(&snapshot.id).copied(),
                }),
        }
    }

    /// # Summary
    /// 抓取一个类别的快照批次。
    ///
    /// # Logic
    /// 行情源整体失败降级为空批次并记录警告日志；部分数据优于不运行，
    /// 数据源错误永不致命。
    async fn fetch_batch(&self, category: Category) -> Vec<Snapshot> {
        match self.source.fetch(category).await {
            Ok(batch) => batch,
            Err(e) => {
                warn!(%category, error = %e, "Price source failed, treating as empty batch");
                Vec::new()
            }
        }
    }
}
