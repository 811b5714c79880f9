//! # `paisa-tracker` - 阈值告警状态机
//!
//! 本 crate 承载追踪器的全部领域逻辑：跌幅阈值表、越档判定器、
//! 交易时段时钟、收盘汇总以及单次运行编排器。
//!
//! ## 架构职责
//! - 对每个快照做纯函数式的越档判定（当日同档位至多告警一次，只在加深时重触发）
//! - 维护按日滚动的告警记忆，跨进程调用不重复打扰
//! - 收盘后基于当日状态重组并发送一次汇总摘要
//! - 编译期仅依赖 `paisa-core` 中的端口抽象，具体实现由二进制入口注入

pub mod digest;
pub mod evaluator;
pub mod messages;
pub mod runner;
pub mod session;
pub mod thresholds;
