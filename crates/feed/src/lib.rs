//! # `paisa-feed` - 行情源适配层
//!
//! 本 crate 提供 `PriceSource` 端口的具体实现：
//! Yahoo Finance chart 接口（主源，覆盖 ETF 与个股清单）、
//! Upstox 公共 ETF 接口（备源），以及把两者串成主备链的兜底组合器。
//!
//! ## 架构职责
//! - 把上游接口的原始报价翻译为统一的 `Snapshot` 批次
//! - 单个标的解析失败静默跳过，部分结果优于无结果
//! - 空批次是合法结果，由上层决定是否切换备源

pub mod fallback;
pub mod upstox;
pub mod yahoo;
