//! # `paisa-store` - 告警状态持久层
//!
//! 本 crate 提供 `AlertStore` 端口的 SQLite 实现，按交易日键
//! 读写告警记忆，保证跨进程调用的去重不丢失。
//!
//! ## 架构职责
//! - 在数据目录下维护单个 SQLite 数据库文件（自动建库建表）
//! - `load` 对无记录的日期返回空状态，仅在数据损坏时报错
//! - `save` 在单个事务内整体覆盖当日记录，崩溃不留半写状态

pub mod alert;
