//! # `paisa-notify` - 通知适配层
//!
//! 本 crate 提供 `Notifier` 端口的 Telegram Bot API 实现，
//! 把排版好的告警与汇总正文投递到固定的聊天频道。

pub mod telegram;
