use crate::notify::error::NotifyError;
use async_trait::async_trait;

/// # Summary
/// 向固定目的地投递一条已排版消息的接口定义。
///
/// # Invariants
/// - 实现必须是 `Send` 和 `Sync` 以支持并发调用。
/// - 消息排版由调用方完成，实现只负责传输。
#[async_trait]
pub trait Notifier: Send + Sync {
    /// # Summary
    /// 投递一条消息并报告成功或失败。
    ///
    /// # Logic
    /// 1. 通过底层传输协议发送消息正文。
    /// 2. 返回成功或失败状态，不做重试。
    ///
    /// # Arguments
    /// * `message` - 已排版好的可读消息正文。
    ///
    /// # Returns
    /// * 成功返回 `Ok(())`。
    /// * 失败返回 `Err(NotifyError)`。
    async fn notify(&self, message: &str) -> Result<(), NotifyError>;
}
