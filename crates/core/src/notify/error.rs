use thiserror::Error;

/// # Summary
/// 通知服务错误枚举。
///
/// # Invariants
/// - 必须通过 `thiserror` 派生 `Error` trait。
/// - 投递失败不重试：单条告警的丢失由调用方的状态记录兜底。
#[derive(Error, Debug)]
pub enum NotifyError {
    /// 网络连接或传输错误
    #[error("Network error: {0}")]
    Network(String),

    /// 配置或客户端构建错误 (如缺少 Token)
    #[error("Configuration error: {0}")]
    Config(String),

    /// 推送平台返回的业务错误 (如 Telegram API 非 2xx 响应)
    #[error("Platform error: {0}")]
    Platform(String),
}
