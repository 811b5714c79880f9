use async_trait::async_trait;
use paisa_core::common::{Category, Snapshot};
use paisa_core::feed::error::FeedError;
use paisa_core::feed::port::PriceSource;
use std::sync::Arc;
use tracing::warn;

/// # Summary
/// 主备行情源组合器：主源出错或返回空批次时切换到备源。
///
/// # Invariants
/// - 主源的非空结果永远优先，备源只在降级时被触发。
/// - 两源皆失败时返回备源的错误。
pub struct FallbackSource {
    // 首选行情源
    primary: Arc<dyn PriceSource>,
    // 降级行情源
    secondary: Arc<dyn PriceSource>,
}

impl FallbackSource {
    /// # Summary
    /// 创建主备组合器。
    ///
    /// # Arguments
    /// * `primary` - 首选行情源。
    /// * `secondary` - 降级行情源。
    ///
    /// # Returns
    /// * 组合器实例。
    pub fn new(primary: Arc<dyn PriceSource>, secondary: Arc<dyn PriceSource>) -> Self {
        Self { primary, secondary }
    }
}

#[async_trait]
impl PriceSource for FallbackSource {
    /// # Summary
    /// 先问主源，空批次或出错时降级到备源。
    ///
    /// # Logic
    /// 1. 主源返回非空批次则直接采用。
    /// 2. 主源返回空批次或错误，记警告日志后改问备源。
    ///
    /// # Arguments
    /// * `category` - 标的类别。
    ///
    /// # Returns
    /// * 快照列表或备源的错误。
    async fn fetch(&self, category: Category) -> Result<Vec<Snapshot>, FeedError> {
        match self.primary.fetch(category).await {
            Ok(batch) if !batch.is_empty() => Ok(batch),
            Ok(_) => {
                warn!(%category, "Primary source returned empty batch, trying fallback");
                self.secondary.fetch(category).await
            }
            Err(e) => {
                warn!(%category, error = %e, "Primary source failed, trying fallback");
                self.secondary.fetch(category).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    /// 固定返回预设结果的桩行情源
    struct StubSource {
        result: Result<Vec<Snapshot>, ()>,
    }

    impl StubSource {
        fn with(batch: Vec<Snapshot>) -> Arc<Self> {
            Arc::new(Self { result: Ok(batch) })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self { result: Err(()) })
        }
    }

    #[async_trait]
    impl PriceSource for StubSource {
        async fn fetch(&self, _category: Category) -> Result<Vec<Snapshot>, FeedError> {
            match &self.result {
                Ok(batch) => Ok(batch.clone()),
                Err(()) => Err(FeedError::Network("stub down".to_string())),
            }
        }
    }

    fn snap(symbol: &str) -> Snapshot {
        Snapshot::new(Category::Etf, symbol, dec!(100.0), dec!(-3.0))
    }

    #[tokio::test]
    async fn test_primary_result_wins() {
        let source = FallbackSource::new(
            StubSource::with(vec![snap("NIFTYBEES")]),
            StubSource::with(vec![snap("GOLDBEES")]),
        );
        let batch = source.fetch(Category::Etf).await.unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].id, "ETF:NIFTYBEES");
    }

    #[tokio::test]
    async fn test_falls_back_on_error() {
        let source = FallbackSource::new(
            StubSource::failing(),
            StubSource::with(vec![snap("GOLDBEES")]),
        );
        let batch = source.fetch(Category::Etf).await.unwrap();
        assert_eq!(batch[0].id, "ETF:GOLDBEES");
    }

    #[tokio::test]
    async fn test_falls_back_on_empty_batch() {
        let source = FallbackSource::new(
            StubSource::with(Vec::new()),
            StubSource::with(vec![snap("GOLDBEES")]),
        );
        let batch = source.fetch(Category::Etf).await.unwrap();
        assert_eq!(batch.len(), 1);
    }

    #[tokio::test]
    async fn test_both_failing_surfaces_error() {
        let source = FallbackSource::new(StubSource::failing(), StubSource::failing());
        assert!(source.fetch(Category::Etf).await.is_err());
    }
}
