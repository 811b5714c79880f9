use paisa_core::common::Category;
use paisa_core::config::WatchlistConfig;
use paisa_core::feed::port::PriceSource;
use paisa_feed::upstox::UpstoxEtfSource;
use paisa_feed::yahoo::YahooChartSource;

/// # Summary
/// 集成测试：验证 Yahoo chart 接口真实抓取。
///
/// # Logic
/// 1. 用最小清单构建行情源。
/// 2. 抓取 ETF 类别并检查快照字段形态。
#[tokio::test]
#[ignore] // 默认忽略，依赖外网与交易日数据，仅手动验证时开启
async fn test_yahoo_live_fetch() {
    let watchlist = WatchlistConfig {
        etf_symbols: vec!["NIFTYBEES".to_string(), "GOLDBEES".to_string()],
        stock_symbols: vec!["RELIANCE".to_string()],
    };
    let source = YahooChartSource::new(&watchlist).expect("Failed to build source");

    let batch = source.fetch(Category::Etf).await.expect("Fetch failed");
    for snap in &batch {
        assert!(snap.id.starts_with("ETF:"));
        assert!(snap.price > rust_decimal::Decimal::ZERO);
    }
}

/// # Summary
/// 集成测试：验证 Upstox 公共接口真实抓取。
#[tokio::test]
#[ignore] // 默认忽略
async fn test_upstox_live_fetch() {
    let source = UpstoxEtfSource::new().expect("Failed to build source");

    // 个股类别恒为空批次
    let stocks = source.fetch(Category::Stock).await.expect("Fetch failed");
    assert!(stocks.is_empty());

    let etfs = source.fetch(Category::Etf).await.expect("Fetch failed");
    for snap in &etfs {
        assert!(snap.id.starts_with("ETF:"));
    }
}
