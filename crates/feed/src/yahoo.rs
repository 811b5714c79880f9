use async_trait::async_trait;
use paisa_core::common::{Category, Snapshot};
use paisa_core::config::WatchlistConfig;
use paisa_core::feed::error::FeedError;
use paisa_core::feed::port::PriceSource;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::time::Duration;
use tracing::warn;

/// NSE 标的在 Yahoo Finance 上的交易所后缀
const NSE_SUFFIX: &str = ".NS";

/// # Summary
/// Yahoo Finance 行情源实现：按配置清单逐个抓取标的，
/// 用最近两根日线收盘价计算相对前收盘的涨跌幅。
///
/// # Invariants
/// - 使用 `reqwest` 异步客户端进行通讯。
/// - 单个标的抓取或解析失败只跳过该标的，不影响批次其余部分。
#[derive(Clone)]
pub struct YahooChartSource {
    /// 内部使用的 HTTP 客户端
    client: Client,
    /// ETF 清单（裸代码，不含后缀）
    etf_symbols: Vec<String>,
    /// 个股清单（裸代码，不含后缀）
    stock_symbols: Vec<String>,
}

impl YahooChartSource {
    /// # Summary
    /// 由追踪清单创建 YahooChartSource 实例。
    ///
    /// # Logic
    /// 1. 配置 10 秒超时。
    /// 2. 设置伪装浏览器 Header (User-Agent) 以减少被拦截风险。
    /// 3. 初始化 reqwest 客户端。
    ///
    /// # Arguments
    /// * `watchlist` - 两类标的的交易代码清单。
    ///
    /// # Returns
    /// * 成功返回行情源实例，客户端构建失败返回 `FeedError`。
    pub fn new(watchlist: &WatchlistConfig) -> Result<Self, FeedError> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static(
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36",
            ),
        );

        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .default_headers(headers)
            .build()
            .map_err(|e| FeedError::Unknown(e.to_string()))?;

        Ok(Self {
            client,
            etf_symbols: watchlist.etf_symbols.clone(),
            stock_symbols: watchlist.stock_symbols.clone(),
        })
    }

    /// # Summary
    /// 抓取单个标的并计算 (现价, 涨跌幅)。
    ///
    /// # Logic
    /// 1. 构建 chart 接口 URL，请求最近两天的日线。
    /// 2. 解析嵌套 JSON，取非空收盘价序列。
    /// 3. 最近两根收盘价推导涨跌幅，数据不足两根视为不可定价。
    ///
    /// # Arguments
    /// * `symbol` - 裸交易代码。
    ///
    /// # Returns
    /// * 成功返回 (现价, 涨跌幅百分比)。
    async fn fetch_symbol(&self, symbol: &str) -> Result<(Decimal, Decimal), FeedError> {
        let url = format!(
            "https://query1.finance.yahoo.com/v8/finance/chart/{}{}",
            symbol, NSE_SUFFIX
        );

        let resp = self
            .client
            .get(&url)
            .query(&[("range", "2d"), ("interval", "1d")])
            .send()
            .await
            .map_err(|e| FeedError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(FeedError::Network(format!("HTTP {}", resp.status())));
        }

        let json: ChartResponse = resp
            .json()
            .await
            .map_err(|e| FeedError::Parse(e.to_string()))?;

        if let Some(err) = json.chart.error {
            return Err(FeedError::Unknown(err.description));
        }

        let result = json
            .chart
            .result
            .and_then(|mut r| r.pop())
            .ok_or(FeedError::NotFound)?;

        let quote = result
            .indicators
            .quote
            .into_iter()
            .next()
            .ok_or(FeedError::Parse("No quote data".into()))?;

        latest_change(&quote.close).ok_or(FeedError::NotFound)
    }

    /// 类别对应的配置清单
    fn symbols_for(&self, category: Category) -> &[String] {
        match category {
            Category::Etf => &self.etf_symbols,
            Category::Stock => &self.stock_symbols,
        }
    }
}

/// # Summary
/// 由日线收盘序列推导 (现价, 涨跌幅)。
///
/// # Logic
/// 过滤掉空洞后取最近两根收盘价；不足两根或前收盘为零则不可定价。
fn latest_change(closes: &[Option<f64>]) -> Option<(Decimal, Decimal)> {
    let valid: Vec<Decimal> = closes
        .iter()
        .filter_map(|c| (*c).and_then(|v| Decimal::try_from(v).ok()))
        .collect();
    if valid.len() < 2 {
        return None;
    }
    let curr = valid[valid.len() - 1];
    let prev = valid[valid.len() - 2];
    if prev.is_zero() {
        return None;
    }
    let change = (curr - prev) / prev * Decimal::ONE_HUNDRED;
    Some((curr, change))
}

/// # Summary
/// Yahoo chart 接口响应顶层结构。
#[derive(Deserialize, Debug)]
struct ChartResponse {
    chart: Chart,
}

/// # Summary
/// Yahoo chart 数据部分。
#[derive(Deserialize, Debug)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

/// # Summary
/// Yahoo chart 错误详情。
#[derive(Deserialize, Debug)]
struct ChartError {
    description: String,
}

/// # Summary
/// Yahoo chart 单个标的结果。
#[derive(Deserialize, Debug)]
struct ChartResult {
    indicators: Indicators,
}

/// # Summary
/// Yahoo chart 指标容器。
#[derive(Deserialize, Debug)]
struct Indicators {
    quote: Vec<Quote>,
}

/// # Summary
/// Yahoo chart 原始报价数据。
#[derive(Deserialize, Debug)]
struct Quote {
    /// 收盘价列表（停牌时段为 null）
    close: Vec<Option<f64>>,
}

#[async_trait]
impl PriceSource for YahooChartSource {
    /// # Summary
    /// 抓取一个类别清单下全部可定价标的的快照。
    ///
    /// # Logic
    /// 1. 按类别取配置清单。
    /// 2. 逐个标的请求 chart 接口并推导涨跌幅。
    /// 3. 失败标的记警告日志后跳过，其余照常返回。
    ///
    /// # Arguments
    /// * `category` - 标的类别。
    ///
    /// # Returns
    /// * 快照列表（可能为空，不视为错误）。
    async fn fetch(&self, category: Category) -> Result<Vec<Snapshot>, FeedError> {
        let mut snapshots = Vec::new();
        for symbol in self.symbols_for(category) {
            match self.fetch_symbol(symbol).await {
                Ok((price, change)) => {
                    snapshots.push(Snapshot::new(category, symbol, price, change));
                }
                Err(e) => {
                    // 不可定价的标的静默跳过，部分结果可接受
                    warn!(%symbol, error = %e, "Skipping unpriceable symbol");
                }
            }
        }
        Ok(snapshots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_latest_change_from_two_closes() {
        let (price, change) = latest_change(&[Some(100.0), Some(94.0)]).unwrap();
        assert_eq!(price, dec!(94.0));
        assert_eq!(change, dec!(-6.0));
    }

    #[test]
    fn test_latest_change_skips_null_holes() {
        let (price, change) = latest_change(&[Some(200.0), None, Some(210.0)]).unwrap();
        assert_eq!(price, dec!(210.0));
        assert_eq!(change, dec!(5.0));
    }

    #[test]
    fn test_latest_change_requires_two_closes() {
        assert!(latest_change(&[Some(100.0)]).is_none());
        assert!(latest_change(&[None, None]).is_none());
        assert!(latest_change(&[]).is_none());
        // 前收盘为零无法定义涨跌幅
        assert!(latest_change(&[Some(0.0), Some(10.0)]).is_none());
    }

    #[test]
    fn test_chart_response_parsing() {
        let raw = r#"{
            "chart": {
                "result": [{
                    "indicators": {
                        "quote": [{"close": [280.5, null, 273.2]}]
                    }
                }],
                "error": null
            }
        }"#;
        let parsed: ChartResponse = serde_json::from_str(raw).unwrap();
        let result = parsed.chart.result.unwrap().pop().unwrap();
        let quote = &result.indicators.quote[0];
        assert_eq!(quote.close.len(), 3);
        assert!(quote.close[1].is_none());
    }

    #[test]
    fn test_chart_error_parsing() {
        let raw = r#"{
            "chart": {
                "result": null,
                "error": {"description": "No data found, symbol may be delisted"}
            }
        }"#;
        let parsed: ChartResponse = serde_json::from_str(raw).unwrap();
        assert!(parsed.chart.error.is_some());
    }
}
