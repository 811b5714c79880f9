use async_trait::async_trait;
use paisa_core::common::{Category, Snapshot};
use paisa_core::feed::error::FeedError;
use paisa_core::feed::port::PriceSource;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::time::Duration;
use tracing::warn;

/// Upstox 公共 ETF 行情接口
const BASE_URL: &str = "https://api.upstox.com/v2/market-quote/etfs";
/// 单页条目数
const PAGE_SIZE: usize = 50;
/// 分页上限，防止无限翻页
const MAX_PAGES: usize = 20;
/// 翻页间隔，对公共接口保持克制
const PAGE_DELAY: Duration = Duration::from_millis(300);

/// # Summary
/// Upstox 公共接口行情源：分页拉取全量 NSE ETF 报价，按当日跌幅
/// 升序排列（最差的在前）。仅覆盖 ETF 类别，作为主源的备份。
///
/// # Invariants
/// - 对 `Stock` 类别恒返回空批次。
/// - 分页数量有硬上限，短页即停止。
#[derive(Clone)]
pub struct UpstoxEtfSource {
    /// 内部使用的 HTTP 客户端
    client: Client,
}

impl UpstoxEtfSource {
    /// # Summary
    /// 创建 UpstoxEtfSource 实例。
    ///
    /// # Logic
    /// 1. 配置 15 秒超时与浏览器 Header。
    /// 2. 初始化 reqwest 客户端。
    ///
    /// # Returns
    /// * 成功返回行情源实例，客户端构建失败返回 `FeedError`。
    pub fn new() -> Result<Self, FeedError> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static("Mozilla/5.0"),
        );
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/json"),
        );
        headers.insert(
            reqwest::header::REFERER,
            reqwest::header::HeaderValue::from_static("https://upstox.com/etfs"),
        );

        let client = Client::builder()
            .timeout(Duration::from_secs(15))
            .default_headers(headers)
            .build()
            .map_err(|e| FeedError::Unknown(e.to_string()))?;

        Ok(Self { client })
    }

    /// 拉取单页报价
    async fn fetch_page(&self, page: usize) -> Result<Vec<UpstoxQuote>, FeedError> {
        let resp = self
            .client
            .get(BASE_URL)
            .query(&[
                ("exchange", "NSE"),
                ("page", &page.to_string()),
                ("pageSize", &PAGE_SIZE.to_string()),
                ("sortBy", "oneDayChange"),
                ("sortOrder", "asc"),
            ])
            .send()
            .await
            .map_err(|e| FeedError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(FeedError::Network(format!("HTTP {}", resp.status())));
        }

        let json: UpstoxResponse = resp
            .json()
            .await
            .map_err(|e| FeedError::Parse(e.to_string()))?;

        Ok(json.data.unwrap_or_default())
    }
}

/// # Summary
/// Upstox 接口响应顶层结构。
#[derive(Deserialize, Debug)]
struct UpstoxResponse {
    data: Option<Vec<UpstoxQuote>>,
}

/// # Summary
/// Upstox 单条 ETF 报价。
#[derive(Deserialize, Debug)]
struct UpstoxQuote {
    // ETF 名称（作为标的代码使用）
    name: Option<String>,
    // 最新成交价
    #[serde(rename = "lastPrice")]
    last_price: Option<f64>,
    // 当日涨跌幅（百分比）
    #[serde(rename = "oneDayChange")]
    one_day_change: Option<f64>,
}

impl UpstoxQuote {
    /// 字段齐全时翻译为快照，缺价或缺涨跌幅的条目丢弃
    fn into_snapshot(self) -> Option<Snapshot> {
        let name = self.name?;
        let price = Decimal::try_from(self.last_price?).ok()?;
        let change = Decimal::try_from(self.one_day_change?).ok()?;
        Some(Snapshot::new(Category::Etf, &name, price, change))
    }
}

#[async_trait]
impl PriceSource for UpstoxEtfSource {
    /// # Summary
    /// 分页抓取全量 NSE ETF 快照。
    ///
    /// # Logic
    /// 1. `Stock` 类别直接返回空批次（本源不覆盖个股）。
    /// 2. 从第 1 页起逐页拉取，翻页间隔 300ms。
    /// 3. 首页失败即报错；后续页失败保留已抓到的部分结果。
    /// 4. 短页或达到页数上限停止。
    ///
    /// # Arguments
    /// * `category` - 标的类别。
    ///
    /// # Returns
    /// * 快照列表或首页抓取错误。
    async fn fetch(&self, category: Category) -> Result<Vec<Snapshot>, FeedError> {
        if category == Category::Stock {
            return Ok(Vec::new());
        }

        let mut snapshots = Vec::new();
        for page in 1..=MAX_PAGES {
            let quotes = match self.fetch_page(page).await {
                Ok(quotes) => quotes,
                Err(e) if page == 1 => return Err(e),
                Err(e) => {
                    // 翻页途中失败：部分结果优于全无
                    warn!(page, error = %e, "Upstox page fetch failed, keeping partial batch");
                    break;
                }
            };

            let count = quotes.len();
            snapshots.extend(quotes.into_iter().filter_map(UpstoxQuote::into_snapshot));

            if count < PAGE_SIZE {
                break;
            }
            tokio::time::sleep(PAGE_DELAY).await;
        }

        Ok(snapshots)
    }
}
