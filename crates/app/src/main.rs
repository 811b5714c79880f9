use std::env;
use std::path::Path;
use std::sync::Arc;

use paisa_core::common::time::SystemClock;
use paisa_core::config::AppConfig;
use paisa_feed::fallback::FallbackSource;
use paisa_feed::upstox::UpstoxEtfSource;
use paisa_feed::yahoo::YahooChartSource;
use paisa_notify::telegram::TelegramNotifier;
use paisa_store::alert::SqliteAlertStore;
use paisa_tracker::runner::{RunMode, TrackerRunner};
use paisa_tracker::session::MarketSession;
use paisa_tracker::thresholds::ThresholdTables;
use tracing::info;

/// # Summary
/// 应用启动入口，纯粹的 DI 容器。
/// 每次进程调用执行一个完整的轮询周期后退出，由外部调度器
/// （cron / CI 定时任务）决定运行频率。
///
/// # Logic
/// 1. 初始化全局日志。
/// 2. 加载并校验配置（默认值 + 可选 paisa.toml + PAISA_* 环境变量）。
/// 3. 识别人工核验模式（`--manual` 或 `PAISA_MANUAL=1`）。
/// 4. 实例化基础设施层（Feed 主备链、Store、Notifier、时钟）。
/// 5. 构造领域层 TrackerRunner 并执行单次周期。
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. 初始化日志
    tracing_subscriber::fmt::init();
    info!("Paisa tracker starting...");

    // 2. 加载配置，凭据校验必须先于任何网络活动
    let settings = config::Config::builder()
        .add_source(config::Config::try_from(&AppConfig::default())?)
        .add_source(config::File::with_name("paisa").required(false))
        .add_source(
            config::Environment::with_prefix("PAISA")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;
    let app_config: AppConfig = settings.try_deserialize()?;
    app_config.validate()?;

    // 3. 运行模式：人工核验绕过去重且不落盘
    let manual = env::args().any(|arg| arg == "--manual")
        || matches!(env::var("PAISA_MANUAL").as_deref(), Ok("1") | Ok("true"));
    let mode = if manual {
        info!("Manual verification mode: dedup bypassed, state will not be persisted");
        RunMode::Manual
    } else {
        RunMode::Scheduled
    };

    // 4. 实例化基础设施层
    let yahoo = Arc::new(YahooChartSource::new(&app_config.watchlist)?);
    let upstox = Arc::new(UpstoxEtfSource::new()?);
    let source = Arc::new(FallbackSource::new(yahoo, upstox));
    let store = Arc::new(SqliteAlertStore::new(Path::new(&app_config.storage.data_dir)).await?);
    let notifier = Arc::new(TelegramNotifier::new(
        app_config.telegram.bot_token.clone(),
        app_config.telegram.chat_id.clone(),
    )?);
    let clock = Arc::new(SystemClock);

    // 5. 构造领域层并执行单次周期
    let runner = TrackerRunner::new(
        source,
        notifier,
        store,
        clock,
        ThresholdTables::from_config(&app_config.thresholds)?,
        MarketSession::from_config(&app_config.session)?,
    );

    let report = runner.run_once(mode).await?;
    info!(
        market_open = report.market_open,
        evaluated = report.snapshots_evaluated,
        sent = report.alerts_sent,
        failed = report.alerts_failed,
        summary = report.summary_fired,
        "Cycle finished"
    );

    Ok(())
}
