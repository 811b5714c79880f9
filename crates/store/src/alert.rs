use async_trait::async_trait;
use chrono::NaiveDate;
use paisa_core::store::error::StoreError;
use paisa_core::store::port::{AlertStore, DayState};
use rust_decimal::Decimal;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// 默认告警数据库文件名
const DEFAULT_ALERT_DB: &str = "alerts.db";

/// AlertStore 的 SQLite 实现。
///
/// # Summary
/// 在数据目录下的 `alerts.db` 中按交易日管理告警记忆。
/// 每个日期键对应 `day_state` 的一行与 `day_alerts` 的若干行，
/// 旧日期的记录自然留存但不再被读取。
///
/// # Invariants
/// * 数据库结构在存储实例创建时初始化。
/// * 所有操作均通过共享的 `SqlitePool` 执行。
/// * `save` 的覆盖写在单个事务内完成。
pub struct SqliteAlertStore {
    pool: SqlitePool,
}

impl SqliteAlertStore {
    /// 创建新的 SqliteAlertStore 并初始化表结构。
    ///
    /// # Logic
    /// 1. 确保数据目录存在（目录由调用方显式传入，不走全局配置）。
    /// 2. 配置 SQLite 连接选项，开启 `create_if_missing`。
    /// 3. 连接到数据库并执行 DDL 初始化表结构。
    ///
    /// # Arguments
    /// * `data_dir` - 数据根目录。
    ///
    /// # Returns
    /// * `Result<Self, StoreError>` - 存储实例 or 初始化错误。
    pub async fn new(data_dir: &Path) -> Result<Self, StoreError> {
        fs::create_dir_all(data_dir).map_err(|e| StoreError::InitError(e.to_string()))?;

        let db_path = data_dir.join(DEFAULT_ALERT_DB);

        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(options)
            .await
            .map_err(|e| StoreError::InitError(e.to_string()))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS day_state (
                date TEXT PRIMARY KEY,
                summary_sent INTEGER NOT NULL DEFAULT 0,
                etfs_tracked INTEGER NOT NULL DEFAULT 0,
                stocks_tracked INTEGER NOT NULL DEFAULT 0
            );

            CREATE TABLE IF NOT EXISTS day_alerts (
                date TEXT NOT NULL,
                instrument_id TEXT NOT NULL,
                slab TEXT NOT NULL,
                PRIMARY KEY (date, instrument_id)
            );
            "#,
        )
        .execute(&pool)
        .await
        .map_err(|e| StoreError::InitError(e.to_string()))?;

        Ok(Self { pool })
    }

    /// 解析持久化的档位字段，损坏数据显式报错而非静默归零
    fn parse_slab(raw: &str) -> Result<Decimal, StoreError> {
        Decimal::from_str(raw)
            .map_err(|e| StoreError::Database(format!("corrupt slab value '{}': {}", raw, e)))
    }
}

#[async_trait]
impl AlertStore for SqliteAlertStore {
    /// # Summary
    /// 加载指定交易日的告警状态。
    ///
    /// # Logic
    /// 1. 查询 `day_state` 行；缺失则直接返回空状态。
    /// 2. 查询 `day_alerts` 行并组装告警映射。
    ///
    /// # Arguments
    /// * `date` - 目标交易日。
    ///
    /// # Returns
    /// * `Result<DayState, StoreError>`
    async fn load(&self, date: NaiveDate) -> Result<DayState, StoreError> {
        let row = sqlx::query_as::<_, (bool, i64, i64)>(
            "SELECT summary_sent, etfs_tracked, stocks_tracked FROM day_state WHERE date = ?",
        )
        .bind(date)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;

        let Some((summary_sent, etfs_tracked, stocks_tracked)) = row else {
            // 日期无记录是合法的空状态，不是错误
            return Ok(DayState::empty(date));
        };

        let mut state = DayState::empty(date);
        state.summary_sent = summary_sent;
        state.etfs_tracked = u32::try_from(etfs_tracked)
            .map_err(|_| StoreError::Database(format!("corrupt etf count {}", etfs_tracked)))?;
        state.stocks_tracked = u32::try_from(stocks_tracked)
            .map_err(|_| StoreError::Database(format!("corrupt stock count {}", stocks_tracked)))?;

        let rows = sqlx::query_as::<_, (String, String)>(
            "SELECT instrument_id, slab FROM day_alerts WHERE date = ?",
        )
        .bind(date)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;

        for (instrument_id, slab) in rows {
            state.alerted.insert(instrument_id, Self::parse_slab(&slab)?);
        }

        Ok(state)
    }

    /// # Summary
    /// 持久化指定交易日的告警状态。
    ///
    /// # Logic
    /// 1. 开启事务。
    /// 2. Upsert `day_state` 行。
    /// 3. 删除该日期的全部 `day_alerts` 行后重新插入，实现整体覆盖。
    /// 4. 提交事务，保证崩溃原子性。
    ///
    /// # Arguments
    /// * `state` - 待保存的状态实体。
    ///
    /// # Returns
    /// * `Result<(), StoreError>`
    async fn save(&self, state: &DayState) -> Result<(), StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        sqlx::query(
            "INSERT OR REPLACE INTO day_state (date, summary_sent, etfs_tracked, stocks_tracked) \
             VALUES (?, ?, ?, ?)",
        )
        .bind(state.date)
        .bind(state.summary_sent)
        .bind(i64::from(state.etfs_tracked))
        .bind(i64::from(state.stocks_tracked))
        .execute(&mut *tx)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;

        sqlx::query("DELETE FROM day_alerts WHERE date = ?")
            .bind(state.date)
            .execute(&mut *tx)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        for (instrument_id, slab) in &state.alerted {
            sqlx::query("INSERT INTO day_alerts (date, instrument_id, slab) VALUES (?, ?, ?)")
                .bind(state.date)
                .bind(instrument_id)
                .bind(slab.to_string())
                .execute(&mut *tx)
                .await
                .map_err(|e| StoreError::Database(e.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| StoreError::Database(e.to_string()))
    }
}
