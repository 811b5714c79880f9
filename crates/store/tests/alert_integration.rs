use chrono::NaiveDate;
use paisa_core::store::port::{AlertStore, DayState};
use paisa_store::alert::SqliteAlertStore;
use rust_decimal_macros::dec;
use tempfile::tempdir;

fn date(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
}

#[tokio::test]
async fn test_missing_date_loads_empty_state() {
    let tmp = tempdir().expect("Failed to create temp dir");
    let store = SqliteAlertStore::new(tmp.path())
        .await
        .expect("Failed to create alert store");

    let state = store.load(date(2)).await.unwrap();
    assert_eq!(state.date, date(2));
    assert!(state.alerted.is_empty());
    assert!(!state.summary_sent);
}

#[tokio::test]
async fn test_save_load_roundtrip() {
    let tmp = tempdir().expect("Failed to create temp dir");
    let store = SqliteAlertStore::new(tmp.path()).await.unwrap();

    let mut state = DayState::empty(date(2));
    state.alerted.insert("ETF:NIFTYBEES".to_string(), dec!(-2.5));
    state.alerted.insert("ETF:GOLDBEES".to_string(), dec!(-5.0));
    state.alerted.insert("STOCK:SBIN".to_string(), dec!(-8.0));
    state.summary_sent = true;
    state.etfs_tracked = 36;
    state.stocks_tracked = 5;

    store.save(&state).await.unwrap();
    let loaded = store.load(date(2)).await.unwrap();

    assert_eq!(loaded.date, state.date);
    assert_eq!(loaded.alerted, state.alerted);
    assert_eq!(loaded.summary_sent, state.summary_sent);
    assert_eq!(loaded.etfs_tracked, 36);
    assert_eq!(loaded.stocks_tracked, 5);

    // 再存一遍后内容不变（save(load(..)) 等价于无操作）
    store.save(&loaded).await.unwrap();
    let again = store.load(date(2)).await.unwrap();
    assert_eq!(again.alerted, state.alerted);
}

#[tokio::test]
async fn test_save_overwrites_previous_record() {
    let tmp = tempdir().expect("Failed to create temp dir");
    let store = SqliteAlertStore::new(tmp.path()).await.unwrap();

    let mut state = DayState::empty(date(2));
    state.alerted.insert("STOCK:SBIN".to_string(), dec!(-5.0));
    state.alerted.insert("STOCK:IRCTC".to_string(), dec!(-5.0));
    store.save(&state).await.unwrap();

    // 档位加深 + 一条记录消失，整体覆盖后不得有残留
    let mut deeper = DayState::empty(date(2));
    deeper.alerted.insert("STOCK:SBIN".to_string(), dec!(-8.0));
    store.save(&deeper).await.unwrap();

    let loaded = store.load(date(2)).await.unwrap();
    assert_eq!(loaded.alerted.len(), 1);
    assert_eq!(loaded.alerted.get("STOCK:SBIN"), Some(&dec!(-8.0)));
}

#[tokio::test]
async fn test_dates_are_isolated() {
    let tmp = tempdir().expect("Failed to create temp dir");
    let store = SqliteAlertStore::new(tmp.path()).await.unwrap();

    let mut monday = DayState::empty(date(2));
    monday.alerted.insert("ETF:ITBEES".to_string(), dec!(-3.5));
    monday.summary_sent = true;
    store.save(&monday).await.unwrap();

    // 新交易日隐式从空状态开始，前一日记录原样留存
    let tuesday = store.load(date(3)).await.unwrap();
    assert!(tuesday.alerted.is_empty());
    assert!(!tuesday.summary_sent);
    let reloaded = store.load(date(2)).await.unwrap();
    assert_eq!(reloaded.alerted.get("ETF:ITBEES"), Some(&dec!(-3.5)));
}

#[tokio::test]
async fn test_reopen_same_database_file() {
    let tmp = tempdir().expect("Failed to create temp dir");

    {
        let store = SqliteAlertStore::new(tmp.path()).await.unwrap();
        let mut state = DayState::empty(date(2));
        state.alerted.insert("STOCK:RELIANCE".to_string(), dec!(-10.0));
        store.save(&state).await.unwrap();
    }

    // 进程重启：新实例挂载同一目录仍能读回记忆
    let store = SqliteAlertStore::new(tmp.path()).await.unwrap();
    let loaded = store.load(date(2)).await.unwrap();
    assert_eq!(loaded.alerted.get("STOCK:RELIANCE"), Some(&dec!(-10.0)));
    assert!(tmp.path().join("alerts.db").exists());
}
