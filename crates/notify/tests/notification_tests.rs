use paisa_core::notify::port::Notifier;
use paisa_notify::telegram::TelegramNotifier;
use std::env;

/// # Summary
/// 集成测试：验证 Telegram 通知发送功能。
///
/// # Logic
/// 1. 加载 .env 环境变量。
/// 2. 从环境变量获取 Bot Token 和 Chat ID。
/// 3. 初始化 TelegramNotifier。
/// 4. 发送测试消息并断言结果。
#[tokio::test]
#[ignore] // 默认忽略，仅在手动测试时通过环境变量开启
async fn test_telegram_notification() {
    let _ = dotenvy::dotenv();
    let bot_token = env::var("PAISA_TG_BOT_TOKEN").expect("PAISA_TG_BOT_TOKEN must be set");
    let chat_id = env::var("PAISA_TG_CHAT_ID").expect("PAISA_TG_CHAT_ID must be set");

    let notifier = TelegramNotifier::new(bot_token, chat_id).expect("Failed to build notifier");
    let result = notifier
        .notify("🔔 <b>Paisa</b>\n这是一条来自 Telegram 集成测试的消息")
        .await;

    assert!(result.is_ok(), "Telegram notification failed: {:?}", result);
}
