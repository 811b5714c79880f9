use chrono::{DateTime, FixedOffset};
use paisa_core::common::{Category, Snapshot};
use rust_decimal::Decimal;

/// 从标的标识符剥掉类别前缀，得到展示用的交易代码
pub(crate) fn display_symbol(id: &str) -> &str {
    id.split_once(':').map_or(id, |(_, symbol)| symbol)
}

/// # Summary
/// 排版单条越档告警消息（Telegram HTML）。
///
/// # Logic
/// 1. 按类别选择标题与标签。
/// 2. 附上涨跌幅（两位小数）、现价、越过的档位与当地时刻。
///
/// # Arguments
/// * `snapshot` - 触发告警的快照。
/// * `slab` - 本次越过的最深档位。
/// * `at` - 行情时区下的当前时刻。
///
/// # Returns
/// * 可直接投递的消息正文。
pub fn alert_message(snapshot: &Snapshot, slab: Decimal, at: DateTime<FixedOffset>) -> String {
    let (header, label) = match snapshot.category {
        Category::Etf => ("🚨 <b>ETF Alert</b> 🚨", "ETF"),
        Category::Stock => ("📉 <b>Stock Alert</b> 📉", "Stock"),
    };

    let mut message = format!("{}\n\n", header);
    message.push_str(&format!(
        "<b>{}:</b> {}\n",
        label,
        display_symbol(&snapshot.id)
    ));
    message.push_str(&format!(
        "<b>Change:</b> {:.2}%\n",
        snapshot.change_percent
    ));
    message.push_str(&format!("<b>Price:</b> ₹{:.2}\n", snapshot.price));
    message.push_str(&format!("<b>Slab:</b> {}%\n", slab));
    message.push_str(&format!("<b>Time:</b> {}", at.format("%I:%M %p")));
    message
}
