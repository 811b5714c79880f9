use crate::messages::display_symbol;
use chrono::{DateTime, FixedOffset};
use paisa_core::common::Category;
use paisa_core::store::port::DayState;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// # Summary
/// 将当日告警记忆按类别、档位重组为分组视图。
/// 汇总不维护独立的累加器，而是在发送时刻从 `DayState.alerted` 重建，
/// 因此短生命周期进程也能得到完整摘要。
///
/// # Invariants
/// - 每个标的只出现一次，落在其当日最深档位下。
/// - 组内标的按标识符有序。
fn group_by_slab(state: &DayState, category: Category) -> BTreeMap<Decimal, Vec<String>> {
    let prefix = format!("{}:", category);
    let mut groups: BTreeMap<Decimal, Vec<String>> = BTreeMap::new();
    for (id, slab) in &state.alerted {
        if id.starts_with(&prefix) {
            groups
                .entry(*slab)
                .or_default()
                .push(display_symbol(id).to_string());
        }
    }
    groups
}

fn push_category_section(
    message: &mut String,
    heading: &str,
    groups: &BTreeMap<Decimal, Vec<String>>,
) {
    if groups.is_empty() {
        return;
    }
    message.push_str(&format!("<b>{}</b>\n\n", heading));
    // BTreeMap 升序为深到浅，倒序输出使最浅档在前
    for (slab, symbols) in groups.iter().rev() {
        message.push_str(&format!("<b>📉 {}% Threshold:</b>\n", slab));
        for symbol in symbols {
            message.push_str(&format!("  • {}\n", symbol));
        }
        message.push('\n');
    }
}

/// # Summary
/// 排版收盘汇总消息（Telegram HTML）。
///
/// # Logic
/// 1. 无任何告警时明确给出"今日无越档"的干净摘要。
/// 2. 否则按类别输出分档清单，档位从浅到深。
/// 3. 末尾附当日追踪数量与时间戳。
///
/// # Arguments
/// * `state` - 当日告警状态。
/// * `at` - 行情时区下的当前时刻。
///
/// # Returns
/// * 可直接投递的汇总正文。
pub fn render(state: &DayState, at: DateTime<FixedOffset>) -> String {
    let etf_groups = group_by_slab(state, Category::Etf);
    let stock_groups = group_by_slab(state, Category::Stock);

    let mut message = "📊 <b>Daily Summary</b> 📊\n\n".to_string();

    if etf_groups.is_empty() && stock_groups.is_empty() {
        message.push_str("✅ <b>No ETF or Stock crossed thresholds today</b>\n\n");
    } else {
        push_category_section(&mut message, "ETFs that crossed thresholds:", &etf_groups);
        push_category_section(
            &mut message,
            "Stocks that crossed thresholds:",
            &stock_groups,
        );
    }

    message.push_str(&format!("ETFs tracked: {}\n", state.etfs_tracked));
    message.push_str(&format!("Stocks tracked: {}\n", state.stocks_tracked));
    message.push_str(&format!("Time: {}", at.format("%I:%M %p, %d %b %Y")));
    message
}
