use crate::thresholds::ThresholdTable;
use paisa_core::common::Snapshot;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// # Summary
/// 一次新的越档事件：本次告警的档位与此前已告警的档位。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Crossing {
    // 本次越过的最深档位
    pub slab: Decimal,
    // 当日此前已告警的档位（首次越档为 None）
    pub previous: Option<Decimal>,
}

/// # Summary
/// 越档判定器：决定一个快照是否产生新告警。纯函数，不修改任何状态。
///
/// # Invariants
/// - 同一标的在同一交易日内，每个新触达的档位深度至多产生一次告警。
/// - 已告警档位只会加深（更负），价格回升再跌回同档不重触发。
/// - 各标的相互独立，判定顺序不影响结果。
///
/// # Logic
/// 1. 求快照涨跌幅越过的最深档位，未越档则终止。
/// 2. 查询该标的当日已告警档位 `prev`。
/// 3. `prev` 不存在（当日首次）或本次档位严格更深时产生告警，
///    其余情况（同档或更浅）保持静默。
///
/// # Arguments
/// * `snapshot` - 待判定的快照。
/// * `table` - 该快照类别的阈值表。
/// * `alerted` - 当日已告警映射（标的 -> 最深档位）。
///
/// # Returns
/// * 需要告警时返回 `Some(Crossing)`，否则返回 None。
pub fn evaluate(
    snapshot: &Snapshot,
    table: &ThresholdTable,
    alerted: &BTreeMap<String, Decimal>,
) -> Option<Crossing> {
    let crossed = table.deepest_crossed(snapshot.change_percent)?;
    match alerted.get(&snapshot.id) {
        // 已在同档或更深档告警过，静默
        Some(prev) if crossed >= *prev => None,
        prev => Some(Crossing {
            slab: crossed,
            previous: prev.copied(),
        }),
    }
}
