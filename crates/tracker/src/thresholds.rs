use paisa_core::common::Category;
use paisa_core::config::{ConfigError, ThresholdsConfig};
use rust_decimal::Decimal;

/// # Summary
/// 单个类别的跌幅阈值表，定义告警的严重度档位。
///
/// # Invariants
/// - 所有阈值严格为负且互不相同。
/// - 内部按数值降序存放（最浅档在前，例如 -2.5 在 -10.0 之前）。
/// - 构造后不可变，运行期不做任何修改。
#[derive(Debug, Clone)]
pub struct ThresholdTable {
    slabs: Vec<Decimal>,
}

impl ThresholdTable {
    /// # Summary
    /// 由一组阈值构造并校验阈值表。
    ///
    /// # Logic
    /// 1. 拒绝空表。
    /// 2. 拒绝任何非负阈值。
    /// 3. 按数值降序排序后拒绝重复项。
    ///
    /// # Arguments
    /// * `slabs` - 无序的负百分比阈值集合。
    ///
    /// # Returns
    /// * 校验通过返回阈值表，否则返回 `ConfigError::InvalidThresholds`。
    pub fn new(mut slabs: Vec<Decimal>) -> Result<Self, ConfigError> {
        if slabs.is_empty() {
            return Err(ConfigError::InvalidThresholds(
                "threshold table must not be empty".to_string(),
            ));
        }
        if let Some(bad) = slabs.iter().find(|t| !t.is_sign_negative() || t.is_zero()) {
            return Err(ConfigError::InvalidThresholds(format!(
                "threshold {} is not negative",
                bad
            )));
        }
        slabs.sort_by(|a, b| b.cmp(a));
        if slabs.windows(2).any(|w| w[0] == w[1]) {
            return Err(ConfigError::InvalidThresholds(
                "duplicate threshold".to_string(),
            ));
        }
        Ok(Self { slabs })
    }

    /// # Summary
    /// 计算给定涨跌幅越过的最深档位。
    ///
    /// # Logic
    /// 表按浅到深有序，满足 `change <= t` 的档位构成前缀，
    /// 取该前缀的最后一项即为最深越档。边界相等计为越档。
    ///
    /// # Arguments
    /// * `change` - 相对前收盘的涨跌幅（百分比）。
    ///
    /// # Returns
    /// * 越过至少一档时返回最深档位，否则返回 None。
    pub fn deepest_crossed(&self, change: Decimal) -> Option<Decimal> {
        self.slabs
            .iter()
            .copied()
            .take_while(|t| change <= *t)
            .last()
    }

    /// 按浅到深返回全部档位
    pub fn slabs(&self) -> &[Decimal] {
        &self.slabs
    }
}

/// # Summary
/// 两个类别的阈值表集合。
#[derive(Debug, Clone)]
pub struct ThresholdTables {
    etf: ThresholdTable,
    stock: ThresholdTable,
}

impl ThresholdTables {
    /// # Summary
    /// 由配置构造全部类别的阈值表。
    ///
    /// # Arguments
    /// * `config` - 阈值配置段。
    ///
    /// # Returns
    /// * 两类阈值表或校验错误。
    pub fn from_config(config: &ThresholdsConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            etf: ThresholdTable::new(config.etf.clone())?,
            stock: ThresholdTable::new(config.stock.clone())?,
        })
    }

    /// 查表：返回指定类别的阈值表
    pub fn for_category(&self, category: Category) -> &ThresholdTable {
        match category {
            Category::Etf => &self.etf,
            Category::Stock => &self.stock,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn etf_table() -> ThresholdTable {
        ThresholdTable::new(vec![
            dec!(-2.5),
            dec!(-3.5),
            dec!(-5.0),
            dec!(-8.0),
            dec!(-10.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_rejects_bad_tables() {
        assert!(ThresholdTable::new(vec![]).is_err());
        assert!(ThresholdTable::new(vec![dec!(-5.0), dec!(2.5)]).is_err());
        assert!(ThresholdTable::new(vec![dec!(0.0), dec!(-5.0)]).is_err());
        assert!(ThresholdTable::new(vec![dec!(-5.0), dec!(-5.0)]).is_err());
    }

    #[test]
    fn test_table_is_ordered_shallow_to_deep() {
        let table = ThresholdTable::new(vec![dec!(-10.0), dec!(-2.5), dec!(-5.0)]).unwrap();
        assert_eq!(table.slabs(), &[dec!(-2.5), dec!(-5.0), dec!(-10.0)]);
    }

    #[test]
    fn test_deepest_crossed() {
        let table = etf_table();
        // 未触及最浅档
        assert_eq!(table.deepest_crossed(dec!(1.2)), None);
        assert_eq!(table.deepest_crossed(dec!(-2.49)), None);
        // 边界相等计为越档
        assert_eq!(table.deepest_crossed(dec!(-2.5)), Some(dec!(-2.5)));
        // 取最深满足档
        assert_eq!(table.deepest_crossed(dec!(-6.0)), Some(dec!(-5.0)));
        assert_eq!(table.deepest_crossed(dec!(-9.99)), Some(dec!(-8.0)));
        assert_eq!(table.deepest_crossed(dec!(-14.0)), Some(dec!(-10.0)));
    }
}
