//! 目標成分範圍模型

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::element;
use crate::{AlloyError, Result};

/// 目標範圍：元素 → (最小百分比, 最大百分比)
///
/// 不變量：0 ≤ min ≤ max ≤ 100，構造時驗證。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TargetRange {
    ranges: BTreeMap<String, (f64, f64)>,
}

impl TargetRange {
    /// 創建空的目標範圍
    pub fn new() -> Self {
        Self::default()
    }

    /// 從 (元素, 最小, 最大) 序列創建
    pub fn from_ranges<I, S>(ranges: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, f64, f64)>,
        S: Into<String>,
    {
        let mut target = Self::new();
        for (element, min, max) in ranges {
            target = target.with_range(element, min, max)?;
        }
        Ok(target)
    }

    /// 建構器模式：設置一個元素的目標範圍
    pub fn with_range<S: Into<String>>(mut self, element: S, min: f64, max: f64) -> Result<Self> {
        let element = element.into();
        element::validate_symbol(&element)?;
        let valid = min.is_finite() && max.is_finite() && 0.0 <= min && min <= max && max <= 100.0;
        if !valid {
            return Err(AlloyError::InvalidRange { element, min, max });
        }
        self.ranges.insert(element, (min, max));
        Ok(self)
    }

    /// 取得元素的目標範圍
    pub fn get(&self, element: &str) -> Option<(f64, f64)> {
        self.ranges.get(element).copied()
    }

    pub fn contains(&self, element: &str) -> bool {
        self.ranges.contains_key(element)
    }

    /// 迭代 (元素, 最小, 最大)
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64, f64)> {
        self.ranges.iter().map(|(k, (min, max))| (k.as_str(), *min, *max))
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// 若未包含基體元素，注入預設範圍
    ///
    /// 引擎要求目標範圍必須約束基體元素，否則求解器會傾向
    /// 無限制地添加基體稀釋其他元素。
    pub fn ensure_balance(&self, balance_element: &str, default_range: (f64, f64)) -> Self {
        let mut ensured = self.clone();
        if !ensured.ranges.contains_key(balance_element) {
            ensured
                .ranges
                .insert(balance_element.to_string(), default_range);
        }
        ensured
    }

    /// 產生求解期使用的緩衝範圍
    ///
    /// 指定元素的最小界被放大 `1 + buffer_pct/100` 倍（不超過最大界），
    /// 用於對沖熔煉燒損。驗證仍須以原始（未緩衝）範圍進行。
    pub fn buffered(&self, buffer_pct: f64, buffer_elements: &[String]) -> Self {
        if buffer_pct <= 0.0 || buffer_elements.is_empty() {
            return self.clone();
        }
        let mut buffered = Self::new();
        for (element, (min, max)) in &self.ranges {
            let min = if buffer_elements.iter().any(|e| e == element) {
                (min * (1.0 + buffer_pct / 100.0)).min(*max)
            } else {
                *min
            };
            buffered.ranges.insert(element.clone(), (min, *max));
        }
        buffered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_target_range() {
        let target = TargetRange::from_ranges([("Si", 7.5, 9.5), ("Cu", 3.0, 4.0)]).unwrap();
        assert_eq!(target.get("Si"), Some((7.5, 9.5)));
        assert_eq!(target.get("Fe"), None);
    }

    #[test]
    fn test_min_greater_than_max_rejected() {
        let result = TargetRange::new().with_range("Si", 9.5, 7.5);
        assert!(matches!(result, Err(AlloyError::InvalidRange { .. })));
    }

    #[test]
    fn test_out_of_bounds_rejected() {
        assert!(TargetRange::new().with_range("Si", -1.0, 5.0).is_err());
        assert!(TargetRange::new().with_range("Si", 5.0, 101.0).is_err());
    }

    #[test]
    fn test_ensure_balance_injects_default() {
        let target = TargetRange::from_ranges([("Si", 7.5, 9.5)]).unwrap();
        let ensured = target.ensure_balance("Al", (0.0, 100.0));
        assert_eq!(ensured.get("Al"), Some((0.0, 100.0)));
        // 已有的範圍不被覆蓋
        let explicit = TargetRange::from_ranges([("Al", 80.0, 90.0)]).unwrap();
        assert_eq!(
            explicit.ensure_balance("Al", (0.0, 100.0)).get("Al"),
            Some((80.0, 90.0))
        );
    }

    #[test]
    fn test_buffered_inflates_listed_minimums_only() {
        let target = TargetRange::from_ranges([("Si", 7.5, 9.5), ("Cu", 3.0, 4.0)]).unwrap();
        let buffered = target.buffered(2.0, &["Si".to_string()]);

        let (si_min, si_max) = buffered.get("Si").unwrap();
        assert!((si_min - 7.65).abs() < 1e-9);
        assert_eq!(si_max, 9.5);
        // 未指定的元素不變
        assert_eq!(buffered.get("Cu"), Some((3.0, 4.0)));
        // 原始範圍不被修改
        assert_eq!(target.get("Si"), Some((7.5, 9.5)));
    }

    #[test]
    fn test_buffered_clamped_to_max() {
        let target = TargetRange::from_ranges([("Mg", 9.0, 9.2)]).unwrap();
        let buffered = target.buffered(10.0, &["Mg".to_string()]);
        assert_eq!(buffered.get("Mg"), Some((9.2, 9.2)));
    }
}
