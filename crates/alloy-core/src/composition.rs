//! 成分模型：元素 → 重量百分比

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::element;
use crate::{AlloyError, Result};

/// 成分：元素符號 → 重量百分比
///
/// 百分比總和不必等於 100（未列出的部分視為隱含餘量）。
/// 使用 BTreeMap 以保證迭代順序確定，計算結果可重現。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Composition {
    entries: BTreeMap<String, f64>,
}

impl Composition {
    /// 創建空成分
    pub fn new() -> Self {
        Self::default()
    }

    /// 從 (元素, 百分比) 序列創建成分，構造時驗證符號與數值
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let mut composition = Self::new();
        for (element, pct) in pairs {
            composition = composition.with_element(element, pct)?;
        }
        Ok(composition)
    }

    /// 建構器模式：設置一個元素的百分比
    pub fn with_element<S: Into<String>>(mut self, element: S, pct: f64) -> Result<Self> {
        let element = element.into();
        element::validate_symbol(&element)?;
        if !pct.is_finite() || !(0.0..=100.0).contains(&pct) {
            return Err(AlloyError::InvalidPercentage {
                element,
                value: pct,
            });
        }
        self.entries.insert(element, pct);
        Ok(self)
    }

    /// 取得元素的百分比，未列出的元素回傳 0
    pub fn get(&self, element: &str) -> f64 {
        self.entries.get(element).copied().unwrap_or(0.0)
    }

    /// 取得元素的質量分數（百分比 / 100）
    pub fn fraction(&self, element: &str) -> f64 {
        self.get(element) / 100.0
    }

    /// 是否列出該元素
    pub fn contains(&self, element: &str) -> bool {
        self.entries.contains_key(element)
    }

    /// 所有列出元素的百分比總和
    pub fn total(&self) -> f64 {
        self.entries.values().sum()
    }

    /// 迭代 (元素, 百分比)
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// 列出的元素符號
    pub fn elements(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|k| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
