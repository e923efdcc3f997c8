//! 熔湯模型

use serde::{Deserialize, Serialize};

use crate::{AlloyError, Composition, Result};

/// 熔湯：待調整的金屬批次，由成分與總質量定義
///
/// 每次優化呼叫中為不可變輸入。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Melt {
    /// 批次名稱
    pub name: String,

    /// 目前成分（重量百分比）
    pub composition: Composition,

    /// 總質量（kg，必須 > 0）
    pub mass_kg: f64,
}

impl Melt {
    /// 創建新的熔湯，構造時驗證質量
    pub fn new<S: Into<String>>(name: S, composition: Composition, mass_kg: f64) -> Result<Self> {
        if !mass_kg.is_finite() || mass_kg <= 0.0 {
            return Err(AlloyError::InvalidMass(mass_kg));
        }
        Ok(Self {
            name: name.into(),
            composition,
            mass_kg,
        })
    }

    /// 元素質量（kg）= 百分比 / 100 × 總質量
    pub fn element_mass(&self, element: &str) -> f64 {
        self.composition.fraction(element) * self.mass_kg
    }

    /// 元素目前的重量百分比
    pub fn element_pct(&self, element: &str) -> f64 {
        self.composition.get(element)
    }
}
