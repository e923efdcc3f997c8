//! 添加料源模型（中間合金、純元素、廢料）

use serde::{Deserialize, Serialize};

use crate::element;
use crate::{AlloyError, Composition, Result};

/// 中間合金成分總和的允許誤差
pub const MASTER_ALLOY_SUM_TOLERANCE: f64 = 1e-6;

/// 料源類型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceKind {
    /// 中間合金：成分固定且總和必須為 100%
    MasterAlloy,
    /// 純元素：單一元素 100%
    PureElement,
    /// 廢料：成分任意，餘量視為隱含的基體元素
    Scrap,
}

/// 添加料源：優化中的一個決策變數對應一種料源
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdditiveSource {
    /// 料源名稱（在目錄中唯一）
    pub name: String,

    /// 料源類型
    pub kind: SourceKind,

    /// 成分（重量百分比）
    pub composition: Composition,

    /// 單價（$/kg）
    pub cost_per_kg: f64,

    /// 可用量上限（kg），None 表示不限
    pub max_available_kg: Option<f64>,
}

impl AdditiveSource {
    /// 創建中間合金，構造時驗證成分總和為 100% ± 1e-6（硬性不變量）
    pub fn master_alloy<S: Into<String>>(
        name: S,
        composition: Composition,
        cost_per_kg: f64,
    ) -> Result<Self> {
        let name = name.into();
        let total = composition.total();
        if (total - 100.0).abs() > MASTER_ALLOY_SUM_TOLERANCE {
            return Err(AlloyError::CompositionSumMismatch { name, total });
        }
        Ok(Self {
            name,
            kind: SourceKind::MasterAlloy,
            composition,
            cost_per_kg,
            max_available_kg: None,
        })
    }

    /// 創建純元素料源（成分為單一元素 100%）
    pub fn pure_element(element: &str, cost_per_kg: f64) -> Result<Self> {
        element::validate_symbol(element)?;
        let composition = Composition::new().with_element(element, 100.0)?;
        Ok(Self {
            name: format!("Pure {}", element),
            kind: SourceKind::PureElement,
            composition,
            cost_per_kg,
            max_available_kg: None,
        })
    }

    /// 創建廢料料源
    ///
    /// 成分總和可小於 100%，未列出的餘量視為隱含的基體元素。
    pub fn scrap<S: Into<String>>(
        name: S,
        composition: Composition,
        cost_per_kg: f64,
    ) -> Result<Self> {
        let name = name.into();
        let total = composition.total();
        if total > 100.0 + MASTER_ALLOY_SUM_TOLERANCE {
            return Err(AlloyError::CompositionSumExceeded { name, total });
        }
        Ok(Self {
            name,
            kind: SourceKind::Scrap,
            composition,
            cost_per_kg,
            max_available_kg: None,
        })
    }

    /// 從簡寫名稱創建中間合金，例如 `"Al-Si 50%"` → {Al: 50, Si: 50}
    ///
    /// 百分比屬於第一個元素，餘量歸第二個元素。
    pub fn from_shorthand(shorthand: &str, cost_per_kg: f64) -> Result<Self> {
        let invalid = || AlloyError::InvalidShorthand(shorthand.to_string());

        let parts: Vec<&str> = shorthand.split_whitespace().collect();
        if parts.len() != 2 || !parts[1].ends_with('%') {
            return Err(invalid());
        }
        let elements: Vec<&str> = parts[0].split('-').collect();
        if elements.len() != 2 {
            return Err(invalid());
        }
        let pct: f64 = parts[1]
            .trim_end_matches('%')
            .parse()
            .map_err(|_| invalid())?;
        if !(0.0..=100.0).contains(&pct) {
            return Err(invalid());
        }

        let composition = Composition::new()
            .with_element(elements[0], pct)?
            .with_element(elements[1], 100.0 - pct)?;
        Self::master_alloy(shorthand, composition, cost_per_kg)
    }

    /// 建構器模式：設置可用量上限
    pub fn with_max_available(mut self, max_kg: f64) -> Result<Self> {
        if !max_kg.is_finite() || max_kg < 0.0 {
            return Err(AlloyError::InvalidMass(max_kg));
        }
        self.max_available_kg = Some(max_kg);
        Ok(self)
    }

    /// 每公斤料源對某元素貢獻的質量分數
    ///
    /// 廢料未列出的餘量計入基體元素；目標範圍中未被料源包含的
    /// 元素貢獻為 0，不是錯誤。
    pub fn contribution(&self, element: &str, balance_element: &str) -> f64 {
        let listed = self.composition.fraction(element);
        match self.kind {
            SourceKind::MasterAlloy | SourceKind::PureElement => listed,
            SourceKind::Scrap => {
                if element == balance_element {
                    let remainder = ((100.0 - self.composition.total()) / 100.0).max(0.0);
                    listed + remainder
                } else {
                    listed
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn fifty_fifty() -> Composition {
        Composition::from_pairs([("Al", 50.0), ("Si", 50.0)]).unwrap()
    }

    #[test]
    fn test_master_alloy_sum_invariant() {
        assert!(AdditiveSource::master_alloy("Al-Si", fifty_fifty(), 3.0).is_ok());

        let short = Composition::from_pairs([("Al", 50.0), ("Si", 49.0)]).unwrap();
        assert!(matches!(
            AdditiveSource::master_alloy("Al-Si", short, 3.0),
            Err(AlloyError::CompositionSumMismatch { .. })
        ));
    }

    #[test]
    fn test_master_alloy_sum_tolerance() {
        let nearly = Composition::from_pairs([("Al", 50.0), ("Si", 50.0 + 5e-7)]).unwrap();
        assert!(AdditiveSource::master_alloy("Al-Si", nearly, 3.0).is_ok());
    }

    #[test]
    fn test_pure_element() {
        let source = AdditiveSource::pure_element("Al", 2.2).unwrap();
        assert_eq!(source.name, "Pure Al");
        assert_eq!(source.kind, SourceKind::PureElement);
        assert_eq!(source.contribution("Al", "Al"), 1.0);
        assert_eq!(source.contribution("Si", "Al"), 0.0);
    }

    #[test]
    fn test_scrap_implicit_balance_remainder() {
        let comp = Composition::from_pairs([("Si", 8.0), ("Cu", 0.5)]).unwrap();
        let scrap = AdditiveSource::scrap("回爐料", comp, 0.5).unwrap();

        assert!((scrap.contribution("Al", "Al") - 0.915).abs() < 1e-12);
        assert_eq!(scrap.contribution("Si", "Al"), 0.08);
        // 基體若另有明示含量則與餘量相加
        let comp = Composition::from_pairs([("Al", 90.0), ("Si", 8.0)]).unwrap();
        let scrap = AdditiveSource::scrap("回爐料-2", comp, 0.5).unwrap();
        assert!((scrap.contribution("Al", "Al") - 0.92).abs() < 1e-12);
    }

    #[test]
    fn test_scrap_over_100_rejected() {
        let comp = Composition::from_pairs([("Si", 60.0), ("Cu", 50.0)]).unwrap();
        assert!(matches!(
            AdditiveSource::scrap("bad", comp, 0.5),
            Err(AlloyError::CompositionSumExceeded { .. })
        ));
    }

    #[rstest]
    #[case("Al-Si 50%", "Al", 50.0, "Si", 50.0)]
    #[case("Al-Mn 25%", "Al", 25.0, "Mn", 75.0)]
    #[case("Cu-Al 70%", "Cu", 70.0, "Al", 30.0)]
    fn test_shorthand_parse(
        #[case] shorthand: &str,
        #[case] first: &str,
        #[case] first_pct: f64,
        #[case] second: &str,
        #[case] second_pct: f64,
    ) {
        let source = AdditiveSource::from_shorthand(shorthand, 3.0).unwrap();
        assert_eq!(source.name, shorthand);
        assert_eq!(source.kind, SourceKind::MasterAlloy);
        assert_eq!(source.composition.get(first), first_pct);
        assert_eq!(source.composition.get(second), second_pct);
    }

    #[rstest]
    #[case("Al-Si")]
    #[case("AlSi 50%")]
    #[case("Al-Si 150%")]
    #[case("Al-Si-Cu 50%")]
    #[case("Al-Si abc%")]
    fn test_shorthand_invalid(#[case] shorthand: &str) {
        assert!(AdditiveSource::from_shorthand(shorthand, 3.0).is_err());
    }

    #[test]
    fn test_max_available() {
        let scrap = AdditiveSource::scrap("回爐料", Composition::new(), 0.5)
            .unwrap()
            .with_max_available(25.0)
            .unwrap();
        assert_eq!(scrap.max_available_kg, Some(25.0));
        assert!(scrap.with_max_available(-1.0).is_err());
    }
}
