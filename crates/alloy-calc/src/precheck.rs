//! 可行性預檢
//!
//! 在呼叫求解器之前判定「可證明不可行」的輸入，
//! 避免對註定無解的問題執行昂貴或數值不穩的求解。

use alloy_core::{Melt, OptimizeConfig, SourceCatalog, TargetRange};

/// 判斷是否需要稀釋/增濃的數值鬆弛量（kg）
const MASS_EPSILON: f64 = 1e-9;

/// 預檢問題類別
#[derive(Debug, Clone, PartialEq)]
pub enum IssueKind {
    /// 稀釋所需總質量超過質量增幅上限
    DilutionCapExceeded {
        /// 達到上界所需的最小總質量（kg）
        required_total_kg: f64,
        /// 超出上限的缺口（kg）
        deficit_kg: f64,
    },
    /// 加料的稀釋極限不低於上界，加多少料都達不到
    DilutionUnattainable {
        /// 添加量趨於無窮時該元素百分比的極限
        limit_pct: f64,
    },
    /// 需要增濃但目錄中無任何料源含該元素
    NoEnrichmentSource,
}

/// 一個元素的預檢問題
#[derive(Debug, Clone, PartialEq)]
pub struct PreCheckIssue {
    pub element: String,
    pub kind: IssueKind,
    /// 人類可讀的說明
    pub message: String,
}

/// 可行性預檢器
pub struct FeasibilityChecker;

impl FeasibilityChecker {
    /// 逐元素檢查稀釋與增濃的可達性，回傳所有發現的問題
    ///
    /// 稀釋側考慮目錄中對該元素貢獻最低的料源：即使全部使用
    /// 最乾淨的料源，最終百分比的極限也是其貢獻分數，
    /// 極限不低於上界時在有限質量內永遠達不到。
    pub fn check(
        melt: &Melt,
        target: &TargetRange,
        catalog: &SourceCatalog,
        config: &OptimizeConfig,
    ) -> Vec<PreCheckIssue> {
        let balance = config.balance_element.as_str();
        let m0 = melt.mass_kg;
        let cap_addition_kg = (config.max_mass_increase_factor - 1.0) * m0;
        let mut issues = Vec::new();

        for (element, min_pct, max_pct) in target.iter() {
            let element_mass = melt.element_mass(element);
            let max_frac = max_pct / 100.0;
            let min_frac = min_pct / 100.0;

            // 稀釋側：目前含量高於上界
            if element_mass > max_frac * m0 + MASS_EPSILON {
                let cleanest = catalog
                    .iter()
                    .map(|s| s.contribution(element, balance))
                    .fold(f64::INFINITY, f64::min);

                if cleanest >= max_frac || catalog.is_empty() {
                    let limit_pct = if catalog.is_empty() {
                        melt.element_pct(element)
                    } else {
                        cleanest * 100.0
                    };
                    issues.push(PreCheckIssue {
                        element: element.to_string(),
                        kind: IssueKind::DilutionUnattainable { limit_pct },
                        message: format!(
                            "{} 目前 {:.3}%，上界 {:.3}%，但任何加料組合的稀釋極限為 \
                             {:.3}%，有限質量內永遠達不到",
                            element,
                            melt.element_pct(element),
                            max_pct,
                            limit_pct
                        ),
                    });
                    continue;
                }

                let required_addition = (element_mass - max_frac * m0) / (max_frac - cleanest);
                if required_addition > cap_addition_kg + MASS_EPSILON {
                    let required_total = m0 + required_addition;
                    let deficit = required_addition - cap_addition_kg;
                    issues.push(PreCheckIssue {
                        element: element.to_string(),
                        kind: IssueKind::DilutionCapExceeded {
                            required_total_kg: required_total,
                            deficit_kg: deficit,
                        },
                        message: format!(
                            "{} 稀釋至 ≤ {:.3}% 至少需總質量 {:.2} kg，超過上限 \
                             {:.2} kg（尚缺 {:.2} kg 的添加空間）",
                            element,
                            max_pct,
                            required_total,
                            config.max_mass_increase_factor * m0,
                            deficit
                        ),
                    });
                }
            }

            // 增濃側：目前含量低於下界，必須有料源能供給該元素
            if element_mass < min_frac * m0 - MASS_EPSILON {
                let has_source = catalog
                    .iter()
                    .any(|s| s.contribution(element, balance) > 0.0);
                if !has_source {
                    issues.push(PreCheckIssue {
                        element: element.to_string(),
                        kind: IssueKind::NoEnrichmentSource,
                        message: format!(
                            "{} 需自 {:.3}% 提高到 ≥ {:.3}%，但目錄中沒有任何料源含 {}",
                            element,
                            melt.element_pct(element),
                            min_pct,
                            element
                        ),
                    });
                }
            }
        }

        issues
    }
}
