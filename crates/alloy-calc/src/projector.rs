//! 結果投影與驗證
//!
//! 由原始加料向量計算最終質量與成分，並以原始（未緩衝）目標範圍
//! 複驗。求解器回報成功是必要條件，不是充分條件。

use std::collections::{BTreeMap, BTreeSet};

use alloy_core::{
    Composition, Melt, OptimizeConfig, Result, SourceCatalog, TargetRange,
};

/// 低於此值的添加量視為數值噪音，直接剪除
///
/// 剪除發生在投影之前，回報的添加量與最終質量因此嚴格守恆。
pub const ADDITION_PRUNE_THRESHOLD_KG: f64 = 1e-6;

/// 投影結果：由加料向量推得的最終狀態
#[derive(Debug, Clone)]
pub struct Projection {
    /// 各料源的添加量（僅含剪除後非零者）
    pub additions: BTreeMap<String, f64>,
    /// 各元素的最終質量（kg）
    pub element_masses: BTreeMap<String, f64>,
    /// 最終總質量（kg）
    pub final_mass: f64,
    /// 最終成分（重量百分比）
    pub final_composition: Composition,
}

/// 驗證違規：某元素落在容差之外
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    pub element: String,
    pub actual_pct: f64,
    pub min_pct: f64,
    pub max_pct: f64,
}

impl Violation {
    /// 超出上界（而非低於下界）
    pub fn is_overshoot(&self) -> bool {
        self.actual_pct > self.max_pct
    }
}

/// 結果投影器
pub struct ResultProjector;

impl ResultProjector {
    /// 由加料向量計算最終質量與成分
    ///
    /// 最終元素質量 = 初始元素質量 + Σ(x_i · f_i(e))，
    /// 最終總質量 = 初始總質量 + Σ x_i，百分比為兩者之比 × 100。
    pub fn project(
        melt: &Melt,
        catalog: &SourceCatalog,
        x: &[f64],
        balance_element: &str,
    ) -> Result<Projection> {
        // 剪除數值噪音
        let pruned: Vec<f64> = x
            .iter()
            .map(|&xi| if xi < ADDITION_PRUNE_THRESHOLD_KG { 0.0 } else { xi })
            .collect();

        let mut elements: BTreeSet<String> = melt
            .composition
            .elements()
            .map(str::to_string)
            .collect();
        for source in catalog.iter() {
            elements.extend(source.composition.elements().map(str::to_string));
        }
        elements.insert(balance_element.to_string());

        let mut element_masses = BTreeMap::new();
        for element in &elements {
            let mut mass = melt.element_mass(element);
            for (source, &xi) in catalog.iter().zip(&pruned) {
                mass += xi * source.contribution(element, balance_element);
            }
            element_masses.insert(element.clone(), mass);
        }

        let total_added: f64 = pruned.iter().sum();
        let final_mass = melt.mass_kg + total_added;

        let mut final_composition = Composition::new();
        for (element, &mass) in &element_masses {
            let pct = (mass / final_mass * 100.0).clamp(0.0, 100.0);
            final_composition = final_composition.with_element(element.clone(), pct)?;
        }

        let additions: BTreeMap<String, f64> = catalog
            .iter()
            .zip(&pruned)
            .filter(|(_, &xi)| xi > 0.0)
            .map(|(source, &xi)| (source.name.clone(), xi))
            .collect();

        Ok(Projection {
            additions,
            element_masses,
            final_mass,
            final_composition,
        })
    }

    /// 以原始（未緩衝）目標範圍驗證投影結果
    ///
    /// 容差為絕對百分點，用於吸收浮點與緩衝引入的漂移。
    pub fn validate(
        projection: &Projection,
        target: &TargetRange,
        tolerance: f64,
    ) -> Vec<Violation> {
        let mut violations = Vec::new();
        for (element, min_pct, max_pct) in target.iter() {
            let actual = projection.final_composition.get(element);
            if actual < min_pct - tolerance || actual > max_pct + tolerance {
                violations.push(Violation {
                    element: element.to_string(),
                    actual_pct: actual,
                    min_pct,
                    max_pct,
                });
            }
        }
        violations
    }

    /// 計算一次補正稀釋：以純基體料源壓回輕微超界的元素
    ///
    /// 僅當所有違規都是「只有上界的元素超界」（下界為 0）、目錄中
    /// 存在不含違規元素的純基體料源、且補正後仍在質量增幅上限內時
    /// 才回傳補正量。
    pub fn corrective_addition(
        projection: &Projection,
        violations: &[Violation],
        target: &TargetRange,
        melt: &Melt,
        catalog: &SourceCatalog,
        config: &OptimizeConfig,
    ) -> Option<(String, f64)> {
        let balance = config.balance_element.as_str();

        let all_correctable = violations
            .iter()
            .all(|v| v.is_overshoot() && v.min_pct == 0.0 && v.max_pct > 0.0);
        if violations.is_empty() || !all_correctable {
            return None;
        }

        // 純基體料源，且對所有違規元素貢獻為零
        let diluent = catalog.iter().find(|s| {
            s.contribution(balance, balance) >= 1.0 - 1e-12
                && violations
                    .iter()
                    .all(|v| s.contribution(&v.element, balance) == 0.0)
        })?;

        // 使最超界的元素恰好回到上界所需的追加量
        let extra = violations
            .iter()
            .map(|v| {
                let (_, max_pct) = target.get(&v.element)?;
                let element_mass = projection.element_masses.get(&v.element)?;
                Some(element_mass / (max_pct / 100.0) - projection.final_mass)
            })
            .collect::<Option<Vec<f64>>>()?
            .into_iter()
            .fold(f64::NEG_INFINITY, f64::max);
        if extra <= 0.0 {
            return None;
        }

        // 補正不得突破質量增幅上限
        let cap = config.max_mass_increase_factor * melt.mass_kg;
        if projection.final_mass + extra > cap + 1e-9 {
            return None;
        }

        // 補正也要受料源可用量限制
        if let Some(max_kg) = diluent.max_available_kg {
            let already = projection.additions.get(&diluent.name).copied().unwrap_or(0.0);
            if already + extra > max_kg {
                return None;
            }
        }

        Some((diluent.name.clone(), extra))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_core::{AdditiveSource, Composition};
    use float_eq::assert_float_eq;
    use proptest::prelude::*;

    fn sample_melt() -> Melt {
        let comp = Composition::from_pairs([("Al", 90.0), ("Si", 10.0)]).unwrap();
        Melt::new("批次", comp, 100.0).unwrap()
    }

    fn sample_catalog() -> SourceCatalog {
        let mut catalog = SourceCatalog::new();
        catalog
            .add_many([
                AdditiveSource::from_shorthand("Al-Si 50%", 3.0).unwrap(),
                AdditiveSource::pure_element("Al", 2.2).unwrap(),
            ])
            .unwrap();
        catalog
    }

    #[test]
    fn test_project_scenario_numbers() {
        let projection =
            ResultProjector::project(&sample_melt(), &sample_catalog(), &[100.0 / 3.0, 0.0], "Al")
                .unwrap();

        assert_float_eq!(projection.final_mass, 400.0 / 3.0, abs <= 1e-9);
        assert_float_eq!(projection.final_composition.get("Si"), 20.0, abs <= 1e-9);
        assert_float_eq!(projection.final_composition.get("Al"), 80.0, abs <= 1e-9);
        assert_eq!(projection.additions.len(), 1);
    }

    #[test]
    fn test_noise_pruned_before_projection() {
        let projection =
            ResultProjector::project(&sample_melt(), &sample_catalog(), &[1e-9, 0.0], "Al")
                .unwrap();

        assert!(projection.additions.is_empty());
        // 剪除後質量嚴格守恆
        assert_eq!(projection.final_mass, 100.0);
    }

    #[test]
    fn test_validate_within_tolerance() {
        let projection =
            ResultProjector::project(&sample_melt(), &sample_catalog(), &[100.0 / 3.0, 0.0], "Al")
                .unwrap();
        let target = TargetRange::from_ranges([("Si", 20.0, 25.0)]).unwrap();

        assert!(ResultProjector::validate(&projection, &target, 0.01).is_empty());

        // 下界抬高後同一投影即違規
        let strict = TargetRange::from_ranges([("Si", 21.0, 25.0)]).unwrap();
        let violations = ResultProjector::validate(&projection, &strict, 0.01);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].element, "Si");
        assert!(!violations[0].is_overshoot());
    }

    #[test]
    fn test_corrective_addition_dilutes_overshoot() {
        // Fe 超界 0.02 個百分點，僅有上界 → 以純 Al 補正
        let comp = Composition::from_pairs([("Al", 98.68), ("Fe", 1.32)]).unwrap();
        let melt = Melt::new("批次", comp, 100.0).unwrap();
        let catalog = sample_catalog();
        let config = OptimizeConfig::default().with_auto_correct(true);
        let target = TargetRange::from_ranges([("Fe", 0.0, 1.3)]).unwrap();

        let projection = ResultProjector::project(&melt, &catalog, &[0.0, 0.0], "Al").unwrap();
        let violations = ResultProjector::validate(&projection, &target, 0.01);
        assert_eq!(violations.len(), 1);

        let (name, extra) = ResultProjector::corrective_addition(
            &projection,
            &violations,
            &target,
            &melt,
            &catalog,
            &config,
        )
        .unwrap();
        assert_eq!(name, "Pure Al");
        // 1.32 / 0.013 − 100 ≈ 1.538 kg
        assert_float_eq!(extra, 1.32 / 0.013 - 100.0, abs <= 1e-9);

        // 補正後恰在上界
        let corrected =
            ResultProjector::project(&melt, &catalog, &[0.0, extra], "Al").unwrap();
        assert!(ResultProjector::validate(&corrected, &target, 0.01).is_empty());
    }

    #[test]
    fn test_corrective_addition_refused_for_lower_bound_violation() {
        let melt = sample_melt();
        let catalog = sample_catalog();
        let config = OptimizeConfig::default().with_auto_correct(true);
        // Si 低於下界：不可用稀釋補正
        let target = TargetRange::from_ranges([("Si", 15.0, 25.0)]).unwrap();

        let projection = ResultProjector::project(&melt, &catalog, &[0.0, 0.0], "Al").unwrap();
        let violations = ResultProjector::validate(&projection, &target, 0.01);
        assert_eq!(violations.len(), 1);

        assert!(ResultProjector::corrective_addition(
            &projection,
            &violations,
            &target,
            &melt,
            &catalog,
            &config,
        )
        .is_none());
    }

    proptest! {
        /// 質量守恆：任意加料向量下，最終總質量 = 初始質量 + 回報添加量之和
        #[test]
        fn prop_mass_conservation(
            mass in 1.0_f64..1000.0,
            x1 in 0.0_f64..200.0,
            x2 in 0.0_f64..200.0,
        ) {
            let comp = Composition::from_pairs([("Al", 90.0), ("Si", 10.0)]).unwrap();
            let melt = Melt::new("批次", comp, mass).unwrap();
            let projection =
                ResultProjector::project(&melt, &sample_catalog(), &[x1, x2], "Al").unwrap();

            let reported: f64 = projection.additions.values().sum();
            prop_assert!((projection.final_mass - (mass + reported)).abs() < 1e-9);

            // 元素質量之和不超過總質量
            let element_sum: f64 = projection.element_masses.values().sum();
            prop_assert!(element_sum <= projection.final_mass + 1e-9);
        }
    }
}
