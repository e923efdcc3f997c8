//! 約束建構器
//!
//! 百分比目標對未知數是非線性的（最終百分比 = 元素質量 / 變動的總質量），
//! 但兩邊同乘最終總質量（x 的仿射函數）後可精確線性化。
//! 所有約束數學集中於此，求解器只接受建好的系統。

use alloy_core::{Melt, OptimizeConfig, SourceCatalog, TargetRange};
use alloy_optimizer::LinearSystem;

/// 約束建構器
pub struct ConstraintBuilder;

impl ConstraintBuilder {
    /// 由目標範圍與料源成分建構線性不等式系統
    ///
    /// 對每個目標元素 e（範圍已含基體、已套用緩衝）：
    /// - 上界行：`Σ x_i (f_i(e) − maxf) ≤ maxf·M0 − m_e`
    /// - 下界行：`Σ x_i (minf − f_i(e)) ≤ m_e − minf·M0`
    ///
    /// 另加總質量行 `Σ x_i ≤ (factor − 1)·M0`；料源可用量上限
    /// 作為變數上界。料源未含的元素貢獻零係數，不是錯誤。
    /// 變數順序 = 目錄順序，固定不變以保證可重現。
    pub fn build(
        melt: &Melt,
        target: &TargetRange,
        catalog: &SourceCatalog,
        config: &OptimizeConfig,
    ) -> LinearSystem {
        let balance = config.balance_element.as_str();
        let m0 = melt.mass_kg;

        let objective: Vec<f64> = catalog.iter().map(|s| s.cost_per_kg).collect();
        let upper_bounds: Vec<Option<f64>> = catalog.iter().map(|s| s.max_available_kg).collect();
        let mut system = LinearSystem::new(objective, upper_bounds);

        for (element, min_pct, max_pct) in target.iter() {
            let element_mass = melt.element_mass(element);
            let max_frac = max_pct / 100.0;
            let min_frac = min_pct / 100.0;

            let max_row: Vec<f64> = catalog
                .iter()
                .map(|s| s.contribution(element, balance) - max_frac)
                .collect();
            system.push_row(max_row, max_frac * m0 - element_mass, format!("{} max", element));

            let min_row: Vec<f64> = catalog
                .iter()
                .map(|s| min_frac - s.contribution(element, balance))
                .collect();
            system.push_row(min_row, element_mass - min_frac * m0, format!("{} min", element));
        }

        system.push_row(
            vec![1.0; catalog.len()],
            (config.max_mass_increase_factor - 1.0) * m0,
            "total mass",
        );

        tracing::debug!(
            "約束系統建構完成：{} 變數 × {} 行",
            system.num_vars(),
            system.num_constraints()
        );
        system
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_core::{AdditiveSource, Composition};
    use float_eq::assert_float_eq;

    fn simple_case() -> (Melt, TargetRange, SourceCatalog, OptimizeConfig) {
        let comp = Composition::from_pairs([("Al", 90.0), ("Si", 10.0)]).unwrap();
        let melt = Melt::new("批次", comp, 100.0).unwrap();
        let target =
            TargetRange::from_ranges([("Al", 0.0, 100.0), ("Si", 20.0, 25.0)]).unwrap();
        let mut catalog = SourceCatalog::new();
        catalog
            .add(AdditiveSource::from_shorthand("Al-Si 50%", 1.0).unwrap())
            .unwrap();
        let config = OptimizeConfig::default().with_max_mass_increase_factor(2.0);
        (melt, target, catalog, config)
    }

    #[test]
    fn test_row_layout() {
        let (melt, target, catalog, config) = simple_case();
        let system = ConstraintBuilder::build(&melt, &target, &catalog, &config);

        // 每個目標元素兩行，外加總質量行
        assert_eq!(system.num_vars(), 1);
        assert_eq!(system.num_constraints(), 2 * 2 + 1);
        assert_eq!(system.rows.last().unwrap().label, "total mass");
    }

    #[test]
    fn test_linearized_coefficients() {
        let (melt, target, catalog, config) = simple_case();
        let system = ConstraintBuilder::build(&melt, &target, &catalog, &config);

        // BTreeMap 順序：Al 在 Si 之前
        let al_max = &system.rows[0];
        let si_max = &system.rows[2];
        let si_min = &system.rows[3];

        // Al 上界：(1.0 − 0.5)·(−1) … f=0.5，maxf=1.0 → 係數 −0.5，界 100−90=10
        assert_float_eq!(al_max.coefficients[0], -0.5, abs <= 1e-12);
        assert_float_eq!(al_max.bound, 10.0, abs <= 1e-12);

        // Si 上界：0.5−0.25 = 0.25，界 0.25·100−10 = 15
        assert_float_eq!(si_max.coefficients[0], 0.25, abs <= 1e-12);
        assert_float_eq!(si_max.bound, 15.0, abs <= 1e-12);

        // Si 下界：0.2−0.5 = −0.3，界 10−20 = −10（即 x ≥ 33.33）
        assert_float_eq!(si_min.coefficients[0], -0.3, abs <= 1e-12);
        assert_float_eq!(si_min.bound, -10.0, abs <= 1e-12);

        // 總質量行：x ≤ (2−1)·100
        assert_float_eq!(system.rows[4].bound, 100.0, abs <= 1e-12);
    }

    #[test]
    fn test_absent_element_contributes_zero_coefficient() {
        // 目標含 Fe，但料源不含 Fe：係數應為 0 − maxf，而非錯誤
        let comp = Composition::from_pairs([("Al", 99.0), ("Fe", 1.0)]).unwrap();
        let melt = Melt::new("批次", comp, 100.0).unwrap();
        let target = TargetRange::from_ranges([("Fe", 0.0, 1.3)]).unwrap();
        let mut catalog = SourceCatalog::new();
        catalog
            .add(AdditiveSource::from_shorthand("Al-Si 50%", 1.0).unwrap())
            .unwrap();
        let config = OptimizeConfig::default();

        let system = ConstraintBuilder::build(&melt, &target, &catalog, &config);
        let fe_max = &system.rows[0];
        assert_float_eq!(fe_max.coefficients[0], -0.013, abs <= 1e-12);
    }

    #[test]
    fn test_availability_becomes_variable_bound() {
        let (melt, target, mut catalog, config) = simple_case();
        let scrap_comp = Composition::from_pairs([("Si", 8.0)]).unwrap();
        catalog
            .add(
                AdditiveSource::scrap("回爐料", scrap_comp, 0.5)
                    .unwrap()
                    .with_max_available(30.0)
                    .unwrap(),
            )
            .unwrap();

        let system = ConstraintBuilder::build(&melt, &target, &catalog, &config);
        assert_eq!(system.upper_bounds, vec![None, Some(30.0)]);
        // 目標向量即各料源單價
        assert_eq!(system.objective, vec![1.0, 0.5]);
    }
}
