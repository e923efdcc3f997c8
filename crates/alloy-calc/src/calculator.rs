//! 配料主計算器

use std::collections::BTreeMap;

use alloy_core::{
    AlloyError, CorrectiveAddition, FailureKind, Melt, OptimizationResult, OptimizeConfig,
    Result, SourceCatalog, TargetRange,
};
use alloy_optimizer::{solver_for, SolveError};

use crate::constraints::ConstraintBuilder;
use crate::precheck::FeasibilityChecker;
use crate::projector::ResultProjector;

/// 配料計算器
///
/// 每次呼叫獨立且無狀態：熔湯與目標為不可變輸入，料源目錄唯讀，
/// 相同輸入與配置必得到逐位元相同的結果。
pub struct BlendCalculator {
    config: OptimizeConfig,
}

impl BlendCalculator {
    /// 創建新的配料計算器，配置於此即驗證（快速失敗）
    pub fn new(config: OptimizeConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &OptimizeConfig {
        &self.config
    }

    /// 主優化入口
    ///
    /// 回傳 `Err` 僅限輸入驗證失敗或求解器內部崩潰；
    /// 預檢不可行、求解器無解、驗證違規皆為 `Ok` 中的失敗結果值。
    pub fn calculate(
        &self,
        melt: &Melt,
        target: &TargetRange,
        catalog: &SourceCatalog,
    ) -> Result<OptimizationResult> {
        let config = &self.config;
        tracing::info!(
            "開始配料優化：批次 {}，初始質量 {} kg，目標元素 {} 項，料源 {} 種",
            melt.name,
            melt.mass_kg,
            target.len(),
            catalog.len()
        );

        // Step 1: 注入基體元素的預設範圍
        tracing::debug!("Step 1: 基體範圍");
        let target = target.ensure_balance(&config.balance_element, config.balance_default_range);

        // Step 2: 可行性預檢，短路掉可證明不可行的輸入
        tracing::debug!("Step 2: 可行性預檢");
        let issues = FeasibilityChecker::check(melt, &target, catalog, config);
        if !issues.is_empty() {
            tracing::info!("預檢判定不可行：{} 個元素無法達標", issues.len());
            let diagnostics: BTreeMap<String, String> = issues
                .into_iter()
                .map(|issue| (issue.element, issue.message))
                .collect();
            return Ok(OptimizationResult::failed(
                FailureKind::PreCheckInfeasible,
                format!("預檢判定不可行：{} 個元素無法達標", diagnostics.len()),
                diagnostics,
                melt.mass_kg,
            ));
        }

        // Step 3: 以緩衝後範圍建構約束系統（驗證仍用原始範圍）
        tracing::debug!("Step 3: 約束建構");
        let buffered = target.buffered(config.buffer_pct, &config.buffer_elements);
        let system = ConstraintBuilder::build(melt, &buffered, catalog, config);

        // Step 4: 求解
        tracing::debug!("Step 4: 求解（{:?}）", config.solver_kind);
        let outcome = match solver_for(config.solver_kind, config.max_iterations).solve(&system) {
            Ok(outcome) => outcome,
            Err(error @ SolveError::Numerical(_)) => {
                // 真正的內部例外，與正常結果形狀區分
                return Err(AlloyError::SolverInternal(error.to_string()));
            }
            Err(error) => {
                tracing::info!("求解器無解：{}", error);
                return Ok(OptimizationResult::failed(
                    FailureKind::SolverInfeasible,
                    error.to_string(),
                    BTreeMap::new(),
                    melt.mass_kg,
                ));
            }
        };

        // Step 5: 投影最終質量與成分
        tracing::debug!("Step 5: 結果投影");
        let mut projection =
            ResultProjector::project(melt, catalog, &outcome.x, &config.balance_element)?;

        // Step 6: 以原始（未緩衝）範圍複驗，必要時嘗試一次補正稀釋
        tracing::debug!("Step 6: 驗證");
        let mut violations = ResultProjector::validate(&projection, &target, config.tolerance);
        let mut correction = None;

        if !violations.is_empty() && config.auto_correct {
            if let Some((source_name, extra_kg)) = ResultProjector::corrective_addition(
                &projection,
                &violations,
                &target,
                melt,
                catalog,
                config,
            ) {
                tracing::info!("自動補正：追加 {:.3} kg 的 {}", extra_kg, source_name);
                if let Some(index) = catalog.iter().position(|s| s.name == source_name) {
                    let mut corrected_x = outcome.x.clone();
                    corrected_x[index] += extra_kg;

                    let reprojected = ResultProjector::project(
                        melt,
                        catalog,
                        &corrected_x,
                        &config.balance_element,
                    )?;
                    let remaining =
                        ResultProjector::validate(&reprojected, &target, config.tolerance);
                    if remaining.is_empty() {
                        projection = reprojected;
                        violations = remaining;
                        correction = Some(CorrectiveAddition {
                            source_name,
                            mass_kg: extra_kg,
                        });
                    }
                }
            }
        }

        if !violations.is_empty() {
            let diagnostics: BTreeMap<String, String> = violations
                .iter()
                .map(|v| {
                    (
                        v.element.clone(),
                        format!(
                            "實際 {:.3}%，目標 {:.3}~{:.3}%",
                            v.actual_pct, v.min_pct, v.max_pct
                        ),
                    )
                })
                .collect();
            tracing::info!("驗證未通過：{} 個元素超出容差", diagnostics.len());
            return Ok(OptimizationResult::failed(
                FailureKind::ToleranceViolation,
                format!("求解成功但 {} 個元素超出容差", diagnostics.len()),
                diagnostics,
                melt.mass_kg,
            ));
        }

        let cost: f64 = projection
            .additions
            .iter()
            .map(|(name, kg)| {
                let cost_per_kg = catalog.get(name).map(|s| s.cost_per_kg).unwrap_or(0.0);
                kg * cost_per_kg
            })
            .sum();

        tracing::info!(
            "優化成功：添加 {:.3} kg，成本 {:.2}，最終質量 {:.3} kg",
            projection.final_mass - melt.mass_kg,
            cost,
            projection.final_mass
        );

        let mut result = OptimizationResult::succeeded(
            projection.additions,
            cost,
            melt.mass_kg,
            projection.final_mass,
            projection.final_composition,
        );
        if let Some(correction) = correction {
            result = result.with_correction(correction);
        }
        Ok(result)
    }
}
