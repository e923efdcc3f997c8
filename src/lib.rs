//! # Alloy Blend
//!
//! 鋁合金配料優化引擎：在成本最小的前提下，計算把熔湯成分
//! 調整到目標範圍內所需的最少加料組合。
//!
//! ## 快速開始
//!
//! ```
//! use alloy_blend::{
//!     optimize, AdditiveSource, Composition, Melt, OptimizeConfig, SourceCatalog, TargetRange,
//! };
//!
//! let melt = Melt::new(
//!     "批次-001",
//!     Composition::from_pairs([("Al", 90.0), ("Si", 10.0)]).unwrap(),
//!     100.0,
//! )
//! .unwrap();
//! let target = TargetRange::from_ranges([("Si", 20.0, 25.0)]).unwrap();
//!
//! let mut catalog = SourceCatalog::new();
//! catalog
//!     .add(AdditiveSource::from_shorthand("Al-Si 50%", 3.5).unwrap())
//!     .unwrap();
//!
//! let config = OptimizeConfig::default().with_max_mass_increase_factor(2.0);
//! let result = optimize(&melt, &target, &catalog, &config).unwrap();
//! assert!(result.success);
//! ```

pub use alloy_calc::{
    BlendCalculator, ConstraintBuilder, FeasibilityChecker, IssueKind, PreCheckIssue, Projection,
    ResultProjector, Violation,
};
pub use alloy_core::{
    AdditiveSource, AlloyError, Composition, CorrectiveAddition, FailureKind, Melt,
    OptimizationResult, OptimizeConfig, Result, SolverKind, SourceCatalog, SourceKind,
    TargetRange,
};
pub use alloy_optimizer::{SolveError, SolveOutcome, Solver};

/// 一次性優化的便利入口
///
/// 等價於 `BlendCalculator::new(config.clone())?.calculate(...)`；
/// 需要在多個批次間重用同一配置時，直接持有 [`BlendCalculator`]。
pub fn optimize(
    melt: &Melt,
    target: &TargetRange,
    catalog: &SourceCatalog,
    config: &OptimizeConfig,
) -> Result<OptimizationResult> {
    BlendCalculator::new(config.clone())?.calculate(melt, target, catalog)
}
