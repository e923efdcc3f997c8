//! 優化配置模型

use serde::{Deserialize, Serialize};

use crate::element;
use crate::{AlloyError, Result};

/// 求解器種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolverKind {
    /// 線性規劃（百分比約束經精確線性化，預設）
    Linear,
    /// 非線性罰函數法（直接評估百分比約束的交叉驗證路徑）
    Nonlinear,
}

/// 優化配置
///
/// 所有欄位都有工程上合理的預設值，可用建構器方法逐項覆蓋。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizeConfig {
    /// 最終質量 / 初始質量 的硬性上限
    pub max_mass_increase_factor: f64,

    /// 安全緩衝（%）：求解期放大指定元素的最小界
    pub buffer_pct: f64,

    /// 套用緩衝的易燒損元素
    pub buffer_elements: Vec<String>,

    /// 驗證容差（百分點）
    pub tolerance: f64,

    /// 求解器迭代上限（保證終止）
    pub max_iterations: usize,

    /// 求解器種類
    pub solver_kind: SolverKind,

    /// 輕微超界時是否自動以純基體補正稀釋
    /// - true: 嘗試一次補正步驟，並在結果中透明記錄
    /// - false: 直接降級為失敗（預設，保守策略）
    pub auto_correct: bool,

    /// 基體元素（餘量元素，通常為基底金屬）
    pub balance_element: String,

    /// 目標範圍未約束基體元素時注入的預設範圍
    pub balance_default_range: (f64, f64),
}

impl Default for OptimizeConfig {
    fn default() -> Self {
        Self {
            max_mass_increase_factor: 1.5,
            buffer_pct: 0.0,
            buffer_elements: Vec::new(),
            tolerance: 0.01,
            max_iterations: 1000,
            solver_kind: SolverKind::Linear,
            auto_correct: false,
            balance_element: "Al".to_string(),
            balance_default_range: (0.0, 100.0),
        }
    }
}

impl OptimizeConfig {
    /// 創建指定基體元素的配置，其餘為預設值
    pub fn new<S: Into<String>>(balance_element: S) -> Self {
        Self {
            balance_element: balance_element.into(),
            ..Self::default()
        }
    }

    /// 建構器模式：設置質量增幅上限
    pub fn with_max_mass_increase_factor(mut self, factor: f64) -> Self {
        self.max_mass_increase_factor = factor;
        self
    }

    /// 建構器模式：設置安全緩衝與套用的元素
    pub fn with_buffer<I, S>(mut self, buffer_pct: f64, elements: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.buffer_pct = buffer_pct;
        self.buffer_elements = elements.into_iter().map(Into::into).collect();
        self
    }

    /// 建構器模式：設置驗證容差
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// 建構器模式：設置迭代上限
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// 建構器模式：設置求解器種類
    pub fn with_solver_kind(mut self, kind: SolverKind) -> Self {
        self.solver_kind = kind;
        self
    }

    /// 建構器模式：設置是否自動補正
    pub fn with_auto_correct(mut self, auto_correct: bool) -> Self {
        self.auto_correct = auto_correct;
        self
    }

    /// 建構器模式：設置基體元素的預設範圍
    pub fn with_balance_default_range(mut self, min: f64, max: f64) -> Self {
        self.balance_default_range = (min, max);
        self
    }

    /// 驗證配置，於任何求解嘗試之前快速失敗
    pub fn validate(&self) -> Result<()> {
        if !self.max_mass_increase_factor.is_finite() || self.max_mass_increase_factor < 1.0 {
            return Err(AlloyError::InvalidConfig(format!(
                "質量增幅上限必須 ≥ 1，實際為 {}",
                self.max_mass_increase_factor
            )));
        }
        if !self.buffer_pct.is_finite() || self.buffer_pct < 0.0 {
            return Err(AlloyError::InvalidConfig(format!(
                "安全緩衝不可為負: {}",
                self.buffer_pct
            )));
        }
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(AlloyError::InvalidConfig(format!(
                "容差不可為負: {}",
                self.tolerance
            )));
        }
        if self.max_iterations == 0 {
            return Err(AlloyError::InvalidConfig(
                "迭代上限必須大於 0".to_string(),
            ));
        }
        element::validate_symbol(&self.balance_element)?;
        let (min, max) = self.balance_default_range;
        if !(0.0 <= min && min <= max && max <= 100.0) {
            return Err(AlloyError::InvalidConfig(format!(
                "基體預設範圍無效: ({}, {})",
                min, max
            )));
        }
        for element in &self.buffer_elements {
            element::validate_symbol(element)?;
        }
        Ok(())
    }
}
