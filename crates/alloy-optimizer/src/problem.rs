//! 約束系統的共用表示
//!
//! 約束數學集中在 alloy-calc 的 ConstraintBuilder；本模組只定義
//! 兩種求解器共同接受的已建構系統形狀，避免每個求解器各自推導。

/// 一條線性不等式約束：coefficients · x ≤ bound
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintRow {
    /// 各決策變數的係數（依料源目錄順序）
    pub coefficients: Vec<f64>,
    /// 右端界
    pub bound: f64,
    /// 供診斷用的標籤，例如 `"Si max"`
    pub label: String,
}

impl ConstraintRow {
    pub fn new(coefficients: Vec<f64>, bound: f64, label: String) -> Self {
        Self {
            coefficients,
            bound,
            label,
        }
    }

    /// 此行在 x 處的違反量（≤ 0 表示滿足）
    pub fn violation(&self, x: &[f64]) -> f64 {
        dot(&self.coefficients, x) - self.bound
    }
}

/// 線性約束系統：目標向量、變數上界與不等式行
///
/// 所有行統一為 `row · x ≤ bound` 形式；變數隱含下界 0。
#[derive(Debug, Clone, Default)]
pub struct LinearSystem {
    /// 目標係數（最小化 objective · x）
    pub objective: Vec<f64>,
    /// 各變數的可用量上界，None 表示不限
    pub upper_bounds: Vec<Option<f64>>,
    /// 不等式行
    pub rows: Vec<ConstraintRow>,
}

impl LinearSystem {
    /// 創建指定目標與變數上界的空系統
    pub fn new(objective: Vec<f64>, upper_bounds: Vec<Option<f64>>) -> Self {
        debug_assert_eq!(objective.len(), upper_bounds.len());
        Self {
            objective,
            upper_bounds,
            rows: Vec::new(),
        }
    }

    /// 添加一條 `coefficients · x ≤ bound` 約束行
    pub fn push_row<S: Into<String>>(&mut self, coefficients: Vec<f64>, bound: f64, label: S) {
        debug_assert_eq!(coefficients.len(), self.num_vars());
        self.rows.push(ConstraintRow::new(coefficients, bound, label.into()));
    }

    pub fn num_vars(&self) -> usize {
        self.objective.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.rows.len()
    }

    /// 目標值 objective · x
    pub fn objective_value(&self, x: &[f64]) -> f64 {
        dot(&self.objective, x)
    }

    /// 所有行中最大的違反量（含變數界），全部滿足時 ≤ 0
    pub fn max_violation(&self, x: &[f64]) -> f64 {
        let row_violation = self
            .rows
            .iter()
            .map(|row| row.violation(x))
            .fold(f64::NEG_INFINITY, f64::max);
        let bound_violation = x
            .iter()
            .zip(&self.upper_bounds)
            .map(|(&xi, ub)| {
                let below = -xi;
                match ub {
                    Some(ub) => below.max(xi - ub),
                    None => below,
                }
            })
            .fold(f64::NEG_INFINITY, f64::max);
        row_violation.max(bound_violation)
    }
}

pub(crate) fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}
