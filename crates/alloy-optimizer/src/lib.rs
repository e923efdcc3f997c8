//! # Alloy Optimizer
//!
//! 求解器抽象層：線性規劃與非線性罰函數兩種實作，
//! 皆接受同一種已建構的約束系統形狀

pub mod linear;
pub mod nonlinear;
pub mod problem;

// Re-export 主要類型
pub use linear::LinearSolver;
pub use nonlinear::NonlinearSolver;
pub use problem::{ConstraintRow, LinearSystem};

use alloy_core::SolverKind;

/// 求解成功的輸出：加料向量與目標值
#[derive(Debug, Clone, PartialEq)]
pub struct SolveOutcome {
    /// 各決策變數的最優值（kg，依料源目錄順序）
    pub x: Vec<f64>,
    /// 目標函數值
    pub objective: f64,
}

/// 求解失敗：以結構化值回報，不讓底層數值例外外洩
#[derive(Debug, thiserror::Error)]
pub enum SolveError {
    #[error("無可行解（{num_vars} 個變數，{num_constraints} 條約束）: {message}")]
    Infeasible {
        num_vars: usize,
        num_constraints: usize,
        message: String,
    },

    #[error("問題無界: {0}")]
    Unbounded(String),

    #[error("數值求解失敗: {0}")]
    Numerical(String),
}

/// 求解器能力介面
///
/// 兩種實作由配置選擇；約束數學不在此層重新推導。
pub trait Solver {
    fn solve(&self, system: &LinearSystem) -> Result<SolveOutcome, SolveError>;
}

/// 依配置選擇求解器
pub fn solver_for(kind: SolverKind, max_iterations: usize) -> Box<dyn Solver> {
    match kind {
        SolverKind::Linear => Box::new(LinearSolver::new()),
        SolverKind::Nonlinear => Box::new(NonlinearSolver::new(max_iterations)),
    }
}
