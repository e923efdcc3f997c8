//! 線性規劃求解器（good_lp + microlp 後端）

use good_lp::{
    microlp, variable, Expression, ProblemVariables, ResolutionError, Solution, SolverModel,
};

use crate::problem::LinearSystem;
use crate::{SolveError, Solver, SolveOutcome};

/// LP 求解器：成本目標與約束皆為線性時的常規路徑
///
/// microlp 為純 Rust 單純形實作，對相同輸入產生相同結果。
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearSolver;

impl LinearSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Solver for LinearSolver {
    fn solve(&self, system: &LinearSystem) -> Result<SolveOutcome, SolveError> {
        let num_vars = system.num_vars();
        let num_constraints = system.num_constraints();

        // 空目錄：無變數可解，僅檢查零向量是否可行
        if num_vars == 0 {
            return if system.rows.iter().all(|row| row.bound >= 0.0) {
                Ok(SolveOutcome {
                    x: Vec::new(),
                    objective: 0.0,
                })
            } else {
                Err(SolveError::Infeasible {
                    num_vars,
                    num_constraints,
                    message: "無任何料源而約束已被違反".to_string(),
                })
            };
        }

        let mut vars = ProblemVariables::new();
        let xs: Vec<_> = system
            .upper_bounds
            .iter()
            .map(|ub| {
                let mut def = variable().min(0.0);
                if let Some(max) = ub {
                    def = def.max(*max);
                }
                vars.add(def)
            })
            .collect();

        let objective: Expression = xs
            .iter()
            .zip(&system.objective)
            .map(|(&x, &c)| c * x)
            .sum();

        let mut model = vars.minimise(objective).using(microlp);
        for row in &system.rows {
            let lhs: Expression = xs
                .iter()
                .zip(&row.coefficients)
                .map(|(&x, &c)| c * x)
                .sum();
            model = model.with(lhs.leq(row.bound));
        }

        match model.solve() {
            Ok(solution) => {
                // 單純形的微小負值屬於數值噪音，夾回 0
                let x: Vec<f64> = xs.iter().map(|&v| solution.value(v).max(0.0)).collect();
                let objective = system.objective_value(&x);
                tracing::debug!("LP 求解完成，目標值 {:.6}", objective);
                Ok(SolveOutcome { x, objective })
            }
            Err(ResolutionError::Infeasible) => Err(SolveError::Infeasible {
                num_vars,
                num_constraints,
                message: "LP 求解器報告無可行解".to_string(),
            }),
            Err(ResolutionError::Unbounded) => {
                Err(SolveError::Unbounded("LP 求解器報告問題無界".to_string()))
            }
            Err(other) => Err(SolveError::Numerical(other.to_string())),
        }
    }
}
