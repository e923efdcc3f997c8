//! 非線性罰函數求解器
//!
//! 保留作交叉驗證用的替代形式：不依賴 LP 線性化，改以二次罰函數
//! 直接評估約束，投影梯度下降求解。確定性且迭代次數有上限。

use crate::problem::{dot, LinearSystem};
use crate::{SolveError, Solver, SolveOutcome};

/// 罰係數遞增輪數
const PENALTY_ROUNDS: usize = 5;
/// 初始罰係數
const MU_INITIAL: f64 = 1e2;
/// 每輪罰係數放大倍率
const MU_GROWTH: f64 = 1e2;
/// 允許的殘餘約束違反量
const FEASIBILITY_TOL: f64 = 1e-6;

/// 罰函數求解器
///
/// 最小化 `c·x + μ Σ max(0, row·x − bound)²`，μ 逐輪放大，
/// 每輪最多 `max_iterations` 次投影梯度步。
#[derive(Debug, Clone, Copy)]
pub struct NonlinearSolver {
    max_iterations: usize,
}

impl NonlinearSolver {
    pub fn new(max_iterations: usize) -> Self {
        Self { max_iterations }
    }
}

impl Solver for NonlinearSolver {
    fn solve(&self, system: &LinearSystem) -> Result<SolveOutcome, SolveError> {
        let num_vars = system.num_vars();
        let num_constraints = system.num_constraints();

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

        // 行範數平方和，用於估計梯度的 Lipschitz 常數
        let row_norm_sq: f64 = system
            .rows
            .iter()
            .map(|row| row.coefficients.iter().map(|c| c * c).sum::<f64>())
            .sum();

        let mut x = vec![0.0; num_vars];
        let mut grad = vec![0.0; num_vars];
        let mut mu = MU_INITIAL;

        for round in 0..PENALTY_ROUNDS {
            let step = 1.0 / (2.0 * mu * row_norm_sq.max(1.0));

            for _ in 0..self.max_iterations {
                grad.copy_from_slice(&system.objective);
                for row in &system.rows {
                    let violation = dot(&row.coefficients, &x) - row.bound;
                    if violation > 0.0 {
                        let scale = 2.0 * mu * violation;
                        for (g, &c) in grad.iter_mut().zip(&row.coefficients) {
                            *g += scale * c;
                        }
                    }
                }

                // 投影梯度步：夾回 [0, 上界]
                let mut moved = 0.0_f64;
                for i in 0..num_vars {
                    let mut next = x[i] - step * grad[i];
                    if next < 0.0 {
                        next = 0.0;
                    }
                    if let Some(ub) = system.upper_bounds[i] {
                        if next > ub {
                            next = ub;
                        }
                    }
                    moved += (next - x[i]).abs();
                    x[i] = next;
                }
                if moved < 1e-14 {
                    break;
                }
            }

            tracing::debug!(
                "罰函數第 {} 輪完成，μ = {:.0e}，殘餘違反 {:.3e}",
                round + 1,
                mu,
                system.max_violation(&x).max(0.0)
            );
            mu *= MU_GROWTH;
        }

        let residual = system.max_violation(&x);
        if residual > FEASIBILITY_TOL {
            return Err(SolveError::Infeasible {
                num_vars,
                num_constraints,
                message: format!("罰函數法收斂後仍有 {:.6} 的約束違反", residual),
            });
        }

        let objective = system.objective_value(&x);
        Ok(SolveOutcome { x, objective })
    }
}
