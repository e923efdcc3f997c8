//! # Alloy Calculation Engine
//!
//! 配料計算引擎：可行性預檢、約束建構、結果投影與驗證

pub mod calculator;
pub mod constraints;
pub mod precheck;
pub mod projector;

// Re-export 主要類型
pub use calculator::BlendCalculator;
pub use constraints::ConstraintBuilder;
pub use precheck::{FeasibilityChecker, IssueKind, PreCheckIssue};
pub use projector::{Projection, ResultProjector, Violation};
