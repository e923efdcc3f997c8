//! # Alloy Core
//!
//! 配料引擎的核心資料模型與類型定義

pub mod catalog;
pub mod composition;
pub mod config;
pub mod element;
pub mod melt;
pub mod result;
pub mod source;
pub mod target;

// Re-export 主要類型
pub use catalog::SourceCatalog;
pub use composition::Composition;
pub use config::{OptimizeConfig, SolverKind};
pub use melt::Melt;
pub use result::{CorrectiveAddition, FailureKind, OptimizationResult};
pub use source::{AdditiveSource, SourceKind};
pub use target::TargetRange;

/// 配料錯誤類型
///
/// 僅涵蓋「輸入驗證失敗」與「求解器內部崩潰」兩類，
/// 優化本身的不可行結果以 [`OptimizationResult`] 值的形式回傳。
#[derive(Debug, thiserror::Error)]
pub enum AlloyError {
    #[error("無效的元素符號: {0}")]
    InvalidElementSymbol(String),

    #[error("元素 {element} 的百分比無效: {value}（必須在 0~100 之間）")]
    InvalidPercentage { element: String, value: f64 },

    #[error("中間合金 {name} 的成分總和必須為 100%，實際為 {total}%")]
    CompositionSumMismatch { name: String, total: f64 },

    #[error("廢料 {name} 的成分總和不可超過 100%，實際為 {total}%")]
    CompositionSumExceeded { name: String, total: f64 },

    #[error("元素 {element} 的目標範圍無效: ({min}, {max})")]
    InvalidRange { element: String, min: f64, max: f64 },

    #[error("無效的質量: {0} kg")]
    InvalidMass(f64),

    #[error("料源 {0} 已存在")]
    DuplicateSource(String),

    #[error("料源 {0} 不存在")]
    SourceNotFound(String),

    #[error("無效的料源簡寫名稱: {0}")]
    InvalidShorthand(String),

    #[error("無效的配置: {0}")]
    InvalidConfig(String),

    #[error("求解器內部錯誤: {0}")]
    SolverInternal(String),
}

pub type Result<T> = std::result::Result<T, AlloyError>;
