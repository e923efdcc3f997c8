//! 優化結果模型

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::Composition;

/// 失敗類別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureKind {
    /// 預檢即證明不可行，未呼叫求解器
    PreCheckInfeasible,
    /// 數值求解器報告無可行解
    SolverInfeasible,
    /// 求解成功但驗證未通過原始（未緩衝）目標範圍
    ToleranceViolation,
}

/// 自動補正記錄：為壓回超界元素而追加的純基體添加
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrectiveAddition {
    /// 使用的料源名稱
    pub source_name: String,
    /// 追加質量（kg）
    pub mass_kg: f64,
}

/// 優化結果
///
/// 成功與否以 `success` 表達；所有不可行情形都是結果值而非錯誤，
/// 呼叫端無需例外處理即可分支。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationResult {
    /// 是否成功
    pub success: bool,

    /// 各料源的添加量（kg）
    pub additions: BTreeMap<String, f64>,

    /// 總成本（$）
    pub cost: f64,

    /// 初始總質量（kg）
    pub initial_mass: f64,

    /// 最終總質量（kg）
    pub final_mass: f64,

    /// 最終成分（重量百分比）
    pub final_composition: Composition,

    /// 失敗說明
    pub message: Option<String>,

    /// 逐元素診斷（元素 → 說明）
    pub diagnostics: BTreeMap<String, String>,

    /// 失敗類別
    pub failure: Option<FailureKind>,

    /// 自動補正記錄（若有）
    pub correction: Option<CorrectiveAddition>,
}

impl OptimizationResult {
    /// 創建成功結果
    pub fn succeeded(
        additions: BTreeMap<String, f64>,
        cost: f64,
        initial_mass: f64,
        final_mass: f64,
        final_composition: Composition,
    ) -> Self {
        Self {
            success: true,
            additions,
            cost,
            initial_mass,
            final_mass,
            final_composition,
            message: None,
            diagnostics: BTreeMap::new(),
            failure: None,
            correction: None,
        }
    }

    /// 創建失敗結果
    pub fn failed(
        kind: FailureKind,
        message: String,
        diagnostics: BTreeMap<String, String>,
        initial_mass: f64,
    ) -> Self {
        Self {
            success: false,
            additions: BTreeMap::new(),
            cost: 0.0,
            initial_mass,
            final_mass: initial_mass,
            final_composition: Composition::new(),
            message: Some(message),
            diagnostics,
            failure: Some(kind),
            correction: None,
        }
    }

    /// 建構器模式：附上自動補正記錄
    pub fn with_correction(mut self, correction: CorrectiveAddition) -> Self {
        self.correction = Some(correction);
        self
    }

    /// 添加總量（kg）
    pub fn total_added(&self) -> f64 {
        self.additions.values().sum()
    }
}
