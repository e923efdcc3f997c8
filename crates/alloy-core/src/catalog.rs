//! 料源目錄

use serde::{Deserialize, Serialize};

use crate::{AdditiveSource, AlloyError, Result};

/// 料源目錄：由呼叫端持有、以值傳入每次優化呼叫
///
/// 刻意不使用任何行程級全域註冊表；目錄順序即決策變數順序，
/// 順序固定以保證結果可重現。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceCatalog {
    sources: Vec<AdditiveSource>,
}

impl SourceCatalog {
    /// 創建空目錄
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加料源，名稱重複時回傳錯誤
    pub fn add(&mut self, source: AdditiveSource) -> Result<()> {
        if self.sources.iter().any(|s| s.name == source.name) {
            return Err(AlloyError::DuplicateSource(source.name));
        }
        self.sources.push(source);
        Ok(())
    }

    /// 批次添加料源
    pub fn add_many<I: IntoIterator<Item = AdditiveSource>>(&mut self, sources: I) -> Result<()> {
        for source in sources {
            self.add(source)?;
        }
        Ok(())
    }

    /// 依名稱移除料源
    pub fn remove(&mut self, name: &str) -> Result<()> {
        let before = self.sources.len();
        self.sources.retain(|s| s.name != name);
        if self.sources.len() == before {
            return Err(AlloyError::SourceNotFound(name.to_string()));
        }
        Ok(())
    }

    /// 依名稱查找料源
    pub fn get(&self, name: &str) -> Option<&AdditiveSource> {
        self.sources.iter().find(|s| s.name == name)
    }

    /// 料源名稱（依目錄順序）
    pub fn names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name.as_str()).collect()
    }

    /// 依目錄順序迭代料源
    pub fn iter(&self) -> impl Iterator<Item = &AdditiveSource> {
        self.sources.iter()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}
