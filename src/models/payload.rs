//! 外部服务返回的不透明载荷
//!
//! 分析服务和生成服务的 schema 不由本系统保证，
//! 这里只做原样保存，并提供少量只读访问器。

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// 模板结构摘要（分析服务的 `structure` 字段，原样保存）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StructureSummary(JsonValue);

impl StructureSummary {
    pub fn new(raw: JsonValue) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> &JsonValue {
        &self.0
    }

    pub fn into_raw(self) -> JsonValue {
        self.0
    }

    /// `metadata.paragraph_count`，缺失时为 0
    pub fn paragraph_count(&self) -> u64 {
        self.metadata_count("paragraph_count")
    }

    /// `metadata.table_count`，缺失时为 0
    pub fn table_count(&self) -> u64 {
        self.metadata_count("table_count")
    }

    /// 分析结果摘要行
    pub fn summary_line(&self) -> String {
        format!(
            "문단 수: {} | 표 수: {}",
            self.paragraph_count(),
            self.table_count()
        )
    }

    fn metadata_count(&self, field: &str) -> u64 {
        self.0
            .get("metadata")
            .and_then(|m| m.get(field))
            .and_then(|v| v.as_u64())
            .unwrap_or(0)
    }
}

/// 章节生成结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionPayload(JsonValue);

impl SectionPayload {
    pub fn new(raw: JsonValue) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> &JsonValue {
        &self.0
    }

    /// 生成的正文（`content` 字段）
    pub fn content(&self) -> Option<&str> {
        self.0.get("content").and_then(|v| v.as_str())
    }

    /// 附带的表格（仅财务计划会返回）
    pub fn tables(&self) -> Option<&JsonValue> {
        self.0.get("tables").filter(|v| !v.is_null())
    }
}
