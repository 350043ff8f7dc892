//! 外部协作方接口 - 基础设施层
//!
//! 向导核心只依赖这三个能力，不关心背后是 HTTP 还是别的实现：
//! - `TemplateAnalyzer`：分析模板结构
//! - `SectionGenerator`：生成单个章节内容
//! - `DocumentAssembler`：组装最终文档

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value as JsonValue};

use crate::error::CollaboratorError;
use crate::models::{BusinessInfo, SectionKey, SectionPayload, Session, StructureSummary, TemplateFile};

/// 模板分析服务
#[async_trait]
pub trait TemplateAnalyzer: Send + Sync {
    /// 上传一个模板文件，返回结构摘要
    async fn analyze(&self, file: TemplateFile) -> Result<StructureSummary, CollaboratorError>;
}

/// 章节生成服务
#[async_trait]
pub trait SectionGenerator: Send + Sync {
    async fn generate(
        &self,
        section: SectionKey,
        business_info: BusinessInfo,
    ) -> Result<SectionPayload, CollaboratorError>;
}

/// 文档组装服务
#[async_trait]
pub trait DocumentAssembler: Send + Sync {
    async fn assemble(&self, request: ExportRequest) -> Result<AssembledDocument, CollaboratorError>;
}

/// 文档导出请求体
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRequest {
    pub template_structure: JsonValue,
    pub generated_content: Map<String, JsonValue>,
    pub business_info: BusinessInfo,
}

impl ExportRequest {
    /// 从会话快照构建导出请求
    ///
    /// 只包含状态为 SUCCESS 的章节；财务计划的表格放在 `financial_tables`。
    pub fn from_session(session: &Session) -> Self {
        let mut generated_content = Map::new();

        for (key, payload) in session.successful_sections() {
            let content = match payload.content() {
                Some(text) => JsonValue::String(text.to_string()),
                None => payload.raw().clone(),
            };
            generated_content.insert(key.content_field().to_string(), content);

            if key == SectionKey::FinancialPlan {
                if let Some(tables) = payload.tables() {
                    generated_content.insert("financial_tables".to_string(), tables.clone());
                }
            }
        }

        Self {
            template_structure: session
                .template_structure()
                .map(|s| s.raw().clone())
                .unwrap_or_else(|| JsonValue::Object(Map::new())),
            generated_content,
            business_info: session.business_info().clone(),
        }
    }
}

/// 组装完成的文档
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledDocument {
    pub file_name: String,
    pub content: Vec<u8>,
}

/// 根据标题生成导出文件名：空格替换为下划线，没有标题时用 `business_plan`
///
/// 只在组装服务没有给出 `Content-Disposition` 文件名时使用。
pub fn export_file_name(title: &str) -> String {
    let stem = if title.is_empty() { "business_plan" } else { title };
    format!("{}.docx", stem).replace(' ', "_")
}
