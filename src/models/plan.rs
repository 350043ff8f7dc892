use serde::Deserialize;

use super::{BusinessInfo, SectionKey};

/// 批量模式的计划输入（从 TOML 文件加载）
///
/// ```toml
/// template_path = "templates/plan_template.docx"
/// sections = ["market-analysis", "financial-plan"]
///
/// [business_info]
/// title = "AI 기반 스마트 물류 플랫폼"
/// description = "..."
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct PlanInput {
    /// 模板文件路径
    pub template_path: String,
    /// 要生成的章节 key，缺省为全部章节
    #[serde(default = "default_sections")]
    pub sections: Vec<String>,
    #[serde(default)]
    pub business_info: BusinessInfo,
    #[serde(skip)]
    pub file_path: Option<String>,
}

fn default_sections() -> Vec<String> {
    SectionKey::ALL.iter().map(|k| k.as_str().to_string()).collect()
}
