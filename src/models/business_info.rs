use serde::{Deserialize, Serialize};

/// 用户填写的事业信息
///
/// 序列化后即生成接口的请求体。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessInfo {
    /// 사업계획서 제목（离开 BUSINESS_INFO 前必须非空）
    #[serde(default)]
    pub title: String,
    /// 사업 설명
    #[serde(default)]
    pub description: String,
    /// 필수 요구사항
    #[serde(default)]
    pub requirements: String,
    /// 주의사항
    #[serde(default)]
    pub notes: String,
}

impl BusinessInfo {
    /// 标题去除首尾空白后是否非空
    pub fn has_title(&self) -> bool {
        !self.title.trim().is_empty()
    }

    /// 合并部分更新，`None` 字段保持原值
    pub fn merge(&mut self, patch: BusinessInfoPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(requirements) = patch.requirements {
            self.requirements = requirements;
        }
        if let Some(notes) = patch.notes {
            self.notes = notes;
        }
    }
}

/// 事业信息的部分更新
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BusinessInfoPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub requirements: Option<String>,
    pub notes: Option<String>,
}

impl BusinessInfoPatch {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    pub fn description(description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
            ..Default::default()
        }
    }
}

impl From<BusinessInfo> for BusinessInfoPatch {
    fn from(info: BusinessInfo) -> Self {
        Self {
            title: Some(info.title),
            description: Some(info.description),
            requirements: Some(info.requirements),
            notes: Some(info.notes),
        }
    }
}
