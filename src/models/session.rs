//! 会话状态
//!
//! 一次向导运行的全部内存状态。字段只读公开，
//! 写操作仅限 crate 内部（由 `WizardController` 调用）。

use std::collections::BTreeMap;

use chrono::{DateTime, Local};
use uuid::Uuid;

use super::{BusinessInfo, BusinessInfoPatch, SectionKey, SectionPayload, Stage, StructureSummary, TemplateFile};

/// 章节生成状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionStatus {
    Pending,
    Success,
    Failed,
}

/// 单个章节的生成记录
#[derive(Debug, Clone, PartialEq)]
pub struct SectionResult {
    pub status: SectionStatus,
    pub payload: Option<SectionPayload>,
    pub error: Option<String>,
    pub updated_at: DateTime<Local>,
}

impl SectionResult {
    pub fn pending() -> Self {
        Self {
            status: SectionStatus::Pending,
            payload: None,
            error: None,
            updated_at: Local::now(),
        }
    }

    pub fn success(payload: SectionPayload) -> Self {
        Self {
            status: SectionStatus::Success,
            payload: Some(payload),
            error: None,
            updated_at: Local::now(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            status: SectionStatus::Failed,
            payload: None,
            error: Some(message.into()),
            updated_at: Local::now(),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == SectionStatus::Pending
    }
}

/// 会话（聚合根）
#[derive(Debug, Clone)]
pub struct Session {
    id: Uuid,
    stage: Stage,
    template: Option<TemplateFile>,
    template_structure: Option<StructureSummary>,
    business_info: BusinessInfo,
    section_results: BTreeMap<SectionKey, SectionResult>,
}

impl Session {
    pub(crate) fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            stage: Stage::TemplateUpload,
            template: None,
            template_structure: None,
            business_info: BusinessInfo::default(),
            section_results: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn template(&self) -> Option<&TemplateFile> {
        self.template.as_ref()
    }

    pub fn template_structure(&self) -> Option<&StructureSummary> {
        self.template_structure.as_ref()
    }

    pub fn business_info(&self) -> &BusinessInfo {
        &self.business_info
    }

    pub fn section_results(&self) -> &BTreeMap<SectionKey, SectionResult> {
        &self.section_results
    }

    pub fn section_result(&self, key: SectionKey) -> Option<&SectionResult> {
        self.section_results.get(&key)
    }

    /// 已成功生成的章节
    pub fn successful_sections(&self) -> impl Iterator<Item = (SectionKey, &SectionPayload)> {
        self.section_results
            .iter()
            .filter(|(_, r)| r.status == SectionStatus::Success)
            .filter_map(|(key, r)| r.payload.as_ref().map(|p| (*key, p)))
    }

    // ========== crate 内部写操作 ==========

    pub(crate) fn set_stage(&mut self, stage: Stage) {
        self.stage = stage;
    }

    /// 上传成功后的整体写入：模板、结构、阶段一次完成
    pub(crate) fn apply_analyzed_template(&mut self, file: TemplateFile, structure: StructureSummary) {
        self.template = Some(file);
        self.template_structure = Some(structure);
        self.stage = Stage::BusinessInfo;
    }

    pub(crate) fn merge_business_info(&mut self, patch: BusinessInfoPatch) {
        self.business_info.merge(patch);
    }

    pub(crate) fn put_section_result(&mut self, key: SectionKey, result: SectionResult) {
        self.section_results.insert(key, result);
    }
}
