//! 测试用的内存协作方
#![allow(dead_code)]

use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use business_plan_wizard::error::CollaboratorError;
use business_plan_wizard::infrastructure::{
    export_file_name, AssembledDocument, DocumentAssembler, ExportRequest, SectionGenerator,
    TemplateAnalyzer,
};
use business_plan_wizard::models::{BusinessInfo, SectionPayload, StructureSummary};
use business_plan_wizard::{Collaborators, GenerationPolicy, SectionKey, TemplateFile, WizardController};
use serde_json::{json, Value};

/// 示例模板的分析结果
pub fn sample_structure() -> Value {
    json!({
        "paragraphs": [
            { "index": 0, "text": "사업 개요", "style": "Heading 1" },
            { "index": 1, "text": "시장 분석", "style": "Heading 1" }
        ],
        "tables": [],
        "metadata": { "paragraph_count": 42, "table_count": 5 }
    })
}

pub fn docx(name: &str) -> TemplateFile {
    TemplateFile::new(name, b"PK\x03\x04template".to_vec())
}

/// 模板分析服务：按顺序返回预设结果，用完后返回 `sample_structure()`
#[derive(Default)]
pub struct MockAnalyzer {
    responses: Mutex<VecDeque<Result<Value, CollaboratorError>>>,
    calls: AtomicUsize,
}

impl MockAnalyzer {
    pub fn push(&self, response: Result<Value, CollaboratorError>) {
        self.responses.lock().unwrap().push_back(response);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TemplateAnalyzer for MockAnalyzer {
    async fn analyze(&self, _file: TemplateFile) -> Result<StructureSummary, CollaboratorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self.responses.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Ok(sample_structure()))
            .map(StructureSummary::new)
    }
}

/// 章节生成服务
///
/// `notes == "fail"` 的请求或被标记为失败的章节返回 500，其余返回带标题的内容。
#[derive(Default)]
pub struct MockGenerator {
    failing: Mutex<HashSet<SectionKey>>,
    requests: Mutex<Vec<(SectionKey, BusinessInfo)>>,
}

impl MockGenerator {
    pub fn fail_section(&self, section: SectionKey) {
        self.failing.lock().unwrap().insert(section);
    }

    pub fn requests(&self) -> Vec<(SectionKey, BusinessInfo)> {
        self.requests.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl SectionGenerator for MockGenerator {
    async fn generate(
        &self,
        section: SectionKey,
        business_info: BusinessInfo,
    ) -> Result<SectionPayload, CollaboratorError> {
        self.requests
            .lock()
            .unwrap()
            .push((section, business_info.clone()));

        let failing = self.failing.lock().unwrap().contains(&section);
        if failing || business_info.notes == "fail" {
            return Err(CollaboratorError::Rejected {
                status: 500,
                message: format!("{} 생성 오류", section.display_name()),
            });
        }

        let mut payload = json!({
            "section": section.content_field(),
            "content": format!("{}: {}", section.display_name(), business_info.title),
        });
        if section == SectionKey::FinancialPlan {
            payload["tables"] = json!([{ "headers": ["항목", "2024", "2025"] }]);
        }
        Ok(SectionPayload::new(payload))
    }
}

/// 文档组装服务：记录请求，返回固定内容
#[derive(Default)]
pub struct MockAssembler {
    requests: Mutex<Vec<ExportRequest>>,
}

impl MockAssembler {
    pub fn requests(&self) -> Vec<ExportRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl DocumentAssembler for MockAssembler {
    async fn assemble(&self, request: ExportRequest) -> Result<AssembledDocument, CollaboratorError> {
        let file_name = export_file_name(&request.business_info.title);
        self.requests.lock().unwrap().push(request);
        Ok(AssembledDocument {
            file_name,
            content: b"PK\x03\x04assembled".to_vec(),
        })
    }
}

/// 一组可观察的 mock 协作方
pub struct Mocks {
    pub analyzer: Arc<MockAnalyzer>,
    pub generator: Arc<MockGenerator>,
    pub assembler: Arc<MockAssembler>,
}

impl Mocks {
    pub fn new() -> Self {
        Self {
            analyzer: Arc::new(MockAnalyzer::default()),
            generator: Arc::new(MockGenerator::default()),
            assembler: Arc::new(MockAssembler::default()),
        }
    }

    pub fn collaborators(&self) -> Collaborators {
        Collaborators {
            analyzer: self.analyzer.clone(),
            generator: self.generator.clone(),
            assembler: self.assembler.clone(),
        }
    }

    pub fn controller(&self) -> WizardController {
        self.controller_with(GenerationPolicy::LastWriteWins)
    }

    pub fn controller_with(&self, policy: GenerationPolicy) -> WizardController {
        WizardController::new(self.collaborators(), policy)
    }
}

pub fn rejected(message: &str) -> CollaboratorError {
    CollaboratorError::Rejected {
        status: 500,
        message: message.to_string(),
    }
}
