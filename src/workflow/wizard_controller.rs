//! 向导控制器 - 流程层
//!
//! 核心职责：持有会话，并且是会话唯一的写入者。
//!
//! 流程顺序：
//! 1. 模板上传 → 分析成功后自动进入 BUSINESS_INFO
//! 2. 填写事业信息 → 标题非空才能进入 GENERATION
//! 3. 按章节触发生成（互相独立，同一章节后返回者覆盖）
//! 4. 进入 DOWNLOAD（无前置条件）→ 组装并下载文档
//!
//! 所有折叠都是同步的 `&mut self` 方法，因此折叠之间、折叠与阶段切换之间不会交错。

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::clients::PlanApiClient;
use crate::error::{DownloadError, GateDenial, GenerationError, UploadError};
use crate::infrastructure::{
    AssembledDocument, DocumentAssembler, ExportRequest, SectionGenerator, TemplateAnalyzer,
};
use crate::models::{
    BusinessInfoPatch, SectionKey, SectionPayload, SectionResult, Session, Stage, StructureSummary,
    TemplateFile,
};
use crate::services::{stage_gate, GenerationDispatcher, GenerationPolicy, UploadCoordinator};
use crate::utils::logging;
use crate::workflow::pending::{
    Fold, GenerationOutcome, InFlightRegistry, PendingGeneration, PendingUpload, RequestCtx,
    UploadOutcome,
};

/// 向导依赖的三个外部协作方
#[derive(Clone)]
pub struct Collaborators {
    pub analyzer: Arc<dyn TemplateAnalyzer>,
    pub generator: Arc<dyn SectionGenerator>,
    pub assembler: Arc<dyn DocumentAssembler>,
}

impl Collaborators {
    /// 三个能力都由同一个 HTTP 客户端提供
    pub fn from_client(client: PlanApiClient) -> Self {
        let client = Arc::new(client);
        Self {
            analyzer: client.clone(),
            generator: client.clone(),
            assembler: client,
        }
    }
}

/// 模板上传状态（供界面展示）
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadStatus {
    Idle,
    Pending { file_name: String },
    Succeeded { file_name: String },
    Failed(UploadError),
}

/// 一次已生效的阶段切换
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageTransition {
    pub from: Stage,
    pub to: Stage,
}

/// 向导控制器
pub struct WizardController {
    session: Session,
    uploader: UploadCoordinator,
    dispatcher: GenerationDispatcher,
    assembler: Arc<dyn DocumentAssembler>,
    policy: GenerationPolicy,
    upload_status: UploadStatus,
    /// 最近一次发起的上传请求，只有它的结果会更新 `upload_status`
    latest_upload: Option<u64>,
    in_flight: InFlightRegistry,
    next_request_id: u64,
}

impl WizardController {
    /// 创建控制器并开始一个新会话
    pub fn new(collaborators: Collaborators, policy: GenerationPolicy) -> Self {
        let session = Session::new();
        info!("🆕 新会话: {}", session.id());

        Self {
            session,
            uploader: UploadCoordinator::new(collaborators.analyzer),
            dispatcher: GenerationDispatcher::new(collaborators.generator),
            assembler: collaborators.assembler,
            policy,
            upload_status: UploadStatus::Idle,
            latest_upload: None,
            in_flight: InFlightRegistry::default(),
            next_request_id: 1,
        }
    }

    // ========== 只读访问 ==========

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn stage(&self) -> Stage {
        self.session.stage()
    }

    pub fn upload_status(&self) -> &UploadStatus {
        &self.upload_status
    }

    pub fn policy(&self) -> GenerationPolicy {
        self.policy
    }

    /// 分析结果摘要行，例如 `문단 수: 42 | 표 수: 5`
    pub fn analysis_summary(&self) -> Option<String> {
        self.session.template_structure().map(StructureSummary::summary_line)
    }

    // ========== 阶段切换 ==========

    /// 请求切换到目标阶段
    ///
    /// 被拒绝时不修改任何状态，返回未满足的条件。
    pub fn request_advance(&mut self, target: Stage) -> Result<StageTransition, GateDenial> {
        let from = self.session.stage();

        if let Err(denial) = stage_gate::check(&self.session, target) {
            warn!("⚠️ 无法从 {} 进入 {}: {}", from, target, denial);
            return Err(denial);
        }

        if from != target {
            self.session.set_stage(target);
            logging::log_stage_transition(from, target);
        }

        Ok(StageTransition { from, to: target })
    }

    // ========== 事业信息 ==========

    /// 合并部分更新，任何阶段都可以修改
    pub fn update_business_info(&mut self, patch: BusinessInfoPatch) {
        self.session.merge_business_info(patch);
    }

    // ========== 模板上传 ==========

    /// 校验并发起模板分析请求
    ///
    /// 格式不支持时立即失败，不发请求，会话不变。
    pub fn begin_upload(&mut self, file: TemplateFile) -> Result<PendingUpload, UploadError> {
        let future = match self.uploader.dispatch(&file) {
            Ok(future) => future,
            Err(err) => {
                self.upload_status = UploadStatus::Failed(err.clone());
                return Err(err);
            }
        };

        let ctx = self.next_ctx();
        self.latest_upload = Some(ctx.request_id);
        info!("{} 📤 正在上传模板: {}", ctx, file.name);
        self.upload_status = UploadStatus::Pending {
            file_name: file.name.clone(),
        };

        Ok(PendingUpload::new(ctx, file, future))
    }

    /// 折叠模板分析结果
    ///
    /// 成功：保存模板与结构（原样），阶段切换到 BUSINESS_INFO。
    /// 失败：会话不变，可重新上传。
    /// 多个上传交错时，`upload_status` 只反映最近一次发起的请求。
    pub fn fold_upload(&mut self, outcome: UploadOutcome) -> Fold<Result<StructureSummary, UploadError>> {
        let ctx = outcome.ctx();
        if !self.is_current(ctx) {
            return Fold::Discarded;
        }
        Fold::Applied(self.apply_upload(ctx, outcome.file, outcome.result))
    }

    /// 上传模板并等待分析完成
    ///
    /// 成功后的阶段为 BUSINESS_INFO；失败时阶段和结构都保持不变。
    pub async fn trigger_upload(&mut self, file: TemplateFile) -> Result<StructureSummary, UploadError> {
        let pending = self.begin_upload(file)?;
        let outcome = pending.resolve().await;
        let ctx = outcome.ctx();
        self.apply_upload(ctx, outcome.file, outcome.result)
    }

    fn apply_upload(
        &mut self,
        ctx: RequestCtx,
        file: TemplateFile,
        result: Result<StructureSummary, UploadError>,
    ) -> Result<StructureSummary, UploadError> {
        let is_latest = self.latest_upload == Some(ctx.request_id);
        match result {
            Ok(structure) => {
                let from = self.session.stage();
                let file_name = file.name.clone();
                self.session.apply_analyzed_template(file, structure.clone());
                if is_latest {
                    self.upload_status = UploadStatus::Succeeded {
                        file_name: file_name.clone(),
                    };
                }

                info!("{} ✓ 模板分析完成: {} ({})", ctx, file_name, structure.summary_line());
                if from != Stage::BusinessInfo {
                    logging::log_stage_transition(from, Stage::BusinessInfo);
                }
                Ok(structure)
            }
            Err(err) => {
                error!("{} ❌ 템플릿 분석 중 오류가 발생했습니다: {}", ctx, err);
                if is_latest {
                    self.upload_status = UploadStatus::Failed(err.clone());
                }
                Err(err)
            }
        }
    }

    // ========== 章节生成 ==========

    /// 发起章节生成请求
    ///
    /// 未知章节立即失败；`RejectWhilePending` 策略下同一章节在途时拒绝。
    /// 成功发起后该章节状态变为 PENDING。
    ///
    /// "在途"以票据为准而不是会话里的 PENDING 状态：
    /// 票据被丢弃或等待被取消后即可重新触发。
    pub fn begin_generation(&mut self, section_key: &str) -> Result<PendingGeneration, GenerationError> {
        let section = self.dispatcher.resolve_key(section_key).map_err(|err| {
            warn!("⚠️ {}", err);
            err
        })?;

        if self.policy == GenerationPolicy::RejectWhilePending && self.in_flight.is_in_flight(section) {
            warn!("⚠️ {} 已在生成中，忽略重复请求", section.display_name());
            return Err(GenerationError::AlreadyPending(section));
        }

        let future = self.dispatcher.dispatch(section, self.session.business_info());
        self.session.put_section_result(section, SectionResult::pending());

        let ctx = self.next_ctx();
        info!("{} ✨ 开始生成: {} ({})", ctx, section.display_name(), section);

        let guard = self.in_flight.enter(section);
        Ok(PendingGeneration::new(ctx, section, future, guard))
    }

    /// 折叠章节生成结果
    ///
    /// 直接覆盖该章节的记录（后折叠者胜出），不影响阶段和其他章节。
    pub fn fold_generation(
        &mut self,
        outcome: GenerationOutcome,
    ) -> Fold<Result<SectionPayload, GenerationError>> {
        let ctx = outcome.ctx();
        if !self.is_current(ctx) {
            return Fold::Discarded;
        }
        let section = outcome.section();
        Fold::Applied(self.apply_generation(ctx, section, outcome.result))
    }

    /// 生成单个章节并等待完成
    pub async fn trigger_generation(&mut self, section_key: &str) -> Result<SectionPayload, GenerationError> {
        let pending = self.begin_generation(section_key)?;
        let outcome = pending.resolve().await;
        let (ctx, section) = (outcome.ctx(), outcome.section());
        self.apply_generation(ctx, section, outcome.result)
    }

    fn apply_generation(
        &mut self,
        ctx: RequestCtx,
        section: SectionKey,
        result: Result<SectionPayload, GenerationError>,
    ) -> Result<SectionPayload, GenerationError> {
        match result {
            Ok(payload) => {
                self.session
                    .put_section_result(section, SectionResult::success(payload.clone()));
                info!(
                    "{} ✓ {} 생성 완료! 内容预览: {}",
                    ctx,
                    section.display_name(),
                    logging::truncate_text(payload.content().unwrap_or_default(), 40)
                );
                Ok(payload)
            }
            Err(err) => {
                self.session
                    .put_section_result(section, SectionResult::failed(err.to_string()));
                error!("{} ❌ {} 생성 중 오류가 발생했습니다: {}", ctx, section.display_name(), err);
                Err(err)
            }
        }
    }

    // ========== 下载 ==========

    /// 组装最终文档（只在 DOWNLOAD 阶段可用，不修改会话）
    pub async fn download(&self) -> Result<AssembledDocument, DownloadError> {
        let stage = self.session.stage();
        if stage != Stage::Download {
            warn!("⚠️ 当前阶段 {} 不能下载", stage);
            return Err(DownloadError::NotAtDownloadStage(stage));
        }

        let request = ExportRequest::from_session(&self.session);
        info!(
            "📄 正在组装文档，已生成章节: {}/{}",
            request.generated_content.keys().filter(|k| *k != "financial_tables").count(),
            SectionKey::ALL.len()
        );

        let document = self.assembler.assemble(request).await.map_err(|err| {
            error!("❌ 文档组装失败: {}", err);
            DownloadError::from(err)
        })?;

        info!("✓ 文档组装完成: {} ({} 字节)", document.file_name, document.content.len());
        Ok(document)
    }

    // ========== 会话生命周期 ==========

    /// 销毁当前会话并开始新会话
    ///
    /// 旧会话的在途请求返回后会被丢弃。
    pub fn reset(&mut self) {
        let old = self.session.id();
        self.session = Session::new();
        self.upload_status = UploadStatus::Idle;
        self.latest_upload = None;
        self.in_flight = InFlightRegistry::default();
        info!("♻️ 会话已重置: {} → {}", old, self.session.id());
    }

    fn next_ctx(&mut self) -> RequestCtx {
        let ctx = RequestCtx {
            session_id: self.session.id(),
            request_id: self.next_request_id,
        };
        self.next_request_id += 1;
        ctx
    }

    fn is_current(&self, ctx: RequestCtx) -> bool {
        if ctx.session_id == self.session.id() {
            true
        } else {
            info!("{} 🗑️ 会话已销毁，丢弃返回结果", ctx);
            false
        }
    }
}
