//! 计划批量运行器 - 编排层
//!
//! ## 职责
//!
//! 本模块是二进制程序的入口，按一份 TOML 计划文件把向导完整走一遍。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：创建 HTTP 客户端和向导控制器
//! 2. **健康检查**：后端不可用时提前提示（不中断）
//! 3. **模板上传**：读取模板并等待分析完成
//! 4. **并发生成**：同时发起所有章节请求，按完成顺序折叠
//! 5. **文档下载**：组装文档并写入输出目录
//! 6. **统计输出**：汇总各章节结果
//!
//! ## 设计特点
//!
//! - **不直接写会话**：所有状态变化都经过 `WizardController`
//! - **章节失败不中断**：下载阶段没有前置条件

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use futures::stream::{FuturesUnordered, StreamExt};
use tokio::fs;
use tracing::{info, warn};

use crate::clients::PlanApiClient;
use crate::config::Config;
use crate::models::{load_plan_input, load_template_file, PlanInput, SectionStatus, Stage};
use crate::utils::logging;
use crate::workflow::{Collaborators, Fold, WizardController};

/// 应用主结构
pub struct App {
    config: Config,
    client: Option<PlanApiClient>,
    controller: WizardController,
}

/// 一次运行的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub output_path: PathBuf,
    pub succeeded: usize,
    pub failed: usize,
}

impl App {
    /// 初始化应用（使用 HTTP 后端）
    pub fn initialize(config: Config) -> Result<Self> {
        logging::log_startup(&config);

        let client = PlanApiClient::new(&config).context("无法创建 API 客户端")?;
        let controller = WizardController::new(
            Collaborators::from_client(client.clone()),
            config.generation_policy,
        );

        Ok(Self {
            config,
            client: Some(client),
            controller,
        })
    }

    /// 使用自定义协作方初始化（跳过健康检查）
    pub fn with_collaborators(config: Config, collaborators: Collaborators) -> Self {
        let controller = WizardController::new(collaborators, config.generation_policy);
        Self {
            config,
            client: None,
            controller,
        }
    }

    pub fn controller(&self) -> &WizardController {
        &self.controller
    }

    /// 运行应用主逻辑
    pub async fn run(&mut self) -> Result<RunReport> {
        let plan_path = PathBuf::from(&self.config.plan_file);
        info!("\n📁 正在加载计划文件: {}", plan_path.display());
        let plan = load_plan_input(&plan_path).await?;

        self.check_backend().await;

        // ========== 1단계: 模板上传 ==========
        let template = load_template_file(&plan.template_path, plan_path.parent()).await?;
        self.controller
            .trigger_upload(template)
            .await
            .context("模板上传失败")?;
        if let Some(summary) = self.controller.analysis_summary() {
            info!("📄 문서 분석 결과: {}", summary);
        }

        // ========== 2단계: 事业信息 ==========
        self.controller
            .update_business_info(plan.business_info.clone().into());
        self.controller
            .request_advance(Stage::Generation)
            .context("无法进入生成阶段")?;

        // ========== 3단계: 章节生成 ==========
        self.generate_sections(&plan).await;

        // ========== 4단계: 下载 ==========
        self.controller
            .request_advance(Stage::Download)
            .context("无法进入下载阶段")?;
        let document = self.controller.download().await.context("文档下载失败")?;
        let output_path = self.save_document(&document.file_name, &document.content).await?;

        let report = self.build_report(output_path);
        let shown_path = report.output_path.display().to_string();
        logging::print_final_stats(self.controller.session(), Some(shown_path.as_str()));

        Ok(report)
    }

    /// 后端健康检查（失败只警告）
    async fn check_backend(&self) {
        let Some(client) = &self.client else {
            return;
        };
        match client.health_check().await {
            Ok(()) => info!("✓ 后端服务正常: {}", self.config.api_base_url),
            Err(e) => warn!("⚠️ 后端健康检查失败: {}，继续尝试", e),
        }
    }

    /// 同时发起所有章节请求，按完成顺序折叠
    async fn generate_sections(&mut self, plan: &PlanInput) {
        let mut in_flight = FuturesUnordered::new();

        for section_key in &plan.sections {
            match self.controller.begin_generation(section_key) {
                Ok(pending) => in_flight.push(pending.resolve()),
                Err(e) => warn!("⚠️ 跳过章节 {}: {}", section_key, e),
            }
        }

        info!("✨ 已发起 {} 个章节生成请求", in_flight.len());

        while let Some(outcome) = in_flight.next().await {
            if let Fold::Discarded = self.controller.fold_generation(outcome) {
                warn!("⚠️ 生成结果被丢弃");
            }
        }
    }

    async fn save_document(&self, file_name: &str, content: &[u8]) -> Result<PathBuf> {
        let output_dir = Path::new(&self.config.output_dir);
        fs::create_dir_all(output_dir)
            .await
            .with_context(|| format!("无法创建输出目录: {}", output_dir.display()))?;

        let output_path = output_dir.join(file_name);
        fs::write(&output_path, content)
            .await
            .with_context(|| format!("无法写入文档: {}", output_path.display()))?;

        Ok(output_path)
    }

    fn build_report(&self, output_path: PathBuf) -> RunReport {
        let results = self.controller.session().section_results();
        RunReport {
            output_path,
            succeeded: results
                .values()
                .filter(|r| r.status == SectionStatus::Success)
                .count(),
            failed: results
                .values()
                .filter(|r| r.status == SectionStatus::Failed)
                .count(),
        }
    }
}
