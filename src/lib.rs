//! # Business Plan Wizard
//!
//! 사업계획서 自动撰写向导的核心编排引擎
//!
//! ## 架构设计
//!
//! 本系统采用严格的分层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 外部协作方接口（模板分析 / 章节生成 / 文档组装）
//! - `clients/` - 基于 reqwest 的后端 API 客户端，实现上述接口
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，不持有会话
//! - `stage_gate` - 阶段切换条件判断
//! - `UploadCoordinator` - 模板格式校验与提交
//! - `GenerationDispatcher` - 单个章节的生成请求
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 会话状态机
//! - `WizardController` - 会话唯一的写入者，负责阶段切换和结果折叠
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/plan_runner` - 按计划文件批量走完整个向导
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use clients::PlanApiClient;
pub use config::Config;
pub use error::{AppError, AppResult, DownloadError, GateDenial, GenerationError, UploadError};
pub use models::{BusinessInfo, BusinessInfoPatch, SectionKey, Session, Stage, TemplateFile};
pub use orchestrator::{App, RunReport};
pub use services::GenerationPolicy;
pub use workflow::{Collaborators, Fold, UploadStatus, WizardController};
