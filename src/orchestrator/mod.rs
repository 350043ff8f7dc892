//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责把向导完整走一遍，是批量模式的"指挥中心"。
//!
//! ### `plan_runner` - 计划批量运行器
//! - 管理应用生命周期（初始化、运行、统计）
//! - 加载计划文件和模板
//! - 并发发起章节生成，按完成顺序折叠
//! - 写出最终文档
//!
//! ## 层次关系
//!
//! ```text
//! plan_runner (处理一份计划)
//!     ↓
//! workflow::WizardController (会话唯一写入者)
//!     ↓
//! services (能力层：stage_gate / upload / generation)
//!     ↓
//! infrastructure (协作方接口) ← clients (HTTP 实现)
//! ```

pub mod plan_runner;

// 重新导出主要类型
pub use plan_runner::{App, RunReport};
