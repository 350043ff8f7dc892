use thiserror::Error;

use crate::models::{SectionKey, Stage};

/// 应用程序错误类型
///
/// 环境层面的失败（配置、HTTP 客户端）。
/// 向导内部的失败见下方各个领域错误，它们都作为值返回给控制器，不经过这里。
#[derive(Debug, Error)]
pub enum AppError {
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// HTTP 客户端构建失败
    #[error("HTTP 客户端初始化失败: {0}")]
    HttpClient(#[source] reqwest::Error),
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 读取配置文件失败
    #[error("读取配置文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    /// 配置值非法
    #[error("配置项 {key} 的值 '{value}' 无效")]
    InvalidValue { key: String, value: String },
}

// ========== 向导领域错误 ==========

/// 模板上传错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    /// 本地预检失败，未发起任何网络请求
    #[error("DOCX 파일만 업로드 가능합니다. (文件: {file_name})")]
    UnsupportedFormat { file_name: String },
    /// 分析服务返回失败（可重新选择文件重试）
    #[error("模板分析失败: {0}")]
    AnalysisFailed(String),
}

/// 章节生成错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// 未知的章节标识
    #[error("未知的章节: {0}")]
    UnknownSection(String),
    /// 生成服务返回失败（可对同一章节重新触发）
    #[error("章节生成失败: {0}")]
    RequestFailed(String),
    /// 同一章节已有请求在途（仅在 RejectWhilePending 策略下出现）
    #[error("章节 {0} 已有生成请求在进行中")]
    AlreadyPending(SectionKey),
}

/// 文档下载错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DownloadError {
    #[error("当前阶段 {0} 不允许下载文档")]
    NotAtDownloadStage(Stage),
    #[error("文档组装失败: {0}")]
    AssemblyFailed(String),
}

/// 阶段切换被拒绝的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GateDenial {
    /// 模板尚未分析成功
    #[error("请先上传并分析模板")]
    TemplateNotAnalyzed,
    /// 标题为空（去除空白后）
    #[error("사업계획서 제목을 입력해주세요")]
    EmptyTitle,
}

/// 外部协作方（分析 / 生成 / 组装服务）返回的错误
///
/// 核心逻辑不解读其内容，只转成不透明的消息字符串。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollaboratorError {
    /// 网络传输失败（包括超时）
    #[error("网络请求失败 ({endpoint}): {message}")]
    Transport { endpoint: String, message: String },
    /// 服务端返回非 2xx 响应
    #[error("{message}")]
    Rejected { status: u16, message: String },
    /// 响应无法解析
    #[error("响应格式无效: {0}")]
    InvalidResponse(String),
}

impl CollaboratorError {
    /// 面向用户展示的消息
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl From<CollaboratorError> for UploadError {
    fn from(err: CollaboratorError) -> Self {
        UploadError::AnalysisFailed(err.message())
    }
}

impl From<CollaboratorError> for GenerationError {
    fn from(err: CollaboratorError) -> Self {
        GenerationError::RequestFailed(err.message())
    }
}

impl From<CollaboratorError> for DownloadError {
    fn from(err: CollaboratorError) -> Self {
        DownloadError::AssemblyFailed(err.message())
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
