//! 模板上传协调器 - 业务能力层
//!
//! 只负责"校验 + 提交给分析服务"，不写会话。
//! 结果由 `WizardController` 折叠进会话。

use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;
use tracing::{debug, warn};

use crate::error::UploadError;
use crate::infrastructure::TemplateAnalyzer;
use crate::models::{StructureSummary, TemplateFile};

/// 模板上传协调器
#[derive(Clone)]
pub struct UploadCoordinator {
    analyzer: Arc<dyn TemplateAnalyzer>,
}

impl UploadCoordinator {
    pub fn new(analyzer: Arc<dyn TemplateAnalyzer>) -> Self {
        Self { analyzer }
    }

    /// 本地格式预检（同步，不发网络请求）
    pub fn validate(&self, file: &TemplateFile) -> Result<(), UploadError> {
        if file.has_template_extension() {
            Ok(())
        } else {
            warn!("⚠️ 拒绝非 DOCX 文件: {}", file.name);
            Err(UploadError::UnsupportedFormat {
                file_name: file.name.clone(),
            })
        }
    }

    /// 校验并发起分析请求
    ///
    /// 校验失败立即返回错误；否则返回尚未等待的请求 future。
    /// future 不引用会话，只持有文件副本和分析服务。
    pub fn dispatch(
        &self,
        file: &TemplateFile,
    ) -> Result<BoxFuture<'static, Result<StructureSummary, UploadError>>, UploadError> {
        self.validate(file)?;

        let analyzer = Arc::clone(&self.analyzer);
        let file = file.clone();
        debug!("提交模板分析: {}", file.name);

        Ok(async move { analyzer.analyze(file).await.map_err(UploadError::from) }.boxed())
    }

    /// 校验、提交并等待结果
    pub async fn submit_template(&self, file: &TemplateFile) -> Result<StructureSummary, UploadError> {
        self.dispatch(file)?.await
    }
}
