//! 章节生成分发器 - 业务能力层
//!
//! 只负责"把事业信息交给生成服务"，一次调用对应一个请求。
//! 不同章节之间互不影响；结果由 `WizardController` 折叠进会话。

use std::str::FromStr;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;
use serde::Deserialize;
use tracing::debug;

use crate::error::{ConfigError, GenerationError};
use crate::infrastructure::SectionGenerator;
use crate::models::{BusinessInfo, SectionKey, SectionPayload};

/// 同一章节重复触发时的处理策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GenerationPolicy {
    /// 允许并发，最后返回的结果覆盖之前的
    #[default]
    LastWriteWins,
    /// 已有请求在途时拒绝新的请求
    RejectWhilePending,
}

impl FromStr for GenerationPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "last-write-wins" => Ok(GenerationPolicy::LastWriteWins),
            "reject-while-pending" => Ok(GenerationPolicy::RejectWhilePending),
            other => Err(ConfigError::InvalidValue {
                key: "generation_policy".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

/// 章节生成分发器
#[derive(Clone)]
pub struct GenerationDispatcher {
    generator: Arc<dyn SectionGenerator>,
}

impl GenerationDispatcher {
    pub fn new(generator: Arc<dyn SectionGenerator>) -> Self {
        Self { generator }
    }

    /// 解析章节 key（未知 key 立即失败，不发请求）
    pub fn resolve_key(&self, section_key: &str) -> Result<SectionKey, GenerationError> {
        section_key.parse()
    }

    /// 发起生成请求，返回尚未等待的 future
    ///
    /// 事业信息按调用时的快照发送，之后的修改不影响本次请求。
    pub fn dispatch(
        &self,
        section: SectionKey,
        business_info: &BusinessInfo,
    ) -> BoxFuture<'static, Result<SectionPayload, GenerationError>> {
        let generator = Arc::clone(&self.generator);
        let business_info = business_info.clone();
        debug!("提交章节生成: {}", section);

        async move {
            generator
                .generate(section, business_info)
                .await
                .map_err(GenerationError::from)
        }
        .boxed()
    }

    /// 解析 key、提交并等待结果
    pub async fn generate_section(
        &self,
        section_key: &str,
        business_info: &BusinessInfo,
    ) -> Result<SectionPayload, GenerationError> {
        let section = self.resolve_key(section_key)?;
        self.dispatch(section, business_info).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CollaboratorError;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    /// 记录收到的请求
    #[derive(Default)]
    struct RecordingGenerator {
        requests: Mutex<Vec<(SectionKey, BusinessInfo)>>,
    }

    #[async_trait]
    impl SectionGenerator for RecordingGenerator {
        async fn generate(
            &self,
            section: SectionKey,
            business_info: BusinessInfo,
        ) -> Result<SectionPayload, CollaboratorError> {
            self.requests.lock().unwrap().push((section, business_info));
            if section == SectionKey::FinancialPlan {
                return Err(CollaboratorError::Rejected {
                    status: 500,
                    message: "재무 계획 생성 오류".to_string(),
                });
            }
            Ok(SectionPayload::new(json!({
                "section": section.content_field(),
                "content": "생성된 내용"
            })))
        }
    }

    #[tokio::test]
    async fn test_unknown_section_makes_no_call() {
        let generator = Arc::new(RecordingGenerator::default());
        let dispatcher = GenerationDispatcher::new(generator.clone());

        let result = dispatcher
            .generate_section("swot-analysis", &BusinessInfo::default())
            .await;

        assert_eq!(
            result,
            Err(GenerationError::UnknownSection("swot-analysis".to_string()))
        );
        assert!(generator.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_business_info_is_snapshotted_at_dispatch() {
        let generator = Arc::new(RecordingGenerator::default());
        let dispatcher = GenerationDispatcher::new(generator.clone());

        let mut info = BusinessInfo {
            title: "初始标题".to_string(),
            ..Default::default()
        };
        let pending = dispatcher.dispatch(SectionKey::MarketAnalysis, &info);
        info.title = "修改后".to_string();

        let payload = pending.await.unwrap();

        assert_eq!(payload.content(), Some("생성된 내용"));
        let requests = generator.requests.lock().unwrap();
        assert_eq!(requests[0].1.title, "初始标题");
    }

    #[tokio::test]
    async fn test_failure_maps_to_request_failed() {
        let dispatcher = GenerationDispatcher::new(Arc::new(RecordingGenerator::default()));

        let result = dispatcher
            .generate_section("financial-plan", &BusinessInfo::default())
            .await;

        assert_eq!(
            result,
            Err(GenerationError::RequestFailed("재무 계획 생성 오류".to_string()))
        );
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!(
            "reject-while-pending".parse::<GenerationPolicy>().unwrap(),
            GenerationPolicy::RejectWhilePending
        );
        assert_eq!(GenerationPolicy::default(), GenerationPolicy::LastWriteWins);
        assert!("queue".parse::<GenerationPolicy>().is_err());
    }
}
