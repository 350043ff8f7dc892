//! 在途请求
//!
//! 控制器发起请求后得到一张"票据"（`PendingUpload` / `PendingGeneration`），
//! 等待票据得到结果（`UploadOutcome` / `GenerationOutcome`），
//! 再交回控制器折叠进会话。票据不引用会话。

use std::collections::HashMap;
use std::fmt::{self, Display};
use std::sync::{Arc, Mutex, PoisonError};

use futures::future::BoxFuture;
use uuid::Uuid;

use crate::error::{GenerationError, UploadError};
use crate::models::{SectionKey, SectionPayload, StructureSummary, TemplateFile};

/// 请求上下文：属于哪个会话的第几个请求
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestCtx {
    pub session_id: Uuid,
    pub request_id: u64,
}

impl Display for RequestCtx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let id = self.session_id.simple().to_string();
        write!(f, "[会话 {} 请求#{}]", &id[..8], self.request_id)
    }
}

/// 在途的模板分析请求
pub struct PendingUpload {
    ctx: RequestCtx,
    file: TemplateFile,
    future: BoxFuture<'static, Result<StructureSummary, UploadError>>,
}

impl PendingUpload {
    pub(crate) fn new(
        ctx: RequestCtx,
        file: TemplateFile,
        future: BoxFuture<'static, Result<StructureSummary, UploadError>>,
    ) -> Self {
        Self { ctx, file, future }
    }

    pub fn ctx(&self) -> RequestCtx {
        self.ctx
    }

    pub fn file_name(&self) -> &str {
        &self.file.name
    }

    /// 等待分析服务返回
    pub async fn resolve(self) -> UploadOutcome {
        let result = self.future.await;
        UploadOutcome {
            ctx: self.ctx,
            file: self.file,
            result,
        }
    }
}

impl fmt::Debug for PendingUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingUpload")
            .field("ctx", &self.ctx)
            .field("file", &self.file)
            .finish_non_exhaustive()
    }
}

/// 模板分析结果（只能由 `PendingUpload::resolve` 产生）
#[derive(Debug)]
pub struct UploadOutcome {
    ctx: RequestCtx,
    pub(crate) file: TemplateFile,
    pub(crate) result: Result<StructureSummary, UploadError>,
}

impl UploadOutcome {
    pub fn ctx(&self) -> RequestCtx {
        self.ctx
    }

    pub fn result(&self) -> &Result<StructureSummary, UploadError> {
        &self.result
    }
}

/// 每个章节的在途请求计数（每个会话一份）
///
/// 计数由 `InFlightGuard` 持有，票据或结果被丢弃（包括 future 被取消）时自动减一，
/// 所以不会出现永远"在途"的章节。
#[derive(Debug, Clone, Default)]
pub(crate) struct InFlightRegistry {
    counts: Arc<Mutex<HashMap<SectionKey, usize>>>,
}

impl InFlightRegistry {
    pub(crate) fn enter(&self, section: SectionKey) -> InFlightGuard {
        *self.lock().entry(section).or_insert(0) += 1;
        InFlightGuard {
            registry: self.clone(),
            section,
        }
    }

    pub(crate) fn is_in_flight(&self, section: SectionKey) -> bool {
        self.lock().get(&section).is_some_and(|count| *count > 0)
    }

    fn leave(&self, section: SectionKey) {
        let mut counts = self.lock();
        if let Some(count) = counts.get_mut(&section) {
            *count = count.saturating_sub(1);
            if *count == 0 {
                counts.remove(&section);
            }
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<SectionKey, usize>> {
        self.counts.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// 一个在途请求的占位，drop 时释放
#[derive(Debug)]
pub(crate) struct InFlightGuard {
    registry: InFlightRegistry,
    section: SectionKey,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.registry.leave(self.section);
    }
}

/// 在途的章节生成请求
pub struct PendingGeneration {
    ctx: RequestCtx,
    section: SectionKey,
    future: BoxFuture<'static, Result<SectionPayload, GenerationError>>,
    guard: InFlightGuard,
}

impl PendingGeneration {
    pub(crate) fn new(
        ctx: RequestCtx,
        section: SectionKey,
        future: BoxFuture<'static, Result<SectionPayload, GenerationError>>,
        guard: InFlightGuard,
    ) -> Self {
        Self {
            ctx,
            section,
            future,
            guard,
        }
    }

    pub fn ctx(&self) -> RequestCtx {
        self.ctx
    }

    pub fn section(&self) -> SectionKey {
        self.section
    }

    /// 等待生成服务返回
    ///
    /// 占位随结果一起交回，折叠完成（或结果被丢弃）后才释放。
    pub async fn resolve(self) -> GenerationOutcome {
        let result = self.future.await;
        GenerationOutcome {
            ctx: self.ctx,
            section: self.section,
            result,
            _guard: self.guard,
        }
    }
}

impl fmt::Debug for PendingGeneration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingGeneration")
            .field("ctx", &self.ctx)
            .field("section", &self.section)
            .finish_non_exhaustive()
    }
}

/// 章节生成结果（只能由 `PendingGeneration::resolve` 产生）
#[derive(Debug)]
pub struct GenerationOutcome {
    ctx: RequestCtx,
    section: SectionKey,
    pub(crate) result: Result<SectionPayload, GenerationError>,
    _guard: InFlightGuard,
}

impl GenerationOutcome {
    pub fn ctx(&self) -> RequestCtx {
        self.ctx
    }

    pub fn section(&self) -> SectionKey {
        self.section
    }

    pub fn result(&self) -> &Result<SectionPayload, GenerationError> {
        &self.result
    }
}

/// 折叠结果
#[derive(Debug, Clone, PartialEq)]
pub enum Fold<T> {
    /// 已写入当前会话
    Applied(T),
    /// 结果属于已销毁的会话，直接丢弃
    Discarded,
}

impl<T> Fold<T> {
    pub fn is_discarded(&self) -> bool {
        matches!(self, Fold::Discarded)
    }

    pub fn applied(self) -> Option<T> {
        match self {
            Fold::Applied(value) => Some(value),
            Fold::Discarded => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_releases_on_drop() {
        let registry = InFlightRegistry::default();

        let first = registry.enter(SectionKey::MarketAnalysis);
        let second = registry.enter(SectionKey::MarketAnalysis);
        assert!(registry.is_in_flight(SectionKey::MarketAnalysis));
        assert!(!registry.is_in_flight(SectionKey::FinancialPlan));

        drop(first);
        assert!(registry.is_in_flight(SectionKey::MarketAnalysis));

        drop(second);
        assert!(!registry.is_in_flight(SectionKey::MarketAnalysis));
    }

    #[test]
    fn test_ctx_display_uses_short_session_id() {
        let ctx = RequestCtx {
            session_id: Uuid::nil(),
            request_id: 7,
        };
        assert_eq!(ctx.to_string(), "[会话 00000000 请求#7]");
    }
}
