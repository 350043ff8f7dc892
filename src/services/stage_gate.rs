//! 阶段闸门 - 业务能力层
//!
//! 纯判断逻辑：会话能否从当前阶段切换到目标阶段。
//! 同步执行，无副作用。

use crate::error::GateDenial;
use crate::models::{Session, Stage};

/// 检查切换是否允许，拒绝时返回未满足的条件
///
/// - 后退或停留在原阶段：总是允许
/// - 前进：逐级检查跨过的每一道闸门，返回第一个未满足的条件
pub fn check(session: &Session, target: Stage) -> Result<(), GateDenial> {
    let mut stage = session.stage();
    while stage < target {
        check_leaving(session, stage)?;
        match stage.next() {
            Some(next) => stage = next,
            None => break,
        }
    }
    Ok(())
}

pub fn can_advance(session: &Session, target: Stage) -> bool {
    check(session, target).is_ok()
}

/// 离开某个阶段（前进一步）的条件
fn check_leaving(session: &Session, from: Stage) -> Result<(), GateDenial> {
    match from {
        Stage::TemplateUpload if session.template_structure().is_none() => {
            Err(GateDenial::TemplateNotAnalyzed)
        }
        Stage::BusinessInfo if !session.business_info().has_title() => Err(GateDenial::EmptyTitle),
        // GENERATION → DOWNLOAD 没有前置条件，即使一个章节都没生成
        _ => Ok(()),
    }
}
