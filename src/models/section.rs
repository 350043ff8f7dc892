//! 可生成的章节

use std::fmt::Display;
use std::str::FromStr;

use crate::error::GenerationError;

/// 章节标识
///
/// 固定的三个章节，`as_str()` 即生成接口路径中使用的 key。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SectionKey {
    /// 시장 분석
    MarketAnalysis,
    /// 경쟁사 분석
    CompetitiveAnalysis,
    /// 재무 계획
    FinancialPlan,
}

impl SectionKey {
    pub const ALL: [SectionKey; 3] = [
        SectionKey::MarketAnalysis,
        SectionKey::CompetitiveAnalysis,
        SectionKey::FinancialPlan,
    ];

    /// 接口 key
    pub fn as_str(self) -> &'static str {
        match self {
            SectionKey::MarketAnalysis => "market-analysis",
            SectionKey::CompetitiveAnalysis => "competitive-analysis",
            SectionKey::FinancialPlan => "financial-plan",
        }
    }

    /// 导出文档时 `generated_content` 中使用的字段名
    pub fn content_field(self) -> &'static str {
        match self {
            SectionKey::MarketAnalysis => "market_analysis",
            SectionKey::CompetitiveAnalysis => "competitive_analysis",
            SectionKey::FinancialPlan => "financial_plan",
        }
    }

    /// 界面显示名称
    pub fn display_name(self) -> &'static str {
        match self {
            SectionKey::MarketAnalysis => "시장 분석",
            SectionKey::CompetitiveAnalysis => "경쟁사 분석",
            SectionKey::FinancialPlan => "재무 계획",
        }
    }
}

impl FromStr for SectionKey {
    type Err = GenerationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SectionKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| GenerationError::UnknownSection(s.to_string()))
    }
}

impl Display for SectionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
