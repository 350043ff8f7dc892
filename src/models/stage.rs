//! 向导阶段

use std::fmt::Display;

/// 向导的四个有序阶段
///
/// 顺序即推进方向，`Ord` 按声明顺序比较。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    /// 1단계: 양식 업로드
    TemplateUpload = 1,
    /// 2단계: 사업 정보 입력
    BusinessInfo = 2,
    /// 3단계: AI 자동 생성
    Generation = 3,
    /// 4단계: 다운로드
    Download = 4,
}

impl Stage {
    pub const ALL: [Stage; 4] = [
        Stage::TemplateUpload,
        Stage::BusinessInfo,
        Stage::Generation,
        Stage::Download,
    ];

    /// 阶段序号（从 1 开始）
    pub fn number(self) -> u8 {
        self as u8
    }

    /// 界面上显示的阶段标题
    pub fn title(self) -> &'static str {
        match self {
            Stage::TemplateUpload => "1단계: 사업계획서 양식 업로드",
            Stage::BusinessInfo => "2단계: 사업 정보 입력",
            Stage::Generation => "3단계: AI 자동 생성",
            Stage::Download => "4단계: 사업계획서 다운로드",
        }
    }

    pub fn next(self) -> Option<Stage> {
        match self {
            Stage::TemplateUpload => Some(Stage::BusinessInfo),
            Stage::BusinessInfo => Some(Stage::Generation),
            Stage::Generation => Some(Stage::Download),
            Stage::Download => None,
        }
    }

    pub fn previous(self) -> Option<Stage> {
        match self {
            Stage::TemplateUpload => None,
            Stage::BusinessInfo => Some(Stage::TemplateUpload),
            Stage::Generation => Some(Stage::BusinessInfo),
            Stage::Download => Some(Stage::Generation),
        }
    }
}

impl Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::TemplateUpload => "TEMPLATE_UPLOAD",
            Stage::BusinessInfo => "BUSINESS_INFO",
            Stage::Generation => "GENERATION",
            Stage::Download => "DOWNLOAD",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_order() {
        assert!(Stage::TemplateUpload < Stage::BusinessInfo);
        assert!(Stage::Generation < Stage::Download);
        assert_eq!(Stage::Download.number(), 4);
    }

    #[test]
    fn test_next_and_previous_are_inverse() {
        for stage in Stage::ALL {
            if let Some(next) = stage.next() {
                assert_eq!(next.previous(), Some(stage));
            }
        }
        assert_eq!(Stage::Download.next(), None);
        assert_eq!(Stage::TemplateUpload.previous(), None);
    }
}
