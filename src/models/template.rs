use std::fmt;

/// 唯一支持的模板格式后缀（区分大小写，与分析服务的判断一致）
pub const TEMPLATE_EXTENSION: &str = ".docx";

/// 用户选择的模板文件
#[derive(Clone, PartialEq, Eq)]
pub struct TemplateFile {
    pub name: String,
    pub content: Vec<u8>,
}

impl TemplateFile {
    pub fn new(name: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content,
        }
    }

    /// 文件名是否以 `.docx` 结尾
    ///
    /// 分析服务只接受小写后缀，大写的 `.DOCX` 在本地就拒绝，不发请求。
    pub fn has_template_extension(&self) -> bool {
        self.name.ends_with(TEMPLATE_EXTENSION)
    }

    pub fn size(&self) -> usize {
        self.content.len()
    }
}

// 内容可能很大，Debug 只输出长度
impl fmt::Debug for TemplateFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateFile")
            .field("name", &self.name)
            .field("size", &self.content.len())
            .finish()
    }
}
