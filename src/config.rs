use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::{AppResult, ConfigError};
use crate::services::GenerationPolicy;

/// 程序配置
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 后端 API 基础地址
    pub api_base_url: String,
    /// 单次请求超时（秒），超时按普通失败处理
    pub request_timeout_secs: u64,
    /// 同一章节重复触发时的处理策略
    pub generation_policy: GenerationPolicy,
    /// 批量模式的计划文件
    pub plan_file: String,
    /// 生成文档的输出目录
    pub output_dir: String,
    /// 文档组装接口路径
    ///
    /// 后端的导出路由挂载前缀随部署而定，默认值对应 `/api/export` 前缀。
    pub export_path: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000".to_string(),
            request_timeout_secs: 120,
            generation_policy: GenerationPolicy::LastWriteWins,
            plan_file: "plan.toml".to_string(),
            output_dir: "output".to_string(),
            export_path: "/api/export/export-docx".to_string(),
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 从环境变量加载，未设置的项使用默认值
    ///
    /// 设置了但无法解析的值返回 `ConfigError::InvalidValue`，不会静默回退。
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_env_overrides()
    }

    /// 从 TOML 文件加载，缺省项使用默认值
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::TomlParseFailed {
            path: path.display().to_string(),
            source,
        })
    }

    /// 先读 `WIZARD_CONFIG` 指定的配置文件（如有），再叠加环境变量
    pub fn load() -> AppResult<Self> {
        let base = match std::env::var("WIZARD_CONFIG") {
            Ok(path) => Self::from_toml_file(path)?,
            Err(_) => Self::default(),
        };
        Ok(base.with_env_overrides()?)
    }

    fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// 用 `lookup` 查到的值覆盖对应字段
    fn with_overrides(self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            api_base_url: lookup("PLAN_API_BASE_URL").unwrap_or(self.api_base_url),
            request_timeout_secs: parse_override(&lookup, "REQUEST_TIMEOUT_SECS")?
                .unwrap_or(self.request_timeout_secs),
            generation_policy: parse_override(&lookup, "GENERATION_POLICY")?
                .unwrap_or(self.generation_policy),
            plan_file: lookup("PLAN_FILE").unwrap_or(self.plan_file),
            output_dir: lookup("OUTPUT_DIR").unwrap_or(self.output_dir),
            export_path: lookup("EXPORT_PATH").unwrap_or(self.export_path),
            verbose_logging: parse_override(&lookup, "VERBOSE_LOGGING")?
                .unwrap_or(self.verbose_logging),
        })
    }
}

fn parse_override<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<T>, ConfigError> {
    match lookup(key) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue {
                key: key.to_string(),
                value,
            }),
    }
}
