/// 사업계획서 后端 API 客户端
///
/// 封装所有与后端 REST API 相关的调用逻辑，
/// 同时实现三个协作方接口。
use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{header, Client, Response};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult, CollaboratorError};
use crate::infrastructure::{
    export_file_name, AssembledDocument, DocumentAssembler, ExportRequest, SectionGenerator,
    TemplateAnalyzer,
};
use crate::models::{BusinessInfo, SectionKey, SectionPayload, StructureSummary, TemplateFile};

const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

const UPLOAD_TEMPLATE_PATH: &str = "/api/documents/upload-template";
const GENERATION_PATH: &str = "/api/generation";
const HEALTH_PATH: &str = "/health";

/// 后端 API 客户端
#[derive(Clone)]
pub struct PlanApiClient {
    http: Client,
    base_url: String,
    /// 导出路由的挂载前缀由后端部署决定，见 `Config::export_path`
    export_path: String,
}

impl PlanApiClient {
    /// 创建新的客户端
    pub fn new(config: &Config) -> AppResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(AppError::HttpClient)?;

        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            export_path: config.export_path.clone(),
        })
    }

    /// 检查后端健康状态
    pub async fn health_check(&self) -> Result<(), CollaboratorError> {
        let url = self.url(HEALTH_PATH);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| transport_error(HEALTH_PATH, e))?;

        let body = read_json(response).await?;
        match body.get("status").and_then(|v| v.as_str()) {
            Some("healthy") => Ok(()),
            other => Err(CollaboratorError::InvalidResponse(format!(
                "健康检查状态异常: {:?}",
                other
            ))),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl TemplateAnalyzer for PlanApiClient {
    async fn analyze(&self, file: TemplateFile) -> Result<StructureSummary, CollaboratorError> {
        debug!("上传模板: {} ({} 字节)", file.name, file.size());

        let part = Part::bytes(file.content)
            .file_name(file.name)
            .mime_str(DOCX_MIME)
            .map_err(|e| transport_error(UPLOAD_TEMPLATE_PATH, e))?;
        let form = Form::new().part("file", part);

        let response = self
            .http
            .post(self.url(UPLOAD_TEMPLATE_PATH))
            .multipart(form)
            .send()
            .await
            .map_err(|e| transport_error(UPLOAD_TEMPLATE_PATH, e))?;

        let mut body = read_json(response).await?;
        match body.get_mut("structure").map(Value::take) {
            Some(structure) if !structure.is_null() => Ok(StructureSummary::new(structure)),
            _ => Err(CollaboratorError::InvalidResponse(
                "分析响应缺少 structure 字段".to_string(),
            )),
        }
    }
}

#[async_trait]
impl SectionGenerator for PlanApiClient {
    async fn generate(
        &self,
        section: SectionKey,
        business_info: BusinessInfo,
    ) -> Result<SectionPayload, CollaboratorError> {
        let path = format!("{}/{}", GENERATION_PATH, section.as_str());
        debug!("请求生成章节: {}", path);

        let response = self
            .http
            .post(self.url(&path))
            .json(&business_info)
            .send()
            .await
            .map_err(|e| transport_error(&path, e))?;

        let body = read_json(response).await?;
        Ok(SectionPayload::new(body))
    }
}

#[async_trait]
impl DocumentAssembler for PlanApiClient {
    async fn assemble(&self, request: ExportRequest) -> Result<AssembledDocument, CollaboratorError> {
        debug!(
            "请求组装文档，章节数: {}",
            request.generated_content.len()
        );

        let export_path = self.export_path.as_str();
        let response = self
            .http
            .post(self.url(export_path))
            .json(&request)
            .send()
            .await
            .map_err(|e| transport_error(export_path, e))?;

        let response = ensure_success(response).await?;

        let file_name = response
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_attachment_file_name)
            .unwrap_or_else(|| export_file_name(&request.business_info.title));

        let content = response
            .bytes()
            .await
            .map_err(|e| transport_error(export_path, e))?
            .to_vec();

        Ok(AssembledDocument { file_name, content })
    }
}

// ========== 响应处理辅助函数 ==========

fn transport_error(endpoint: &str, err: reqwest::Error) -> CollaboratorError {
    warn!("请求 {} 失败: {}", endpoint, err);
    CollaboratorError::Transport {
        endpoint: endpoint.to_string(),
        message: err.to_string(),
    }
}

/// 非 2xx 响应转为 `Rejected`
async fn ensure_success(response: Response) -> Result<Response, CollaboratorError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = extract_error_message(status.as_u16(), &body);
    warn!("服务端返回错误 (HTTP {}): {}", status.as_u16(), message);

    Err(CollaboratorError::Rejected {
        status: status.as_u16(),
        message,
    })
}

async fn read_json(response: Response) -> Result<Value, CollaboratorError> {
    let response = ensure_success(response).await?;
    response
        .json::<Value>()
        .await
        .map_err(|e| CollaboratorError::InvalidResponse(e.to_string()))
}

/// 提取错误消息：优先使用 FastAPI 的 `detail` 字段
fn extract_error_message(status: u16, body: &str) -> String {
    let detail = serde_json::from_str::<Value>(body).ok().and_then(|v| match v.get("detail") {
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) if !other.is_null() => Some(other.to_string()),
        _ => None,
    });

    detail.unwrap_or_else(|| format!("HTTP {}", status))
}

/// 从 `Content-Disposition: attachment; filename=xxx.docx` 中取出文件名
fn parse_attachment_file_name(header_value: &str) -> Option<String> {
    header_value
        .split(';')
        .map(str::trim)
        .find_map(|part| part.strip_prefix("filename="))
        .map(|name| name.trim_matches('"').to_string())
        .filter(|name| !name.is_empty())
}
