use crate::models::{PlanInput, TemplateFile};
use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs;

/// 从 TOML 文件加载计划输入
pub async fn load_plan_input(plan_file_path: &Path) -> Result<PlanInput> {
    let content = fs::read_to_string(plan_file_path)
        .await
        .with_context(|| format!("无法读取计划文件: {}", plan_file_path.display()))?;

    let mut plan: PlanInput = toml::from_str(&content)
        .with_context(|| format!("无法解析计划文件: {}", plan_file_path.display()))?;

    // 设置文件路径
    plan.file_path = Some(plan_file_path.to_string_lossy().to_string());

    Ok(plan)
}

/// 读取模板文件
///
/// 相对路径以计划文件所在目录为基准。
pub async fn load_template_file(template_path: &str, base_dir: Option<&Path>) -> Result<TemplateFile> {
    let path = match base_dir {
        Some(dir) if Path::new(template_path).is_relative() => dir.join(template_path),
        _ => Path::new(template_path).to_path_buf(),
    };

    let content = fs::read(&path)
        .await
        .with_context(|| format!("无法读取模板文件: {}", path.display()))?;

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| template_path.to_string());

    tracing::info!("已读取模板: {} ({} 字节)", name, content.len());

    Ok(TemplateFile::new(name, content))
}
