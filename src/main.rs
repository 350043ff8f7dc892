use anyhow::Result;
use business_plan_wizard::utils::logging;
use business_plan_wizard::{App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置
    let mut config = Config::load()?;

    // 第一个参数可覆盖计划文件路径
    if let Some(plan_file) = std::env::args().nth(1) {
        config.plan_file = plan_file;
    }

    // 初始化日志
    logging::init(config.verbose_logging);

    // 初始化并运行应用
    let mut app = App::initialize(config)?;
    app.run().await?;

    Ok(())
}
