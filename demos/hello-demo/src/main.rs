//! # Hello 演示
//!
//! 从配置文件启动容器，取出被代理的 `helloService` 并调用，观察通知的执行顺序。

mod aspect;
mod components;

use aspect::LogAspect;
use clap::Parser;
use components::{HelloService, IHello, TestUtil};
use ioc_config::{keys, ApplicationProperties};
use ioc_context::{ApplicationContextBuilder, BeanFactory};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// 命令行参数
#[derive(Parser, Debug)]
#[command(name = "hello-demo")]
#[command(about = "Lorn IoC 演示应用")]
struct Args {
    /// 配置文件路径（`.properties` 或 `.toml`）
    #[arg(short, long, default_value = "config/application.properties")]
    config: PathBuf,

    /// 日志级别，`RUST_LOG` 优先
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level)),
        )
        .init();

    info!("启动 Lorn IoC 演示应用");

    let mut builder = ApplicationContextBuilder::new()
        .component::<HelloService>()
        .component::<TestUtil>()
        .aspect::<LogAspect>();

    builder = if args.config.exists() {
        match args.config.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => builder.add_toml_file(&args.config),
            _ => builder.add_properties_file(&args.config),
        }
    } else {
        warn!("配置文件 {} 不存在，使用内置配置", args.config.display());
        builder.add_properties(default_properties())
    };

    let context = builder.build().await?;
    info!("容器 {} 启动于 {}", context.id(), context.started_at());
    info!("Bean 定义: {:?}", context.definition_names());

    let hello: Arc<dyn IHello> = context.get_bean_as("helloService")?;
    info!("helloService 代理策略: {:?}", context.proxy_kind("helloService")?);

    hello.say_hello("World")?;

    match hello.divide(1, 0) {
        Ok(value) => info!("1 / 0 = {}", value),
        Err(error) => info!("调用方收到异常: {}", error),
    }

    info!("容器统计: {:?}", context.stats());
    Ok(())
}

fn default_properties() -> ApplicationProperties {
    [
        (keys::SCAN_PACKAGE, "demo"),
        (keys::AOP_POINT_CUT, "public * demo.Hello.impl.HelloService.*(..)"),
        (keys::AOP_ASPECT_CLASS, "demo.aspect.LogAspect"),
        (keys::AOP_ASPECT_BEFORE, "before"),
        (keys::AOP_ASPECT_AFTER, "after"),
        (keys::AOP_ASPECT_AFTER_THROW, "afterThrowing"),
        (keys::AOP_ASPECT_AFTER_THROW_NAME, "ArithmeticException"),
    ]
    .into_iter()
    .collect()
}
