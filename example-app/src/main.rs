//! # 示例应用程序
//!
//! 通过容器运行商品与图书两个示例，打印仓储生成的 SQL。

mod library;
mod shop;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use infrastructure_composition::{Application, LoggingConfig, ENV_PREFIX};
use library::BookService;
use shop::{Product, ProductService, User};
use std::path::PathBuf;
use std::str::FromStr;
use tracing::info;

/// 命令行参数
#[derive(Parser, Debug)]
#[command(name = "example-app")]
#[command(about = "Lorn DI 示例应用")]
struct Args {
    /// 配置文件路径（不存在时使用默认配置与环境变量）
    #[arg(short, long, default_value = "config/container.toml")]
    config: PathBuf,

    /// 扫描的命名空间，覆盖配置文件
    #[arg(short, long)]
    namespace: Option<String>,

    /// 要运行的示例
    #[arg(short, long, value_enum, default_value_t = Sample::All)]
    sample: Sample,

    /// 日志级别，覆盖配置文件
    #[arg(long)]
    log_level: Option<String>,

    /// 打印类型目录（JSON）后退出
    #[arg(long)]
    dump_catalog: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Sample {
    Shop,
    Library,
    All,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let application = build_application(&args)?;

    if args.dump_catalog {
        println!("{}", application.catalog_json()?);
        return Ok(());
    }

    if matches!(args.sample, Sample::Shop | Sample::All) {
        run_shop_sample(&application)?;
    }
    if matches!(args.sample, Sample::Library | Sample::All) {
        run_library_sample(&application)?;
    }

    info!("示例运行完成");
    Ok(())
}

/// 构建应用
fn build_application(args: &Args) -> Result<Application> {
    let mut builder = Application::builder()
        .add_optional_config_file(&args.config)
        .add_config_env_vars(ENV_PREFIX)
        .with_namespace(args.namespace.clone().unwrap_or_else(|| module_path!().to_string()))
        .enable_logging();

    if let Some(level) = &args.log_level {
        let level = tracing::Level::from_str(level)
            .with_context(|| format!("日志级别无效: {}", level))?;
        builder = builder.with_logging(LoggingConfig {
            level,
            ..LoggingConfig::default()
        });
    }

    builder.build().context("容器启动失败")
}

/// 商品示例
fn run_shop_sample(application: &Application) -> Result<()> {
    info!("运行商品示例");
    let service = application.component::<ProductService>()?;

    let product = Product {
        id: Some(1),
        name: "car".to_string(),
        price: 15350.0,
    };
    let user = User {
        id: Some(2),
        username: "admin".to_string(),
    };

    println!("{}", service.save_product(&product)?);
    println!("{}", service.save_user(&user)?);
    println!("{}", service.delete_product(&product)?);
    println!("{}", service.get_user(5)?);
    println!("{}", service.find_products_by_name_and_price("car", 15350.0)?);
    println!("{}", service.find_products_in_range(10000.0, 500.0)?);
    println!("{}", service.find_products_excluding(100.0, "car")?);
    Ok(())
}

/// 图书示例
fn run_library_sample(application: &Application) -> Result<()> {
    info!("运行图书示例");
    let service = application.component::<BookService>()?;
    for statement in service.run_all()? {
        println!("{}", statement);
    }
    Ok(())
}
