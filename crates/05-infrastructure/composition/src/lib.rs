//! # 基础设施组合层
//!
//! 负责把配置、日志、类型目录与容器组合成一个可运行的应用。
//!
//! ## 主要功能
//!
//! - **应用构建器**: 使用构建者模式加载配置并启动容器
//! - **配置加载**: TOML / JSON / YAML 文件与 `LORN_DI` 前缀的环境变量
//! - **日志初始化**: 根据配置初始化 `tracing-subscriber`
//!
//! ## 基本使用
//!
//! ```rust,no_run
//! use infrastructure_composition::Application;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let application = Application::builder()
//!         .add_optional_config_file("config/container.toml")
//!         .add_config_env_vars("LORN_DI")
//!         .enable_logging()
//!         .build()?;
//!
//!     println!("已注册 {} 个类型", application.catalog().len());
//!     Ok(())
//! }
//! ```

pub mod application;
pub mod builder;
pub mod settings;

pub use application::Application;
pub use builder::{ApplicationBuilder, LoggingConfig};
pub use settings::{SettingsLoader, ENV_PREFIX, ENV_SEPARATOR};

// 重新导出错误类型
pub use infrastructure_common::InfrastructureError;
