//! 应用构建器

use crate::application::Application;
use crate::settings::SettingsLoader;
use di_abstractions::{ComponentScanner, Registrable, TypeDefinition};
use di_impl::{BeanContainer, TypeCatalog, TypeInventory};
use infrastructure_common::{
    ConfigError, ContainerSettings, InfrastructureResult, LoggingSettings,
};
use std::path::Path;
use std::str::FromStr;
use tracing::level_filters::LevelFilter;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// 应用构建器
///
/// 使用建造者模式加载配置、初始化日志、组装类型目录并启动容器
pub struct ApplicationBuilder {
    /// 配置加载器
    settings_loader: SettingsLoader,
    /// 直接给定的配置（优先于配置加载器）
    settings: Option<ContainerSettings>,
    /// 覆盖配置中的扫描命名空间
    namespace: Option<String>,
    /// 组件扫描器列表，为空时使用进程级类型清单
    component_scanners: Vec<Box<dyn ComponentScanner>>,
    /// 手动注册的类型定义（不受命名空间限制）
    definitions: Vec<TypeDefinition>,
    /// 配置验证是否启用
    validation_enabled: bool,
    /// 是否启用日志初始化
    logging_enabled: bool,
    /// 日志配置，未设置时由配置中的 `logging` 段推导
    logging_config: Option<LoggingConfig>,
}

impl ApplicationBuilder {
    /// 创建新的应用构建器
    pub fn new() -> Self {
        Self {
            settings_loader: SettingsLoader::new(),
            settings: None,
            namespace: None,
            component_scanners: Vec::new(),
            definitions: Vec::new(),
            validation_enabled: true,
            logging_enabled: false, // 默认不初始化日志，避免测试中重复初始化
            logging_config: None,
        }
    }

    /// 添加配置文件
    pub fn add_config_file<P: AsRef<Path>>(mut self, path: P) -> InfrastructureResult<Self> {
        self.settings_loader = self.settings_loader.add_file(path)?;
        Ok(self)
    }

    /// 添加可选配置文件
    pub fn add_optional_config_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.settings_loader = self.settings_loader.add_optional_file(path);
        self
    }

    /// 添加环境变量配置源
    pub fn add_config_env_vars<S: Into<String>>(mut self, prefix: S) -> Self {
        self.settings_loader = self.settings_loader.add_env_vars(prefix);
        self
    }

    /// 直接使用给定配置，忽略配置文件与环境变量
    pub fn with_settings(mut self, settings: ContainerSettings) -> Self {
        self.settings = Some(settings);
        self
    }

    /// 覆盖扫描命名空间
    pub fn with_namespace<S: Into<String>>(mut self, namespace: S) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// 添加组件扫描器
    pub fn add_component_scanner<T: ComponentScanner + 'static>(mut self, scanner: T) -> Self {
        debug!("添加组件扫描器: {}", scanner.name());
        self.component_scanners.push(Box::new(scanner));
        self
    }

    /// 手动注册类型
    pub fn register<T>(mut self) -> Self
    where
        T: ?Sized + Registrable,
    {
        self.definitions.push(T::type_definition());
        self
    }

    /// 手动添加类型定义
    pub fn add_definition(mut self, definition: TypeDefinition) -> Self {
        self.definitions.push(definition);
        self
    }

    /// 启用或禁用配置验证
    pub fn enable_validation(mut self, enabled: bool) -> Self {
        self.validation_enabled = enabled;
        self
    }

    /// 启用日志初始化，级别与格式取自配置
    pub fn enable_logging(mut self) -> Self {
        self.logging_enabled = true;
        self
    }

    /// 使用指定日志配置
    pub fn with_logging(mut self, config: LoggingConfig) -> Self {
        self.logging_config = Some(config);
        self.logging_enabled = true;
        self
    }

    /// 构建应用并启动容器
    pub fn build(self) -> InfrastructureResult<Application> {
        let mut settings = match self.settings {
            Some(settings) => settings,
            None => self.settings_loader.load()?,
        };
        if let Some(namespace) = self.namespace {
            settings.scan.namespace = namespace;
        }

        if self.validation_enabled {
            settings.validate()?;
        }

        if self.logging_enabled {
            let logging_config = match self.logging_config {
                Some(config) => config,
                None => LoggingConfig::from_settings(&settings.logging)?,
            };
            initialize_logging(&logging_config);
        }

        info!("开始构建应用, 扫描命名空间: '{}'", settings.scan.namespace);

        let mut catalog = TypeCatalog::new();
        if settings.scan.include_builtins {
            catalog = catalog.with_builtins();
        }
        if self.component_scanners.is_empty() {
            catalog = catalog.scan_from(&TypeInventory, &settings.scan.namespace);
        }
        for scanner in &self.component_scanners {
            catalog = catalog.scan_from(scanner.as_ref(), &settings.scan.namespace);
        }
        for definition in self.definitions {
            catalog.insert(definition);
        }

        let context = BeanContainer::new(catalog).bootstrap()?;

        info!("应用构建完成");
        Ok(Application::new(settings, context))
    }
}

impl Default for ApplicationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// 初始化日志系统
///
/// `RUST_LOG` 存在时优先使用其中的过滤指令，否则使用配置的日志级别。
/// 进程中已经设置过全局订阅者时沿用现有的订阅者。
fn initialize_logging(config: &LoggingConfig) {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(config.level).into())
        .from_env_lossy();

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.show_target)
        .with_thread_ids(config.show_thread_ids)
        .with_file(config.show_file)
        .with_line_number(config.show_line_number);

    let result = if config.json_format {
        subscriber.json().try_init()
    } else {
        subscriber.try_init()
    };

    match result {
        Ok(()) => info!("日志系统初始化完成"),
        Err(e) => debug!("日志系统已初始化, 沿用现有订阅者: {}", e),
    }
}

/// 日志配置
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// 日志级别
    pub level: tracing::Level,
    /// 是否显示目标
    pub show_target: bool,
    /// 是否显示线程ID
    pub show_thread_ids: bool,
    /// 是否显示文件名
    pub show_file: bool,
    /// 是否显示行号
    pub show_line_number: bool,
    /// 是否使用 JSON 格式
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: tracing::Level::INFO,
            show_target: true,
            show_thread_ids: false,
            show_file: false,
            show_line_number: false,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// 由配置中的日志段创建
    pub fn from_settings(settings: &LoggingSettings) -> Result<Self, ConfigError> {
        let level = tracing::Level::from_str(&settings.level).map_err(|_| {
            ConfigError::ValidationError {
                message: format!("日志级别无效: {}", settings.level),
            }
        })?;

        Ok(Self {
            level,
            json_format: settings.json,
            ..Self::default()
        })
    }
}
