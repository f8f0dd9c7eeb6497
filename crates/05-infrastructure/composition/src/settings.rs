//! 容器配置加载
//!
//! 使用 `config` crate 合并配置文件与环境变量，反序列化为 [`ContainerSettings`]。
//! 后添加的来源覆盖先添加的来源。

use infrastructure_common::{ConfigError, ConfigResult, ContainerSettings};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// 默认环境变量前缀，例如 `LORN_DI_SCAN__NAMESPACE=shop`
pub const ENV_PREFIX: &str = "LORN_DI";

/// 环境变量中嵌套键的分隔符
pub const ENV_SEPARATOR: &str = "__";

#[derive(Debug, Clone)]
enum SettingsSource {
    File { path: PathBuf, required: bool },
    Environment { prefix: String },
}

/// 配置加载器
#[derive(Debug, Clone, Default)]
pub struct SettingsLoader {
    sources: Vec<SettingsSource>,
}

impl SettingsLoader {
    /// 创建空的加载器，不添加任何来源时得到默认配置
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加必需的配置文件，格式由扩展名决定（toml / json / yaml）
    pub fn add_file<P: AsRef<Path>>(mut self, path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        info!("添加配置文件: {}", path.display());
        self.sources.push(SettingsSource::File {
            path: path.to_path_buf(),
            required: true,
        });
        Ok(self)
    }

    /// 添加可选的配置文件，文件不存在时跳过
    pub fn add_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.sources.push(SettingsSource::File {
            path: path.as_ref().to_path_buf(),
            required: false,
        });
        self
    }

    /// 添加环境变量来源
    pub fn add_env_vars<S: Into<String>>(mut self, prefix: S) -> Self {
        let prefix = prefix.into();
        info!("添加环境变量配置源, 前缀: {}", prefix);
        self.sources.push(SettingsSource::Environment { prefix });
        self
    }

    /// 来源数量
    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// 合并所有来源并反序列化
    pub fn load(&self) -> ConfigResult<ContainerSettings> {
        let mut builder = config::Config::builder();

        for source in &self.sources {
            builder = match source {
                SettingsSource::File { path, required } => {
                    builder.add_source(config::File::from(path.as_path()).required(*required))
                }
                SettingsSource::Environment { prefix } => builder.add_source(
                    config::Environment::with_prefix(prefix)
                        .prefix_separator("_")
                        .separator(ENV_SEPARATOR)
                        .try_parsing(true),
                ),
            };
        }

        let settings = builder
            .build()
            .and_then(|merged| merged.try_deserialize::<ContainerSettings>())
            .map_err(|e| {
                error!("配置加载失败: {}", e);
                ConfigError::ParseError {
                    source: Box::new(e),
                }
            })?;

        debug!("配置加载完成: {:?}", settings);
        Ok(settings)
    }
}
