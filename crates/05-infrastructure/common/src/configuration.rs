//! 容器配置定义

use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};

/// 容器配置
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerSettings {
    /// 扫描配置
    pub scan: ScanSettings,
    /// 日志配置
    pub logging: LoggingSettings,
}

impl ContainerSettings {
    /// 验证配置
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.scan.validate()?;
        self.logging.validate()
    }
}

/// 扫描配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanSettings {
    /// 扫描的命名空间（模块路径），为空时包含所有已注册类型
    pub namespace: String,
    /// 是否包含内置的根仓储接口与默认实现
    pub include_builtins: bool,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            namespace: String::new(),
            include_builtins: true,
        }
    }
}

impl ScanSettings {
    fn validate(&self) -> Result<(), ConfigError> {
        let namespace = self.namespace.trim_end_matches("::");
        if namespace.is_empty() {
            return Ok(());
        }

        let valid = namespace.split("::").all(is_identifier);
        if !valid {
            return Err(ConfigError::ValidationError {
                message: format!("命名空间格式无效: {}", self.namespace),
            });
        }
        Ok(())
    }
}

/// 日志配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// 日志级别
    pub level: String,
    /// 是否使用 JSON 格式
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl LoggingSettings {
    fn validate(&self) -> Result<(), ConfigError> {
        match self.level.to_ascii_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
            other => Err(ConfigError::ValidationError {
                message: format!("日志级别无效: {}", other),
            }),
        }
    }
}

fn is_identifier(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => {
            chars.all(|ch| ch.is_alphanumeric() || ch == '_')
        }
        _ => false,
    }
}
