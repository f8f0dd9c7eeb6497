//! 错误类型定义

use thiserror::Error;

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件不存在: {path}")]
    FileNotFound { path: String },

    #[error("配置解析失败: {source}")]
    ParseError {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("配置验证失败: {message}")]
    ValidationError { message: String },
}

/// 实体元数据错误类型
///
/// 实体缺少表名、主键不唯一等配置问题，启动时即为致命错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("无法解析表名: 实体 {entity} 缺少 Table 标记")]
    MissingTable { entity: String },

    #[error("实体 {entity} 没有 Id 字段")]
    MissingId { entity: String },

    #[error("实体 {entity} 存在多个 Id 字段: {fields:?}")]
    MultipleIds { entity: String, fields: Vec<String> },

    #[error("实体 {entity} 的字段 {field} 列名为空")]
    EmptyColumn { entity: String, field: String },

    #[error("实体类型未被扫描: {entity}")]
    EntityNotFound { entity: String },
}

/// 派生查询与语句构建错误类型
///
/// 仅影响当次调用，不影响其他组件
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("方法名 '{method}' 无效: 必须以 '{prefix}' 开头且包含查询条件")]
    InvalidQueryName { method: String, prefix: &'static str },

    #[error("解析方法名 '{method}' 出错, 位置 {position}: {message}")]
    QuerySyntax {
        method: String,
        position: usize,
        message: String,
    },

    #[error("解析方法名 '{method}' 出错, 位置 {position}: 未知字段")]
    UnknownField { method: String, position: usize },

    #[error("方法 '{method}' 参数不足: 字段 {field} 缺少第 {index} 个参数值")]
    InsufficientArguments {
        method: String,
        field: String,
        index: usize,
    },

    #[error("参数无效: {message}")]
    InvalidArgument { message: String },

    #[error("仓储不支持的方法: {method}")]
    UnknownMethod { method: String },

    #[error("仓储实现尚未绑定实体元数据")]
    Unbound,
}

impl QueryError {
    /// 创建参数无效错误
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// 创建语法错误
    pub fn syntax(method: impl Into<String>, position: usize, message: impl Into<String>) -> Self {
        Self::QuerySyntax {
            method: method.into(),
            position,
            message: message.into(),
        }
    }
}

/// 容器错误类型
///
/// 启动阶段的所有错误均为致命错误，容器拒绝部分装配后运行
#[derive(Error, Debug)]
pub enum ContainerError {
    #[error("实体元数据无效: {source}")]
    Schema {
        #[from]
        source: SchemaError,
    },

    #[error("找不到仓储接口 '{interface}' 的实现, 请检查配置")]
    ImplementationNotFound { interface: String },

    #[error("仓储接口 '{interface}' 存在多个实现: {candidates:?}")]
    AmbiguousImplementation {
        interface: String,
        candidates: Vec<String>,
    },

    #[error("装配失败: {component}::{method}, 原因: {message}")]
    Wiring {
        component: String,
        method: String,
        message: String,
    },

    #[error("装配失败: {component} 依赖的类型 '{dependency}' 没有可用的组件")]
    UnsatisfiedDependency {
        component: String,
        dependency: String,
    },

    #[error("组件创建失败: {type_name}, 原因: {message}")]
    ComponentCreationFailed { type_name: String, message: String },

    #[error("组件未注册: {type_name}")]
    NotRegistered { type_name: String },

    #[error("组件类型不匹配: {type_name}")]
    TypeMismatch { type_name: String },
}

impl ContainerError {
    /// 创建装配错误
    pub fn wiring(
        component: impl Into<String>,
        method: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Wiring {
            component: component.into(),
            method: method.into(),
            message: message.into(),
        }
    }

    /// 创建组件创建失败错误
    pub fn creation_failed(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ComponentCreationFailed {
            type_name: type_name.into(),
            message: message.into(),
        }
    }
}

/// 基础设施错误类型
#[derive(Error, Debug)]
pub enum InfrastructureError {
    #[error("配置错误: {source}")]
    ConfigError {
        #[from]
        source: ConfigError,
    },

    #[error("容器错误: {source}")]
    ContainerError {
        #[from]
        source: ContainerError,
    },
}

/// 结果类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;
pub type QueryResult<T> = Result<T, QueryError>;
pub type ContainerResult<T> = Result<T, ContainerError>;
pub type InfrastructureResult<T> = Result<T, InfrastructureError>;
