//! # Infrastructure Common
//!
//! 这个 crate 提供了容器与派生查询编译器共用的基础类型。
//!
//! ## 核心类型
//!
//! - [`TypeDescriptor`] - 类型目录中的类型描述符
//! - [`Tag`] - 容器识别的声明标记
//! - [`Value`] - 位置参数与字段取值
//! - [`ContainerSettings`] - 容器配置
//!
//! ## 错误分类
//!
//! - [`SchemaError`] - 实体元数据无效（启动期致命）
//! - [`ContainerError`] - 扫描、绑定、装配失败（启动期致命）
//! - [`QueryError`] - 派生查询与语句构建失败（调用期）

pub mod configuration;
pub mod errors;
pub mod metadata;
pub mod value;

pub use configuration::*;
pub use errors::*;
pub use metadata::*;
pub use value::*;
