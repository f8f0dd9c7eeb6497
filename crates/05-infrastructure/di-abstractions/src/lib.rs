//! # Dependency Injection Abstractions
//!
//! 依赖注入抽象层，定义类型定义、组件注册和仓储分发的核心接口。
//!
//! ## 核心接口
//!
//! - [`TypeDefinition`] - 类型描述符与激活钩子
//! - [`Component`] / [`Entity`] / [`Interface`] - 可注册类型
//! - [`CrudRepository`] - 根仓储接口
//! - [`EntityRepository`] - 仓储实现接口
//! - [`ComponentRegistry`] - 组件注册表接口
//! - [`ComponentScanner`] - 组件扫描器接口

pub mod bean;
pub mod component;
pub mod definition;
pub mod registry;
pub mod repository;
pub mod scanner;

pub use bean::*;
pub use component::*;
pub use definition::*;
pub use registry::*;
pub use repository::*;
pub use scanner::*;
