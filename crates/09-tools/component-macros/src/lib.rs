//! # Component Macros
//!
//! 这个 crate 在编译期生成容器需要的类型定义，替代运行时反射，
//! 并通过 `ctor` 在程序启动时把定义提交到 `di_impl::TypeInventory`。
//!
//! ## 核心宏
//!
//! - [`Entity`] - 实体到表结构的映射
//! - [`Component`] - 组件注册与接口转换
//! - [`autowired`] - setter 注入点
//! - [`interface`] - 按能力查找的普通接口
//! - [`repository`] - 派生查询仓储接口
//!
//! 使用这些宏的 crate 需要依赖 `infrastructure-common`、`di-abstractions`、
//! `di-impl` 与 `ctor`。
//!
//! ## 使用示例
//!
//! ```rust,ignore
//! use component_macros::{autowired, repository, Component, Entity};
//! use di_abstractions::{Autowired, CrudRepository};
//! use infrastructure_common::QueryResult;
//! use std::sync::Arc;
//!
//! #[derive(Entity)]
//! #[table(name = "products")]
//! pub struct Product {
//!     #[id]
//!     #[column(name = "ID")]
//!     pub id: Option<i64>,
//!     #[column(name = "PRICE")]
//!     pub price: f64,
//! }
//!
//! #[repository]
//! pub trait ProductRepository: CrudRepository<i64, Product> {
//!     fn find_by_price_greater(&self, price: f64) -> QueryResult<String>;
//! }
//!
//! #[derive(Component, Default)]
//! #[component(autowired)]
//! pub struct ProductService {
//!     repository: Autowired<dyn ProductRepository>,
//! }
//!
//! #[autowired]
//! impl ProductService {
//!     #[autowire]
//!     pub fn set_repository(&self, repository: Arc<dyn ProductRepository>) {
//!         self.repository.inject(repository);
//!     }
//! }
//! ```

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput, ItemImpl, ItemTrait};

mod autowired;
mod component;
mod entity;
mod interface;
mod repository;
mod utils;

/// 实体派生宏
///
/// 生成实体的类型描述符（表名、列映射、主键）与字段取值。
///
/// # 属性
///
/// - `#[table(name = "...")]` - 表名，缺少时启动阶段报告实体元数据错误
/// - `#[column(name = "...")]` - 列名，省略 `name` 时使用字段名；没有此属性的字段不参与映射
/// - `#[id]` - 主键字段
///
/// 映射字段的类型需要实现 `Clone` 且可以转换为 `Value`。
#[proc_macro_derive(Entity, attributes(table, column, id))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    entity::derive_entity_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

/// 组件派生宏
///
/// 为结构体生成带组件标记的类型定义，实例通过 `Default` 构造。
///
/// # 参数
///
/// - `implements(dyn A, dyn B)` - 组件实现的接口，容器可以按接口查找该组件
/// - `autowired` - 组件带有 `#[autowired]` impl 块声明的注入点
///
/// # 示例
///
/// ```rust,ignore
/// #[derive(Component, Default)]
/// #[component(implements(dyn Clock))]
/// pub struct SystemClock;
/// ```
#[proc_macro_derive(Component, attributes(component))]
pub fn derive_component(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    component::derive_component_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

/// setter 注入宏
///
/// 标注在组件的固有 impl 块上，块中带 `#[autowire]` 的方法成为注入点。
/// 注入方法以 `&self` 为接收者，接受一个 `Arc<dyn Trait>` 或 `Arc<Type>` 参数。
#[proc_macro_attribute]
pub fn autowired(args: TokenStream, input: TokenStream) -> TokenStream {
    if !args.is_empty() {
        return syn::Error::new(proc_macro2::Span::call_site(), "#[autowired] 不接受参数")
            .to_compile_error()
            .into();
    }
    let input = parse_macro_input!(input as ItemImpl);
    autowired::autowired_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

/// 普通接口宏
///
/// 把 `dyn Trait` 登记为接口；启动时第一个声明 `implements(dyn Trait)` 的组件
/// 同时以该接口的标识注册。
///
/// ```rust,ignore
/// #[interface]
/// pub trait Clock: Send + Sync {
///     fn now(&self) -> u64;
/// }
/// ```
#[proc_macro_attribute]
pub fn interface(args: TokenStream, input: TokenStream) -> TokenStream {
    if !args.is_empty() {
        return syn::Error::new(proc_macro2::Span::call_site(), "#[interface] 不接受参数")
            .to_compile_error()
            .into();
    }
    let input = parse_macro_input!(input as ItemTrait);
    interface::interface_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

/// 仓储接口宏
///
/// 标注在继承 `CrudRepository<Id, Entity>` 的 trait 上。
/// 没有默认实现的方法按名称分发: `find_by_price_greater` 编译为派生查询 `findByPriceGreater`。
///
/// 继承其他仓储接口时需要显式声明泛型参数:
///
/// ```rust,ignore
/// #[repository(id = i64, entity = Product)]
/// pub trait DiscountRepository: ProductRepository {
///     fn find_by_price_less(&self, price: f64) -> QueryResult<String>;
/// }
/// ```
#[proc_macro_attribute]
pub fn repository(args: TokenStream, input: TokenStream) -> TokenStream {
    let args = parse_macro_input!(args as repository::RepositoryArgs);
    let input = parse_macro_input!(input as ItemTrait);
    repository::repository_impl(args, input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
