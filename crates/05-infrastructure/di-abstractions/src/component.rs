//! 可注册类型的抽象
//!
//! 这些 trait 通常由 `component-macros` 生成实现:
//! - `#[derive(Component)]` 实现 [`Component`]
//! - `#[derive(Entity)]` 实现 [`Entity`]
//! - `#[repository]` 为 `dyn Trait` 实现 [`Interface`]
//! - `#[autowired]` 实现 [`AutowirePoints`]

use crate::definition::TypeDefinition;
use infrastructure_common::{TypeInfo, Value};
use once_cell::sync::OnceCell;
use std::fmt;
use std::sync::Arc;
use tracing::warn;

/// 可提供类型定义的类型
pub trait Registrable: 'static {
    /// 类型定义
    fn type_definition() -> TypeDefinition;

    /// 类型信息
    fn type_info() -> TypeInfo {
        TypeInfo::of::<Self>()
    }
}

/// 组件 trait
///
/// 带组件标记的具体类型，启动时被实例化为单例
pub trait Component: Registrable + Send + Sync {}

/// 实体 trait
pub trait Entity: Registrable + Send + Sync {
    /// 字段取值，按字段声明顺序
    fn field_values(&self) -> Vec<(&'static str, Value)>;
}

/// 接口 trait，为 `dyn Trait` 实现
pub trait Interface: Registrable {}

/// 注入点声明
///
/// `#[autowired]` 为带 `#[autowire]` setter 的 impl 块生成实现，
/// `#[component(autowired)]` 在生成类型定义时调用它追加注入点
pub trait AutowirePoints {
    /// 向类型定义追加注入点
    fn autowire_points(definition: TypeDefinition) -> TypeDefinition;
}

/// setter 注入的目标槽位
///
/// 注入只发生在启动阶段且只发生一次，之后只读
pub struct Autowired<T: ?Sized> {
    slot: OnceCell<Arc<T>>,
}

impl<T: ?Sized> Autowired<T> {
    /// 创建空槽位
    pub fn new() -> Self {
        Self {
            slot: OnceCell::new(),
        }
    }

    /// 注入依赖，重复注入时保留第一次的值
    pub fn inject(&self, value: Arc<T>) {
        if self.slot.set(value).is_err() {
            warn!("依赖已注入, 忽略重复注入: {}", std::any::type_name::<T>());
        }
    }

    /// 获取已注入的依赖
    pub fn get(&self) -> Option<&Arc<T>> {
        self.slot.get()
    }

    /// 是否已注入
    pub fn is_injected(&self) -> bool {
        self.slot.get().is_some()
    }
}

impl<T: ?Sized> Default for Autowired<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> fmt::Debug for Autowired<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Autowired")
            .field("type", &std::any::type_name::<T>())
            .field("injected", &self.is_injected())
            .finish()
    }
}
