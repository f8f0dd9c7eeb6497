//! 类型擦除的组件实例
//!
//! 具体组件以 `Arc<T>` 的形式存放；接口实例以 `Arc<Arc<dyn Trait>>` 的形式存放，
//! 外层 `Arc` 负责擦除，内层 `Arc<dyn Trait>` 才是使用方拿到的引用。

use infrastructure_common::{ContainerError, ContainerResult, TypeInfo};
use std::any::Any;
use std::sync::Arc;

/// 容器中的单例实例
pub type Bean = Arc<dyn Any + Send + Sync>;

/// 将具体实例包装为 Bean
pub fn component_bean<T>(value: Arc<T>) -> Bean
where
    T: Send + Sync + 'static,
{
    value
}

/// 将接口引用包装为 Bean
pub fn interface_bean<I>(value: Arc<I>) -> Bean
where
    I: ?Sized + Send + Sync + 'static,
{
    Arc::new(value)
}

/// 从 Bean 中取出具体实例
pub fn downcast_component<T>(bean: &Bean) -> Option<Arc<T>>
where
    T: Send + Sync + 'static,
{
    bean.clone().downcast::<T>().ok()
}

/// 从 Bean 中取出接口引用
pub fn downcast_interface<I>(bean: &Bean) -> Option<Arc<I>>
where
    I: ?Sized + Send + Sync + 'static,
{
    bean.downcast_ref::<Arc<I>>().cloned()
}

/// 取出具体实例，类型不符时返回 `TypeMismatch`
pub fn expect_component<T>(bean: &Bean) -> ContainerResult<Arc<T>>
where
    T: Send + Sync + 'static,
{
    downcast_component(bean).ok_or_else(|| ContainerError::TypeMismatch {
        type_name: TypeInfo::of::<T>().name,
    })
}

/// 取出接口引用，类型不符时返回 `TypeMismatch`
pub fn expect_interface<I>(bean: &Bean) -> ContainerResult<Arc<I>>
where
    I: ?Sized + Send + Sync + 'static,
{
    downcast_interface(bean).ok_or_else(|| ContainerError::TypeMismatch {
        type_name: TypeInfo::of::<I>().name,
    })
}
