//! 组件注册表抽象接口

use crate::bean::Bean;
use infrastructure_common::ContainerResult;

/// 组件注册表 trait
///
/// 按类型标识保存单例，保证同一标识最多成功创建一次
pub trait ComponentRegistry: Send + Sync {
    /// 获取已创建的实例
    fn get(&self, name: &str) -> Option<Bean>;

    /// 获取实例，不存在时调用工厂创建
    ///
    /// 并发调用时同一标识的工厂最多成功执行一次，其余调用方等待并拿到同一实例；
    /// 工厂失败时不写入任何内容，之后的调用可以重试。
    fn get_or_create<F>(&self, name: &str, factory: F) -> ContainerResult<Bean>
    where
        F: FnOnce() -> ContainerResult<Bean>;

    /// 不存在时写入实例，返回最终保存的实例
    fn put_if_absent(&self, name: &str, bean: Bean) -> Bean;

    /// 是否存在实例
    fn contains(&self, name: &str) -> bool;

    /// 已创建实例的数量
    fn len(&self) -> usize;

    /// 是否为空
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 已创建实例的类型标识
    fn names(&self) -> Vec<String>;
}
