//! 类型定义
//!
//! 类型描述符加上容器激活该类型所需的钩子函数。
//! 钩子均为普通函数指针，由 `component-macros` 在编译期生成，也可以手动编写。

use crate::bean::Bean;
use crate::repository::EntityRepository;
use infrastructure_common::{
    ContainerError, ContainerResult, MethodDescriptor, TypeDescriptor, TypeInfo,
};
use query_compiler::EntityMetadata;
use std::fmt;
use std::sync::Arc;

/// 无参构造函数
pub type Constructor = fn() -> ContainerResult<Bean>;

/// 将具体实例转换为接口引用
pub type InterfaceCast = fn(&Bean) -> Option<Bean>;

/// 注入点: `(目标实例, 依赖实例)`
pub type Injector = fn(&Bean, Bean) -> ContainerResult<()>;

/// 将实现实例视为通用仓储实现
pub type RepositoryTarget = fn(&Bean) -> Option<Arc<dyn EntityRepository>>;

/// 为仓储接口创建分发代理
pub type ProxyFactory = fn(Arc<dyn EntityRepository>, Arc<EntityMetadata>) -> Bean;

/// 类型定义
#[derive(Clone)]
pub struct TypeDefinition {
    /// 类型描述符
    pub descriptor: TypeDescriptor,
    /// 构造函数
    pub constructor: Option<Constructor>,
    /// 接口转换函数（按接口标识）
    pub casts: Vec<(String, InterfaceCast)>,
    /// 注入函数（按方法名）
    pub injectors: Vec<(String, Injector)>,
    /// 仓储实现转换
    pub repository_target: Option<RepositoryTarget>,
    /// 仓储代理工厂
    pub proxy_factory: Option<ProxyFactory>,
}

impl TypeDefinition {
    /// 创建只有描述符的类型定义
    pub fn new(descriptor: TypeDescriptor) -> Self {
        Self {
            descriptor,
            constructor: None,
            casts: Vec::new(),
            injectors: Vec::new(),
            repository_target: None,
            proxy_factory: None,
        }
    }

    /// 设置构造函数
    pub fn with_constructor(mut self, constructor: Constructor) -> Self {
        self.constructor = Some(constructor);
        self
    }

    /// 声明实现的接口及转换函数
    pub fn implements(mut self, interface: TypeInfo, cast: InterfaceCast) -> Self {
        self.casts.push((interface.name.clone(), cast));
        self.descriptor.interfaces.push(interface);
        self
    }

    /// 声明注入点方法及注入函数
    pub fn with_injector(mut self, method: MethodDescriptor, injector: Injector) -> Self {
        self.injectors.push((method.name.clone(), injector));
        self.descriptor.methods.push(method);
        self
    }

    /// 设置仓储实现转换
    pub fn with_repository_target(mut self, target: RepositoryTarget) -> Self {
        self.repository_target = Some(target);
        self
    }

    /// 设置仓储代理工厂
    pub fn with_proxy_factory(mut self, factory: ProxyFactory) -> Self {
        self.proxy_factory = Some(factory);
        self
    }

    /// 类型标识
    pub fn name(&self) -> &str {
        self.descriptor.name()
    }

    /// 调用构造函数创建实例
    pub fn instantiate(&self) -> ContainerResult<Bean> {
        let constructor = self.constructor.ok_or_else(|| {
            ContainerError::creation_failed(self.name(), "类型没有可用的无参构造函数")
        })?;
        constructor()
    }

    /// 是否可以直接转换为指定接口
    pub fn can_cast_to(&self, interface: &str) -> bool {
        self.casts.iter().any(|(name, _)| name == interface)
    }

    /// 将实例转换为指定接口
    pub fn cast_to(&self, interface: &str, bean: &Bean) -> Option<Bean> {
        self.casts
            .iter()
            .find(|(name, _)| name == interface)
            .and_then(|(_, cast)| cast(bean))
    }

    /// 获取注入函数
    pub fn injector(&self, method: &str) -> Option<Injector> {
        self.injectors
            .iter()
            .find(|(name, _)| name == method)
            .map(|(_, injector)| *injector)
    }
}

impl fmt::Debug for TypeDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDefinition")
            .field("descriptor", &self.descriptor)
            .field("constructor", &self.constructor.is_some())
            .field(
                "casts",
                &self.casts.iter().map(|(name, _)| name).collect::<Vec<_>>(),
            )
            .field(
                "injectors",
                &self.injectors.iter().map(|(name, _)| name).collect::<Vec<_>>(),
            )
            .field("repository_target", &self.repository_target.is_some())
            .field("proxy_factory", &self.proxy_factory.is_some())
            .finish()
    }
}
