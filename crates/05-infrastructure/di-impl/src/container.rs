//! 容器启动
//!
//! [`BeanContainer`] 只能启动一次: `bootstrap` 消费容器，成功时得到可用的
//! [`ApplicationContext`]，失败时容器连同已创建的实例一起被丢弃。

use crate::binding::{
    find_repository_root, implements_interface, resolve_repository, RepositoryBinding,
    RepositoryBindings,
};
use crate::catalog::TypeCatalog;
use crate::registry::BeanRegistry;
use crate::wiring::DependencyWirer;
use di_abstractions::{expect_component, expect_interface, Bean, ComponentRegistry, TypeDefinition};
use infrastructure_common::{ContainerError, ContainerResult, TypeInfo};
use query_compiler::EntityMetadataCache;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// 待启动的容器
#[derive(Debug)]
pub struct BeanContainer {
    catalog: TypeCatalog,
    registry: BeanRegistry,
    metadata_cache: EntityMetadataCache,
}

impl BeanContainer {
    /// 基于类型目录创建容器
    pub fn new(catalog: TypeCatalog) -> Self {
        Self {
            catalog,
            registry: BeanRegistry::new(),
            metadata_cache: EntityMetadataCache::new(),
        }
    }

    /// 启动容器
    ///
    /// 依次执行: 实例化组件、绑定接口、装配依赖
    pub fn bootstrap(self) -> ContainerResult<ApplicationContext> {
        info!("容器启动, 目录中共有 {} 个类型", self.catalog.len());

        match self.run() {
            Ok(context) => {
                info!(
                    "容器启动完成: {} 个单例, {} 个仓储绑定",
                    context.registry.len(),
                    context.bindings.len()
                );
                Ok(context)
            }
            Err(e) => {
                error!("容器启动失败: {}", e);
                Err(e)
            }
        }
    }

    fn run(self) -> ContainerResult<ApplicationContext> {
        self.instantiate_components()?;
        let bindings = self.bind_interfaces()?;

        let injected = DependencyWirer::new(
            &self.catalog,
            &self.registry,
            &self.metadata_cache,
            &bindings,
        )
        .wire_all()?;
        debug!("完成 {} 次依赖注入", injected);

        Ok(ApplicationContext {
            catalog: self.catalog,
            registry: self.registry,
            metadata_cache: self.metadata_cache,
            bindings,
        })
    }

    fn instantiate_components(&self) -> ContainerResult<()> {
        for component in self.catalog.components() {
            self.registry
                .get_or_create(component.name(), || component.instantiate())?;
            debug!("实例化组件: {}", component.name());
        }
        Ok(())
    }

    fn bind_interfaces(&self) -> ContainerResult<RepositoryBindings> {
        let mut bindings = RepositoryBindings::default();

        for interface in self.catalog.interfaces() {
            match find_repository_root(&self.catalog, interface) {
                Some(root) => {
                    let implementation = self.find_implementation(interface, root)?;
                    debug!("绑定仓储接口: {} -> {}", interface.name(), implementation);
                    bindings.insert(RepositoryBinding {
                        interface: interface.name().to_string(),
                        implementation,
                    });
                }
                None => self.register_by_capability(interface),
            }
        }

        Ok(bindings)
    }

    fn find_implementation(
        &self,
        interface: &TypeDefinition,
        root: &TypeDefinition,
    ) -> ContainerResult<String> {
        let mut candidates: Vec<String> = self
            .catalog
            .iter()
            .filter(|definition| !definition.descriptor.is_interface())
            .filter(|definition| implements_interface(&self.catalog, definition, root.name()))
            .map(|definition| definition.name().to_string())
            .collect();

        match candidates.len() {
            0 => Err(ContainerError::ImplementationNotFound {
                interface: interface.name().to_string(),
            }),
            1 => Ok(candidates.remove(0)),
            _ => Err(ContainerError::AmbiguousImplementation {
                interface: interface.name().to_string(),
                candidates,
            }),
        }
    }

    // 普通接口: 已注册的组件中第一个能转换为该接口的实例同时以接口标识注册
    fn register_by_capability(&self, interface: &TypeDefinition) {
        let mut providers = self
            .catalog
            .components()
            .filter(|component| component.can_cast_to(interface.name()));

        let Some(provider) = providers.next() else {
            debug!("接口 {} 没有已注册的实现", interface.name());
            return;
        };

        let others: Vec<&str> = providers.map(|component| component.name()).collect();
        if !others.is_empty() {
            warn!(
                "接口 {} 存在多个实现, 使用 {}, 忽略 {:?}",
                interface.name(),
                provider.name(),
                others
            );
        }

        let cast = self
            .registry
            .get(provider.name())
            .and_then(|bean| provider.cast_to(interface.name(), &bean));
        if let Some(bean) = cast {
            self.registry.put_if_absent(interface.name(), bean);
            debug!("按能力注册接口: {} -> {}", interface.name(), provider.name());
        }
    }
}

/// 启动完成的容器
#[derive(Debug)]
pub struct ApplicationContext {
    catalog: TypeCatalog,
    registry: BeanRegistry,
    metadata_cache: EntityMetadataCache,
    bindings: RepositoryBindings,
}

impl ApplicationContext {
    /// 按类型标识获取实例
    pub fn bean(&self, name: &str) -> ContainerResult<Bean> {
        if let Some(binding) = self.bindings.get(name) {
            return resolve_repository(&self.registry, &self.catalog, &self.metadata_cache, binding);
        }
        self.registry
            .get(name)
            .ok_or_else(|| ContainerError::NotRegistered {
                type_name: name.to_string(),
            })
    }

    /// 获取具体组件
    pub fn component<T>(&self) -> ContainerResult<Arc<T>>
    where
        T: Send + Sync + 'static,
    {
        let bean = self.bean(&TypeInfo::of::<T>().name)?;
        expect_component(&bean)
    }

    /// 获取接口实例（仓储代理或按能力注册的组件）
    pub fn interface<I>(&self) -> ContainerResult<Arc<I>>
    where
        I: ?Sized + Send + Sync + 'static,
    {
        let bean = self.bean(&TypeInfo::of::<I>().name)?;
        expect_interface(&bean)
    }

    /// 类型目录
    pub fn catalog(&self) -> &TypeCatalog {
        &self.catalog
    }

    /// 单例注册表
    pub fn registry(&self) -> &BeanRegistry {
        &self.registry
    }

    /// 仓储绑定
    pub fn bindings(&self) -> &RepositoryBindings {
        &self.bindings
    }

    /// 实体元数据缓存
    pub fn metadata_cache(&self) -> &EntityMetadataCache {
        &self.metadata_cache
    }
}
