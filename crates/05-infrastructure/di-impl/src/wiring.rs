//! 依赖装配
//!
//! 按目录顺序遍历组件的注入点，优先使用仓储绑定，其次使用已注册的单例。

use crate::binding::{resolve_repository, RepositoryBindings};
use crate::catalog::TypeCatalog;
use di_abstractions::{Bean, ComponentRegistry, TypeDefinition};
use infrastructure_common::{ContainerError, ContainerResult, MethodDescriptor, TypeInfo};
use query_compiler::EntityMetadataCache;
use tracing::debug;

/// 依赖装配器
pub struct DependencyWirer<'a, R: ComponentRegistry> {
    catalog: &'a TypeCatalog,
    registry: &'a R,
    metadata_cache: &'a EntityMetadataCache,
    bindings: &'a RepositoryBindings,
}

impl<'a, R: ComponentRegistry> DependencyWirer<'a, R> {
    /// 创建装配器
    pub fn new(
        catalog: &'a TypeCatalog,
        registry: &'a R,
        metadata_cache: &'a EntityMetadataCache,
        bindings: &'a RepositoryBindings,
    ) -> Self {
        Self {
            catalog,
            registry,
            metadata_cache,
            bindings,
        }
    }

    /// 装配所有组件，返回完成的注入次数
    ///
    /// 任何一个注入点失败都会中止装配
    pub fn wire_all(&self) -> ContainerResult<usize> {
        let mut injected = 0;

        for component in self.catalog.components() {
            let bean = self
                .registry
                .get(component.name())
                .ok_or_else(|| ContainerError::NotRegistered {
                    type_name: component.name().to_string(),
                })?;

            for method in component.descriptor.autowire_methods() {
                self.wire_method(component, &bean, method)?;
                injected += 1;
            }
        }

        Ok(injected)
    }

    fn wire_method(
        &self,
        component: &TypeDefinition,
        bean: &Bean,
        method: &MethodDescriptor,
    ) -> ContainerResult<()> {
        let [dependency] = method.parameters.as_slice() else {
            return Err(ContainerError::wiring(
                component.name(),
                &method.name,
                format!(
                    "注入方法必须且只能声明一个参数, 实际声明了 {} 个",
                    method.parameters.len()
                ),
            ));
        };

        let injector = component.injector(&method.name).ok_or_else(|| {
            ContainerError::wiring(component.name(), &method.name, "注入方法没有对应的注入函数")
        })?;

        let value = self.resolve(component, dependency)?;
        injector(bean, value)?;

        debug!(
            "注入依赖: {}::{} <- {}",
            component.name(),
            method.name,
            dependency.name
        );
        Ok(())
    }

    fn resolve(&self, component: &TypeDefinition, dependency: &TypeInfo) -> ContainerResult<Bean> {
        if let Some(binding) = self.bindings.get(&dependency.name) {
            return resolve_repository(self.registry, self.catalog, self.metadata_cache, binding);
        }

        self.registry
            .get(&dependency.name)
            .ok_or_else(|| ContainerError::UnsatisfiedDependency {
                component: component.name().to_string(),
                dependency: dependency.name.clone(),
            })
    }
}
