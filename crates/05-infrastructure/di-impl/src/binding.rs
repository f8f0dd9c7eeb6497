//! 仓储接口绑定
//!
//! 启动时为每个仓储接口记录唯一的实现类型；代理在第一次被需要时才创建，
//! 并以接口标识缓存在注册表中，所有使用方共享同一个代理。

use crate::catalog::TypeCatalog;
use di_abstractions::{Bean, ComponentRegistry, TypeDefinition};
use indexmap::IndexMap;
use infrastructure_common::{ContainerError, ContainerResult, SchemaError};
use query_compiler::EntityMetadataCache;
use std::collections::HashSet;
use tracing::info;

/// 仓储接口到实现类型的绑定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryBinding {
    /// 仓储接口标识
    pub interface: String,
    /// 实现类型标识
    pub implementation: String,
}

/// 仓储绑定表，按目录顺序
#[derive(Debug, Clone, Default)]
pub struct RepositoryBindings {
    bindings: IndexMap<String, RepositoryBinding>,
}

impl RepositoryBindings {
    /// 记录绑定
    pub fn insert(&mut self, binding: RepositoryBinding) {
        self.bindings.insert(binding.interface.clone(), binding);
    }

    /// 按接口标识查找
    pub fn get(&self, interface: &str) -> Option<&RepositoryBinding> {
        self.bindings.get(interface)
    }

    /// 是否存在绑定
    pub fn contains(&self, interface: &str) -> bool {
        self.bindings.contains_key(interface)
    }

    /// 遍历绑定
    pub fn iter(&self) -> impl Iterator<Item = &RepositoryBinding> {
        self.bindings.values()
    }

    /// 绑定数量
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// 沿继承链查找带仓储标记的根接口（包括接口自身）
pub fn find_repository_root<'a>(
    catalog: &'a TypeCatalog,
    interface: &'a TypeDefinition,
) -> Option<&'a TypeDefinition> {
    let mut visited = HashSet::new();
    let mut pending = vec![interface];

    while let Some(current) = pending.pop() {
        if !visited.insert(current.name()) {
            continue;
        }
        if current.descriptor.is_repository() {
            return Some(current);
        }
        for parent in &current.descriptor.interfaces {
            if let Some(parent) = catalog.get(&parent.name) {
                pending.push(parent);
            }
        }
    }
    None
}

/// 具体类型是否直接或经由其接口的继承链实现了指定接口
pub fn implements_interface(
    catalog: &TypeCatalog,
    definition: &TypeDefinition,
    interface: &str,
) -> bool {
    let mut visited = HashSet::new();
    let mut pending: Vec<&str> = definition
        .descriptor
        .interfaces
        .iter()
        .map(|info| info.name.as_str())
        .collect();

    while let Some(current) = pending.pop() {
        if current == interface {
            return true;
        }
        if !visited.insert(current) {
            continue;
        }
        if let Some(parent) = catalog.get(current) {
            pending.extend(parent.descriptor.interfaces.iter().map(|info| info.name.as_str()));
        }
    }
    false
}

/// 获取（或创建并缓存）仓储接口的代理
pub fn resolve_repository<R>(
    registry: &R,
    catalog: &TypeCatalog,
    metadata_cache: &EntityMetadataCache,
    binding: &RepositoryBinding,
) -> ContainerResult<Bean>
where
    R: ComponentRegistry,
{
    registry.get_or_create(&binding.interface, || {
        build_repository_proxy(catalog, metadata_cache, binding)
    })
}

fn build_repository_proxy(
    catalog: &TypeCatalog,
    metadata_cache: &EntityMetadataCache,
    binding: &RepositoryBinding,
) -> ContainerResult<Bean> {
    let interface = lookup(catalog, &binding.interface)?;
    let implementation = lookup(catalog, &binding.implementation)?;

    let arguments = &interface.descriptor.type_arguments;
    if arguments.len() < 2 {
        return Err(ContainerError::creation_failed(
            &binding.interface,
            "仓储接口需要声明 Id 类型与实体类型两个泛型参数",
        ));
    }
    let entity_info = &arguments[1];
    let entity = catalog
        .get(&entity_info.name)
        .ok_or_else(|| SchemaError::EntityNotFound {
            entity: entity_info.name.clone(),
        })?;
    let metadata = metadata_cache.resolve(&entity.descriptor)?;

    let instance = implementation.instantiate()?;
    let target = implementation
        .repository_target
        .and_then(|cast| cast(&instance))
        .ok_or_else(|| {
            ContainerError::creation_failed(&binding.implementation, "实现类型不是仓储实现")
        })?;
    target.bind_metadata(metadata.clone());

    let factory = interface.proxy_factory.ok_or_else(|| {
        ContainerError::creation_failed(&binding.interface, "仓储接口没有可用的代理工厂")
    })?;

    info!(
        "创建仓储代理: {} -> {} (实体 {}, 表 {})",
        binding.interface,
        binding.implementation,
        entity_info.name,
        metadata.table_name()
    );
    Ok(factory(target, metadata))
}

fn lookup<'a>(catalog: &'a TypeCatalog, name: &str) -> ContainerResult<&'a TypeDefinition> {
    catalog.get(name).ok_or_else(|| ContainerError::NotRegistered {
        type_name: name.to_string(),
    })
}
