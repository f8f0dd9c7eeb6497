//! 类型目录
//!
//! - [`TypeCatalog`] 是容器启动时使用的有序类型列表，可以手动注册，也可以从扫描器填充
//! - [`TypeInventory`] 是进程级的类型清单，`component-macros` 生成的代码在程序启动时
//!   把类型定义提交到这里

use crate::crud::SqlCrudRepository;
use di_abstractions::{crud_repository_definition, ComponentScanner, Registrable, TypeDefinition};
use indexmap::IndexMap;
use infrastructure_common::TypeDescriptor;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use tracing::{debug, warn};

/// 类型目录
#[derive(Debug, Clone, Default)]
pub struct TypeCatalog {
    definitions: IndexMap<String, TypeDefinition>,
}

impl TypeCatalog {
    /// 创建空目录
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册类型
    pub fn register<T>(mut self) -> Self
    where
        T: ?Sized + Registrable,
    {
        self.insert(T::type_definition());
        self
    }

    /// 添加类型定义
    pub fn add(mut self, definition: TypeDefinition) -> Self {
        self.insert(definition);
        self
    }

    /// 添加内置的根仓储接口与默认仓储实现
    pub fn with_builtins(mut self) -> Self {
        for definition in builtin_definitions() {
            self.insert(definition);
        }
        self
    }

    /// 从扫描器填充指定命名空间下的类型
    pub fn scan_from(mut self, scanner: &dyn ComponentScanner, namespace: &str) -> Self {
        let definitions = scanner.scan(namespace);
        debug!(
            "扫描器 {} 在命名空间 '{}' 下发现 {} 个类型",
            scanner.name(),
            namespace,
            definitions.len()
        );
        for definition in definitions {
            self.insert(definition);
        }
        self
    }

    /// 添加类型定义，重复的类型标识被忽略
    pub fn insert(&mut self, definition: TypeDefinition) -> bool {
        if self.definitions.contains_key(definition.name()) {
            warn!("类型已存在于目录中, 忽略重复注册: {}", definition.name());
            return false;
        }
        self.definitions
            .insert(definition.name().to_string(), definition);
        true
    }

    /// 按类型标识查找
    pub fn get(&self, name: &str) -> Option<&TypeDefinition> {
        self.definitions.get(name)
    }

    /// 是否包含类型
    pub fn contains(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    /// 按目录顺序遍历
    pub fn iter(&self) -> impl Iterator<Item = &TypeDefinition> {
        self.definitions.values()
    }

    /// 带组件标记的具体类型
    pub fn components(&self) -> impl Iterator<Item = &TypeDefinition> {
        self.iter().filter(|definition| {
            !definition.descriptor.is_interface() && definition.descriptor.is_component()
        })
    }

    /// 接口类型
    pub fn interfaces(&self) -> impl Iterator<Item = &TypeDefinition> {
        self.iter()
            .filter(|definition| definition.descriptor.is_interface())
    }

    /// 所有类型描述符
    pub fn descriptors(&self) -> Vec<&TypeDescriptor> {
        self.iter().map(|definition| &definition.descriptor).collect()
    }

    /// 类型数量
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

/// 内置类型定义: 根仓储接口与默认仓储实现
pub fn builtin_definitions() -> Vec<TypeDefinition> {
    vec![
        crud_repository_definition(),
        SqlCrudRepository::type_definition(),
    ]
}

static INVENTORY: Lazy<RwLock<Vec<TypeDefinition>>> = Lazy::new(|| RwLock::new(Vec::new()));

/// 进程级类型清单
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeInventory;

impl TypeInventory {
    /// 提交类型定义
    pub fn submit(definition: TypeDefinition) {
        let mut inventory = INVENTORY.write();
        if inventory
            .iter()
            .any(|existing| existing.name() == definition.name())
        {
            return;
        }
        inventory.push(definition);
    }

    /// 提交类型
    pub fn submit_type<T>()
    where
        T: ?Sized + Registrable,
    {
        Self::submit(T::type_definition());
    }

    /// 扫描命名空间下的类型定义，按类型标识排序
    pub fn scan(namespace: &str) -> Vec<TypeDefinition> {
        let mut definitions: Vec<TypeDefinition> = INVENTORY
            .read()
            .iter()
            .filter(|definition| definition.descriptor.info.is_in_namespace(namespace))
            .cloned()
            .collect();
        definitions.sort_by(|a, b| a.name().cmp(b.name()));
        definitions
    }

    /// 已提交的类型数量
    pub fn len() -> usize {
        INVENTORY.read().len()
    }
}

impl ComponentScanner for TypeInventory {
    fn scan(&self, namespace: &str) -> Vec<TypeDefinition> {
        TypeInventory::scan(namespace)
    }

    fn name(&self) -> &str {
        "inventory"
    }
}
