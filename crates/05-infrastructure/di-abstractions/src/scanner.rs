//! 组件扫描器抽象接口
//!
//! 提供按命名空间发现类型定义的能力

use crate::definition::TypeDefinition;

/// 组件扫描器 trait
pub trait ComponentScanner: Send + Sync {
    /// 扫描指定命名空间下的类型定义
    ///
    /// 空命名空间表示所有已注册的类型；返回顺序需稳定
    fn scan(&self, namespace: &str) -> Vec<TypeDefinition>;

    /// 获取扫描器名称
    fn name(&self) -> &str;
}

/// 由固定定义列表构成的扫描器
#[derive(Debug, Clone, Default)]
pub struct StaticScanner {
    definitions: Vec<TypeDefinition>,
}

impl StaticScanner {
    /// 创建扫描器
    pub fn new(definitions: Vec<TypeDefinition>) -> Self {
        Self { definitions }
    }
}

impl ComponentScanner for StaticScanner {
    fn scan(&self, namespace: &str) -> Vec<TypeDefinition> {
        self.definitions
            .iter()
            .filter(|definition| definition.descriptor.info.is_in_namespace(namespace))
            .cloned()
            .collect()
    }

    fn name(&self) -> &str {
        "static"
    }
}
