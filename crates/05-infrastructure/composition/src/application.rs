//! 应用主入口

use crate::builder::ApplicationBuilder;
use di_impl::ApplicationContext;
use infrastructure_common::{ContainerResult, ContainerSettings, TypeDescriptor};
use std::ops::Deref;
use std::sync::Arc;

/// 已启动的应用
///
/// 持有最终生效的配置与就绪的容器；通过 `Deref` 可以直接使用 [`ApplicationContext`] 的查找方法
#[derive(Debug)]
pub struct Application {
    settings: ContainerSettings,
    context: ApplicationContext,
}

impl Application {
    /// 创建应用构建器
    pub fn builder() -> ApplicationBuilder {
        ApplicationBuilder::new()
    }

    pub(crate) fn new(settings: ContainerSettings, context: ApplicationContext) -> Self {
        Self { settings, context }
    }

    /// 生效的配置
    pub fn settings(&self) -> &ContainerSettings {
        &self.settings
    }

    /// 就绪的容器
    pub fn context(&self) -> &ApplicationContext {
        &self.context
    }

    /// 获取具体组件
    pub fn component<T>(&self) -> ContainerResult<Arc<T>>
    where
        T: Send + Sync + 'static,
    {
        self.context.component::<T>()
    }

    /// 类型目录中的全部描述符，按目录顺序
    pub fn descriptors(&self) -> Vec<&TypeDescriptor> {
        self.context.catalog().descriptors()
    }

    /// 以 JSON 输出类型目录
    pub fn catalog_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.descriptors())
    }

    /// 取出容器
    pub fn into_context(self) -> ApplicationContext {
        self.context
    }
}

impl Deref for Application {
    type Target = ApplicationContext;

    fn deref(&self) -> &Self::Target {
        &self.context
    }
}
