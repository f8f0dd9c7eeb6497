//! 仓储分发代理
//!
//! 代理持有仓储实现与实体元数据，实现根仓储接口；
//! `#[repository]` 为它生成业务仓储接口的实现，派生查询方法经由 [`RepositoryProxy::invoke`] 分发。

use di_abstractions::{CrudRepository, Entity, EntityRepository};
use infrastructure_common::{QueryResult, Value};
use query_compiler::{EntityMetadata, FIND_BY_PREFIX};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::debug;

/// 仓储分发代理
pub struct RepositoryProxy<Id, E> {
    target: Arc<dyn EntityRepository>,
    metadata: Arc<EntityMetadata>,
    _marker: PhantomData<fn(Id) -> E>,
}

impl<Id, E> RepositoryProxy<Id, E> {
    /// 创建代理
    pub fn new(target: Arc<dyn EntityRepository>, metadata: Arc<EntityMetadata>) -> Self {
        Self {
            target,
            metadata,
            _marker: PhantomData,
        }
    }

    /// 实体元数据
    pub fn metadata(&self) -> &Arc<EntityMetadata> {
        &self.metadata
    }

    /// 仓储实现
    pub fn target(&self) -> &Arc<dyn EntityRepository> {
        &self.target
    }

    /// 按方法名分发调用
    ///
    /// `findBy` 开头的方法交给派生查询编译，其余方法直接转发给仓储实现
    pub fn invoke(&self, method: &str, args: &[Value]) -> QueryResult<String> {
        debug!("仓储调用: {}.{} ({} 个参数)", self.metadata.table_name(), method, args.len());
        if method.starts_with(FIND_BY_PREFIX) {
            self.target.find_by_conditions(method, args)
        } else {
            self.target.invoke(method, args)
        }
    }
}

impl<Id, E> CrudRepository<Id, E> for RepositoryProxy<Id, E>
where
    Id: Into<Value>,
    E: Entity,
{
    fn save(&self, entity: &E) -> QueryResult<String> {
        self.target.save(&entity.field_values())
    }

    fn get_one(&self, id: Id) -> QueryResult<String> {
        self.invoke("getOne", &[id.into()])
    }

    fn delete(&self, id: Id) -> QueryResult<String> {
        self.invoke("delete", &[id.into()])
    }

    fn list_all(&self) -> QueryResult<String> {
        self.invoke("listAll", &[])
    }
}

impl<Id, E> fmt::Debug for RepositoryProxy<Id, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RepositoryProxy")
            .field("entity", &self.metadata.entity().name)
            .field("table", &self.metadata.table_name())
            .finish()
    }
}
