//! 仓储抽象
//!
//! - [`CrudRepository`] 是带仓储标记的根仓储接口，业务仓储接口通过继承它声明
//!   Id 类型与实体类型
//! - [`EntityRepository`] 是仓储实现面向容器的类型擦除接口，
//!   容器为其绑定实体元数据，代理把调用转发给它

use crate::component::{Interface, Registrable};
use crate::definition::TypeDefinition;
use infrastructure_common::{QueryResult, Tag, TypeDescriptor, TypeInfo, Value};
use query_compiler::EntityMetadata;
use std::sync::Arc;

/// 根仓储接口
///
/// 所有方法返回生成的 SQL 文本
pub trait CrudRepository<Id, E>: Send + Sync {
    /// 保存实体（主键为空时插入，否则更新）
    fn save(&self, entity: &E) -> QueryResult<String>;

    /// 按主键查询
    fn get_one(&self, id: Id) -> QueryResult<String>;

    /// 按主键删除
    fn delete(&self, id: Id) -> QueryResult<String>;

    /// 查询全部
    fn list_all(&self) -> QueryResult<String>;
}

/// 根仓储接口的类型信息
pub fn crud_repository_info() -> TypeInfo {
    TypeInfo::of::<dyn CrudRepository<(), ()>>()
}

/// 根仓储接口的类型定义
pub fn crud_repository_definition() -> TypeDefinition {
    TypeDefinition::new(TypeDescriptor::interface(crud_repository_info()).with_tag(Tag::Repository))
}

impl<Id: 'static, E: 'static> Registrable for dyn CrudRepository<Id, E> {
    fn type_definition() -> TypeDefinition {
        crud_repository_definition()
    }
}

impl<Id: 'static, E: 'static> Interface for dyn CrudRepository<Id, E> {}

/// 仓储实现
///
/// 实现在绑定元数据之前调用任何语句方法都返回 `QueryError::Unbound`
pub trait EntityRepository: Send + Sync {
    /// 绑定实体元数据，只在启动阶段调用一次
    fn bind_metadata(&self, metadata: Arc<EntityMetadata>);

    /// 已绑定的实体元数据
    fn metadata(&self) -> Option<Arc<EntityMetadata>>;

    /// 保存实体，参数为 `(字段名, 取值)` 列表
    fn save(&self, values: &[(&str, Value)]) -> QueryResult<String>;

    /// 按主键查询
    fn get_one(&self, id: &Value) -> QueryResult<String>;

    /// 按主键删除
    fn delete(&self, id: &Value) -> QueryResult<String>;

    /// 查询全部
    fn list_all(&self) -> QueryResult<String>;

    /// 派生查询
    fn find_by_conditions(&self, method: &str, args: &[Value]) -> QueryResult<String>;

    /// 按方法名分发其他调用
    fn invoke(&self, method: &str, args: &[Value]) -> QueryResult<String>;
}
