//! 默认仓储实现
//!
//! 根据绑定的实体元数据生成 SQL 文本并记录日志，不执行任何语句。

use di_abstractions::{
    component_bean, crud_repository_info, downcast_component, EntityRepository, Registrable,
    TypeDefinition,
};
use infrastructure_common::{QueryError, QueryResult, TypeDescriptor, TypeInfo, Value};
use once_cell::sync::OnceCell;
use query_compiler::{
    build_insert, build_update, filter_by_id, parse_query, ColumnValues, EntityMetadata,
};
use std::sync::Arc;
use tracing::{info, warn};

/// 基于实体元数据生成 SQL 的仓储实现
#[derive(Debug, Default)]
pub struct SqlCrudRepository {
    metadata: OnceCell<Arc<EntityMetadata>>,
}

impl SqlCrudRepository {
    /// 创建未绑定元数据的实例
    pub fn new() -> Self {
        Self::default()
    }

    /// 创建并绑定元数据
    pub fn with_metadata(metadata: Arc<EntityMetadata>) -> Self {
        let repository = Self::new();
        repository.bind_metadata(metadata);
        repository
    }

    fn bound(&self) -> QueryResult<&EntityMetadata> {
        self.metadata
            .get()
            .map(Arc::as_ref)
            .ok_or(QueryError::Unbound)
    }

    fn emit(&self, statement: String) -> QueryResult<String> {
        info!(sql = %statement, "生成 SQL");
        Ok(statement)
    }

    fn single_argument<'a>(method: &str, args: &'a [Value]) -> QueryResult<&'a Value> {
        args.first().ok_or_else(|| {
            QueryError::invalid_argument(format!("方法 {} 需要一个主键参数", method))
        })
    }
}

impl Registrable for SqlCrudRepository {
    fn type_definition() -> TypeDefinition {
        TypeDefinition::new(
            TypeDescriptor::concrete(TypeInfo::of::<Self>()).with_interface(crud_repository_info()),
        )
        .with_constructor(|| Ok(component_bean(Arc::new(SqlCrudRepository::new()))))
        .with_repository_target(|bean| {
            downcast_component::<SqlCrudRepository>(bean)
                .map(|repository| repository as Arc<dyn EntityRepository>)
        })
    }
}

impl EntityRepository for SqlCrudRepository {
    fn bind_metadata(&self, metadata: Arc<EntityMetadata>) {
        let table = metadata.table_name().to_string();
        if self.metadata.set(metadata).is_err() {
            warn!("仓储实现已绑定实体元数据, 忽略重复绑定: {}", table);
        }
    }

    fn metadata(&self) -> Option<Arc<EntityMetadata>> {
        self.metadata.get().cloned()
    }

    /// 主键值渲染为空字符串时插入，否则按主键更新
    ///
    /// 这是基于字符串的启发式判断，`0` 或 `false` 之类的主键值会被视为已存在的记录
    fn save(&self, values: &[(&str, Value)]) -> QueryResult<String> {
        let metadata = self.bound()?;

        let mut columns = ColumnValues::new();
        let mut id = String::new();
        for (field, value) in values {
            let Some(column) = metadata.column_name(field) else {
                continue;
            };
            let rendered = value.render();
            if *field == metadata.id_field() {
                id = rendered.clone();
            }
            columns.insert(column.to_string(), rendered);
        }

        let statement = if id.is_empty() {
            build_insert(metadata.table_name(), &columns)?
        } else {
            build_update(metadata.table_name(), &columns)?
                + &filter_by_id(metadata.id_column(), &id)
        };
        self.emit(statement)
    }

    fn get_one(&self, id: &Value) -> QueryResult<String> {
        let metadata = self.bound()?;
        self.emit(format!(
            "SELECT * FROM {}{}",
            metadata.table_name(),
            filter_by_id(metadata.id_column(), &id.render())
        ))
    }

    fn delete(&self, id: &Value) -> QueryResult<String> {
        let metadata = self.bound()?;
        self.emit(format!(
            "DELETE FROM {}{}",
            metadata.table_name(),
            filter_by_id(metadata.id_column(), &id.render())
        ))
    }

    fn list_all(&self) -> QueryResult<String> {
        let metadata = self.bound()?;
        self.emit(format!("SELECT * FROM {}", metadata.table_name()))
    }

    fn find_by_conditions(&self, method: &str, args: &[Value]) -> QueryResult<String> {
        let metadata = self.bound()?;
        let predicate = parse_query(method, metadata.fields_to_columns(), args)?;
        self.emit(format!("SELECT * FROM {} WHERE{}", metadata.table_name(), predicate))
    }

    fn invoke(&self, method: &str, args: &[Value]) -> QueryResult<String> {
        match method {
            "getOne" => self.get_one(Self::single_argument(method, args)?),
            "delete" => self.delete(Self::single_argument(method, args)?),
            "listAll" => self.list_all(),
            _ => Err(QueryError::UnknownMethod {
                method: method.to_string(),
            }),
        }
    }
}
