//! 实体元数据解析
//!
//! 从实体类型描述符中提取表名、字段与列的映射以及唯一主键字段。

use dashmap::DashMap;
use indexmap::IndexMap;
use infrastructure_common::{SchemaError, TypeDescriptor, TypeInfo};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// 字段到列的有序映射（按字段声明顺序）
pub type FieldMap = IndexMap<String, String>;

/// 实体元数据
///
/// 构建后不可变，同一实体的所有仓储共享同一份元数据
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityMetadata {
    entity: TypeInfo,
    table_name: String,
    id_field: String,
    fields_to_columns: FieldMap,
    columns_to_fields: HashMap<String, String>,
}

impl EntityMetadata {
    /// 从实体描述符解析元数据
    ///
    /// 只有带列标记的字段参与映射；带列标记且带主键标记的字段成为主键。
    pub fn resolve(descriptor: &TypeDescriptor) -> Result<Self, SchemaError> {
        let entity = descriptor.name().to_string();

        let table_name = descriptor
            .table_name()
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| SchemaError::MissingTable {
                entity: entity.clone(),
            })?
            .to_string();

        let mut fields_to_columns = FieldMap::new();
        let mut columns_to_fields = HashMap::new();
        let mut id_fields = Vec::new();

        for field in &descriptor.fields {
            let Some(column) = field.column_name() else {
                continue;
            };
            if column.trim().is_empty() {
                return Err(SchemaError::EmptyColumn {
                    entity,
                    field: field.name.clone(),
                });
            }

            fields_to_columns.insert(field.name.clone(), column.to_string());
            columns_to_fields.insert(column.to_string(), field.name.clone());

            if field.is_id() {
                id_fields.push(field.name.clone());
            }
        }

        let id_field = match id_fields.len() {
            0 => return Err(SchemaError::MissingId { entity }),
            1 => id_fields.remove(0),
            _ => {
                return Err(SchemaError::MultipleIds {
                    entity,
                    fields: id_fields,
                })
            }
        };

        debug!(
            "解析实体元数据: {} -> 表 {}, 主键 {}, 字段数 {}",
            entity,
            table_name,
            id_field,
            fields_to_columns.len()
        );

        Ok(Self {
            entity: descriptor.info.clone(),
            table_name,
            id_field,
            fields_to_columns,
            columns_to_fields,
        })
    }

    /// 实体类型
    pub fn entity(&self) -> &TypeInfo {
        &self.entity
    }

    /// 表名
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// 主键字段名
    pub fn id_field(&self) -> &str {
        &self.id_field
    }

    /// 主键列名
    pub fn id_column(&self) -> &str {
        self.fields_to_columns
            .get(&self.id_field)
            .map_or(self.id_field.as_str(), String::as_str)
    }

    /// 字段到列的映射
    pub fn fields_to_columns(&self) -> &FieldMap {
        &self.fields_to_columns
    }

    /// 列到字段的映射
    pub fn columns_to_fields(&self) -> &HashMap<String, String> {
        &self.columns_to_fields
    }

    /// 字段对应的列名
    pub fn column_name(&self, field: &str) -> Option<&str> {
        self.fields_to_columns.get(field).map(String::as_str)
    }

    /// 列对应的字段名
    pub fn field_name(&self, column: &str) -> Option<&str> {
        self.columns_to_fields.get(column).map(String::as_str)
    }
}

/// 实体元数据缓存
///
/// 按实体类型标识缓存解析结果，重复解析直接返回共享实例
#[derive(Debug, Default)]
pub struct EntityMetadataCache {
    entries: DashMap<String, Arc<EntityMetadata>>,
}

impl EntityMetadataCache {
    /// 创建新的缓存
    pub fn new() -> Self {
        Self::default()
    }

    /// 解析（或从缓存获取）实体元数据
    pub fn resolve(&self, descriptor: &TypeDescriptor) -> Result<Arc<EntityMetadata>, SchemaError> {
        if let Some(metadata) = self.entries.get(descriptor.name()) {
            return Ok(metadata.clone());
        }

        let metadata = Arc::new(EntityMetadata::resolve(descriptor)?);
        let entry = self
            .entries
            .entry(descriptor.name().to_string())
            .or_insert(metadata);
        Ok(entry.clone())
    }

    /// 已缓存的实体数量
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 缓存是否为空
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
