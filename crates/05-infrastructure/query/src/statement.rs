//! INSERT / UPDATE 语句构建
//!
//! 值按字面量加单引号拼接，不做转义，也不做参数绑定。

use indexmap::IndexMap;
use infrastructure_common::{QueryError, QueryResult};

/// 列名到字面量值的有序映射，输出顺序即插入顺序
pub type ColumnValues = IndexMap<String, String>;

fn check_arguments(table: &str, values: &ColumnValues) -> QueryResult<()> {
    if table.trim().is_empty() {
        return Err(QueryError::invalid_argument("表名不能为空"));
    }
    if values.is_empty() {
        return Err(QueryError::invalid_argument(format!(
            "表 {} 的列值集合不能为空",
            table
        )));
    }
    Ok(())
}

/// 构建 INSERT 语句
///
/// `INSERT INTO t (c1, c2) VALUES ('v1', 'v2')`
pub fn build_insert(table: &str, values: &ColumnValues) -> QueryResult<String> {
    check_arguments(table, values)?;

    let columns = values.keys().map(String::as_str).collect::<Vec<_>>().join(", ");
    let literals = values
        .values()
        .map(|value| format!("'{}'", value))
        .collect::<Vec<_>>()
        .join(", ");

    Ok(format!("INSERT INTO {} ({}) VALUES ({})", table, columns, literals))
}

/// 构建不带 WHERE 子句的 UPDATE 语句
///
/// `UPDATE t SET c1 = 'v1', c2 = 'v2'`
pub fn build_update(table: &str, values: &ColumnValues) -> QueryResult<String> {
    check_arguments(table, values)?;

    let assignments = values
        .iter()
        .map(|(column, value)| format!("{} = '{}'", column, value))
        .collect::<Vec<_>>()
        .join(", ");

    Ok(format!("UPDATE {} SET {}", table, assignments))
}

/// 按主键过滤的 WHERE 子句，直接拼接在语句之后
///
/// `" WHERE id = '7'"`
pub fn filter_by_id(id_column: &str, id: &str) -> String {
    format!(" WHERE {} = '{}'", id_column, id)
}
