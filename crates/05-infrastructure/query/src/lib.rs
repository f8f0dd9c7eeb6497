//! # Query Compiler
//!
//! 实体元数据解析、派生查询方法名编译与 INSERT/UPDATE 语句构建。
//!
//! 本 crate 只负责生成 SQL 文本，不执行任何语句。
//!
//! ```
//! use query_compiler::{parse_query, FieldMap};
//!
//! let mut fields = FieldMap::new();
//! fields.insert("price".to_string(), "PRICE".to_string());
//!
//! let predicate = parse_query("findByPriceGreater", &fields, &[100.into()]).unwrap();
//! assert_eq!(predicate, " PRICE > '100'");
//! ```

pub mod entity;
pub mod parser;
pub mod statement;

pub use entity::{EntityMetadata, EntityMetadataCache, FieldMap};
pub use parser::{
    capitalize_word, parse_method_name, parse_query, Clause, Condition, LogicalOperator,
    OperatorKind, ParsedPredicate, QueryNameParser, FIND_BY_PREFIX,
};
pub use statement::{build_insert, build_update, filter_by_id, ColumnValues};
