//! 派生查询方法名解析
//!
//! 将 `findBy<字段><条件>[<And|Or><字段><条件>]...` 形式的方法名编译为 SQL 谓词片段。
//!
//! 解析分为两步:
//! 1. [`parse_method_name`] 只依赖方法名与字段映射，得到 [`ParsedPredicate`]；
//! 2. [`ParsedPredicate::render`] 按位置依次消费参数值，拼接谓词文本。
//!
//! 因此语法错误总是先于参数不足错误被报告。

use crate::entity::FieldMap;
use infrastructure_common::{QueryError, QueryResult, Value};
use tracing::trace;

/// 派生查询方法名前缀
pub const FIND_BY_PREFIX: &str = "findBy";

const NOT_KEYWORD: &str = "Not";

/// 比较运算符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorKind {
    GreaterOrEqual,
    LessOrEqual,
    Greater,
    Less,
    NotEqual,
    IsEqual,
}

impl OperatorKind {
    /// 关键字匹配顺序，较长的关键字必须排在其前缀之前
    pub const MATCH_ORDER: [OperatorKind; 6] = [
        Self::GreaterOrEqual,
        Self::LessOrEqual,
        Self::Greater,
        Self::Less,
        Self::NotEqual,
        Self::IsEqual,
    ];

    /// 方法名中的关键字
    pub fn keyword(self) -> &'static str {
        match self {
            Self::GreaterOrEqual => "GreaterOrEqual",
            Self::LessOrEqual => "LessOrEqual",
            Self::Greater => "Greater",
            Self::Less => "Less",
            Self::NotEqual => "NotEqual",
            Self::IsEqual => "IsEqual",
        }
    }

    /// 对应的 SQL 运算符
    pub fn sql(self) -> &'static str {
        match self {
            Self::GreaterOrEqual => ">=",
            Self::LessOrEqual => "<=",
            Self::Greater => ">",
            Self::Less => "<",
            Self::NotEqual => "<>",
            Self::IsEqual => "=",
        }
    }

    fn match_prefix(text: &str) -> Option<Self> {
        Self::MATCH_ORDER
            .into_iter()
            .find(|operator| text.starts_with(operator.keyword()))
    }
}

/// 逻辑运算符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalOperator {
    And,
    Or,
}

impl LogicalOperator {
    /// 方法名中的关键字
    pub fn keyword(self) -> &'static str {
        match self {
            Self::And => "And",
            Self::Or => "Or",
        }
    }

    /// 对应的 SQL 关键字
    pub fn sql(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }

    fn match_prefix(text: &str) -> Option<Self> {
        [Self::And, Self::Or]
            .into_iter()
            .find(|operator| text.starts_with(operator.keyword()))
    }
}

/// 单个比较条件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    /// 实体字段名
    pub field: String,
    /// 字段对应的列名
    pub column: String,
    /// 比较运算符
    pub operator: OperatorKind,
    /// 是否取反
    pub negated: bool,
}

/// 谓词子句，`join` 为与前一个子句之间的逻辑运算符
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    pub join: Option<LogicalOperator>,
    pub condition: Condition,
}

/// 解析后的谓词结构
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPredicate {
    method: String,
    clauses: Vec<Clause>,
}

impl ParsedPredicate {
    /// 方法名
    pub fn method(&self) -> &str {
        &self.method
    }

    /// 子句列表
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// 需要的参数个数
    pub fn arity(&self) -> usize {
        self.clauses.len()
    }

    /// 渲染谓词文本
    ///
    /// 第 N 个条件使用第 N 个参数值，多余的参数被忽略。
    pub fn render(&self, values: &[Value]) -> QueryResult<String> {
        let mut predicate = String::new();

        for (index, clause) in self.clauses.iter().enumerate() {
            let condition = &clause.condition;
            let value = values
                .get(index)
                .ok_or_else(|| QueryError::InsufficientArguments {
                    method: self.method.clone(),
                    field: condition.field.clone(),
                    index,
                })?;

            if let Some(join) = clause.join {
                predicate.push(' ');
                predicate.push_str(join.sql());
            }
            if condition.negated {
                predicate.push_str(" NOT");
            }
            predicate.push_str(&format!(
                " {} {} '{}'",
                condition.column,
                condition.operator.sql(),
                value.render()
            ));
        }

        Ok(predicate)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expect {
    Field,
    Condition,
    Logical,
}

struct FieldCandidate<'a> {
    capitalized: String,
    field: &'a str,
    column: &'a str,
}

/// 首字母大写
///
/// 蛇形命名的字段按段分别大写后拼接: `author_name` 与 `authorName` 都得到 `AuthorName`
pub fn capitalize_word(word: &str) -> String {
    word.split('_')
        .map(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect()
}

/// 方法名解析器
///
/// 预先计算首字母大写的字段名，同一实体的多次解析可复用。
/// 字段匹配取最长的首字母大写字段名，因此 `Field10` 不会被误识别为 `Field1`。
pub struct QueryNameParser<'a> {
    candidates: Vec<FieldCandidate<'a>>,
}

impl<'a> QueryNameParser<'a> {
    /// 基于字段映射创建解析器
    pub fn new(fields: &'a FieldMap) -> Self {
        let mut candidates: Vec<FieldCandidate<'a>> = fields
            .iter()
            .map(|(field, column)| FieldCandidate {
                capitalized: capitalize_word(field),
                field,
                column,
            })
            .collect();
        candidates.sort_by(|a, b| b.capitalized.len().cmp(&a.capitalized.len()));
        Self { candidates }
    }

    fn match_field(&self, text: &str) -> Option<&FieldCandidate<'a>> {
        self.candidates
            .iter()
            .find(|candidate| text.starts_with(candidate.capitalized.as_str()))
    }

    // 以 And/Or 开头且其后为结尾、另一个逻辑运算符或已知字段时才是错位的逻辑运算符，
    // 否则按未知字段处理（如 `Origin`、`Order`）
    fn is_misplaced_logical(&self, text: &str) -> bool {
        let Some(operator) = LogicalOperator::match_prefix(text) else {
            return false;
        };
        let after = &text[operator.keyword().len()..];
        after.is_empty()
            || LogicalOperator::match_prefix(after).is_some()
            || self.match_field(after).is_some()
    }

    /// 解析方法名
    ///
    /// 错误中的位置为方法名中的字符偏移。
    pub fn parse(&self, method: &str) -> QueryResult<ParsedPredicate> {
        let body = method
            .strip_prefix(FIND_BY_PREFIX)
            .filter(|body| !body.is_empty())
            .ok_or_else(|| QueryError::InvalidQueryName {
                method: method.to_string(),
                prefix: FIND_BY_PREFIX,
            })?;
        trace!("解析派生查询: {} (条件部分: {})", method, body);

        let position_of = |offset: usize| method[..offset].chars().count();

        let mut offset = FIND_BY_PREFIX.len();
        let mut expect = Expect::Field;
        let mut pending_join = None;
        let mut current: Option<Condition> = None;
        let mut clauses = Vec::new();

        while offset < method.len() {
            let rest = &method[offset..];

            match expect {
                Expect::Field => {
                    match self.match_field(rest) {
                        Some(candidate) => {
                            current = Some(Condition {
                                field: candidate.field.to_string(),
                                column: candidate.column.to_string(),
                                operator: OperatorKind::IsEqual,
                                negated: false,
                            });
                            offset += candidate.capitalized.len();
                            expect = Expect::Condition;
                        }
                        None if self.is_misplaced_logical(rest) => {
                            return Err(QueryError::syntax(
                                method,
                                position_of(offset),
                                "此处应为字段名, 而不是逻辑运算符",
                            ));
                        }
                        None => {
                            return Err(QueryError::UnknownField {
                                method: method.to_string(),
                                position: position_of(offset),
                            });
                        }
                    }
                }
                Expect::Condition => {
                    let Some(condition) = current.as_mut() else {
                        return Err(QueryError::syntax(method, position_of(offset), "缺少字段名"));
                    };

                    if rest.starts_with(NOT_KEYWORD)
                        && !rest.starts_with(OperatorKind::NotEqual.keyword())
                    {
                        condition.negated = true;
                        offset += NOT_KEYWORD.len();
                    }
                    if let Some(operator) = OperatorKind::match_prefix(&method[offset..]) {
                        condition.operator = operator;
                        offset += operator.keyword().len();
                    }
                    expect = Expect::Logical;
                }
                Expect::Logical => {
                    let Some(operator) = LogicalOperator::match_prefix(rest) else {
                        return Err(QueryError::syntax(
                            method,
                            position_of(offset),
                            "此处应为逻辑运算符 And 或 Or",
                        ));
                    };
                    if let Some(condition) = current.take() {
                        clauses.push(Clause {
                            join: pending_join.take(),
                            condition,
                        });
                    }
                    pending_join = Some(operator);
                    offset += operator.keyword().len();
                    expect = Expect::Field;
                }
            }
        }

        match current.take() {
            Some(condition) => clauses.push(Clause {
                join: pending_join.take(),
                condition,
            }),
            None => {
                return Err(QueryError::syntax(
                    method,
                    position_of(offset),
                    "逻辑运算符之后缺少字段名",
                ));
            }
        }

        Ok(ParsedPredicate {
            method: method.to_string(),
            clauses,
        })
    }
}

/// 解析方法名
pub fn parse_method_name(method: &str, fields: &FieldMap) -> QueryResult<ParsedPredicate> {
    QueryNameParser::new(fields).parse(method)
}

/// 解析方法名并按参数渲染谓词
pub fn parse_query(method: &str, fields: &FieldMap, values: &[Value]) -> QueryResult<String> {
    parse_method_name(method, fields)?.render(values)
}
