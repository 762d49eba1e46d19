//! Condition：WHERE/ON 条件树。
//!
//! 条件树是一个值类型（叶子：Comparison / Raw；组合：Group），通过 [`Condition::build`]
//! 渲染成 `?` 占位的 SQL 片段与按位置对齐的参数列表。占位符第 i 个总是绑定参数第 i 个，
//! 嵌套的 Group 按子条件从左到右拼接文本与参数。

use crate::column::Column;
use crate::value::SqlValue;

/// 比较运算符。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Equal,
    NotEqual,
    GreaterThan,
    GreaterEqualThan,
    LessThan,
    LessEqualThan,
    Like,
    NotLike,
}

impl Operator {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Equal => "=",
            Self::NotEqual => "!=",
            Self::GreaterThan => ">",
            Self::GreaterEqualThan => ">=",
            Self::LessThan => "<",
            Self::LessEqualThan => "<=",
            Self::Like => "LIKE",
            Self::NotLike => "NOT LIKE",
        }
    }
}

/// 条件表达式。
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// `column <op> ?`，值为 `Null` 时 `=`/`!=` 渲染成 `IS NULL`/`IS NOT NULL`。
    Comparison {
        column: Column,
        operator: Operator,
        value: SqlValue,
    },
    /// 原样拼入的 SQL 片段；占位符数量需要调用方自行与 `args` 保持一致。
    Raw { sql: String, args: Vec<SqlValue> },
    /// 用 AND（`or == false`）或 OR 连接的一组条件，渲染结果自带括号。
    Group { conditions: Vec<Condition>, or: bool },
}

impl Default for Condition {
    /// 空条件：渲染为空字符串，语句会省略 WHERE。
    fn default() -> Self {
        Self::Group {
            conditions: Vec::new(),
            or: false,
        }
    }
}

impl Condition {
    pub fn comparison(
        column: impl Into<Column>,
        operator: Operator,
        value: impl Into<SqlValue>,
    ) -> Self {
        Self::Comparison {
            column: column.into(),
            operator,
            value: value.into(),
        }
    }

    /// 渲染为 `(sql, args)`。
    pub fn build(&self) -> (String, Vec<SqlValue>) {
        let mut sql = String::new();
        let mut args = Vec::new();
        self.write_to(&mut sql, &mut args);
        (sql, args)
    }

    /// 渲染结果是否为空（空 Group，或只包含空 Group 的 Group）。
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Comparison { .. } => false,
            Self::Raw { sql, .. } => sql.is_empty(),
            Self::Group { conditions, .. } => conditions.iter().all(Condition::is_empty),
        }
    }

    /// 追加渲染结果；`sql` 与 `args` 同步增长，保证占位符与参数的对齐。
    pub(crate) fn write_to(&self, sql: &mut String, args: &mut Vec<SqlValue>) {
        match self {
            Self::Comparison {
                column,
                operator,
                value,
            } => {
                sql.push_str(column.as_str());
                match (operator, value) {
                    (Operator::Equal, SqlValue::Null) => sql.push_str(" IS NULL"),
                    (Operator::NotEqual, SqlValue::Null) => sql.push_str(" IS NOT NULL"),
                    _ => {
                        sql.push(' ');
                        sql.push_str(operator.as_str());
                        sql.push_str(" ?");
                        args.push(value.clone());
                    }
                }
            }
            Self::Raw { sql: s, args: a } => {
                sql.push_str(s);
                args.extend(a.iter().cloned());
            }
            Self::Group { conditions, or } => {
                if self.is_empty() {
                    return;
                }
                let sep = if *or { " OR " } else { " AND " };
                sql.push('(');
                let mut first = true;
                for c in conditions.iter().filter(|c| !c.is_empty()) {
                    if !first {
                        sql.push_str(sep);
                    }
                    first = false;
                    c.write_to(sql, args);
                }
                sql.push(')');
            }
        }
    }
}

/// 用 AND 连接多个条件。
pub fn and(conditions: impl IntoIterator<Item = Condition>) -> Condition {
    Condition::Group {
        conditions: conditions.into_iter().collect(),
        or: false,
    }
}

/// 用 OR 连接多个条件。
pub fn or(conditions: impl IntoIterator<Item = Condition>) -> Condition {
    Condition::Group {
        conditions: conditions.into_iter().collect(),
        or: true,
    }
}

/// `column = ?`；`value` 为 NULL 时渲染 `column IS NULL`。
pub fn equal(column: impl Into<Column>, value: impl Into<SqlValue>) -> Condition {
    Condition::comparison(column, Operator::Equal, value)
}

/// `column != ?`；`value` 为 NULL 时渲染 `column IS NOT NULL`。
pub fn not_equal(column: impl Into<Column>, value: impl Into<SqlValue>) -> Condition {
    Condition::comparison(column, Operator::NotEqual, value)
}

pub fn greater_than(column: impl Into<Column>, value: impl Into<SqlValue>) -> Condition {
    Condition::comparison(column, Operator::GreaterThan, value)
}

pub fn greater_equal_than(column: impl Into<Column>, value: impl Into<SqlValue>) -> Condition {
    Condition::comparison(column, Operator::GreaterEqualThan, value)
}

pub fn less_than(column: impl Into<Column>, value: impl Into<SqlValue>) -> Condition {
    Condition::comparison(column, Operator::LessThan, value)
}

pub fn less_equal_than(column: impl Into<Column>, value: impl Into<SqlValue>) -> Condition {
    Condition::comparison(column, Operator::LessEqualThan, value)
}

pub fn like(column: impl Into<Column>, value: impl Into<SqlValue>) -> Condition {
    Condition::comparison(column, Operator::Like, value)
}

pub fn not_like(column: impl Into<Column>, value: impl Into<SqlValue>) -> Condition {
    Condition::comparison(column, Operator::NotLike, value)
}

pub fn is_null(column: impl Into<Column>) -> Condition {
    equal(column, SqlValue::Null)
}

pub fn is_not_null(column: impl Into<Column>) -> Condition {
    not_equal(column, SqlValue::Null)
}

/// 原样 SQL 片段。
pub fn raw(
    sql: impl Into<String>,
    args: impl IntoIterator<Item = impl Into<SqlValue>>,
) -> Condition {
    Condition::Raw {
        sql: sql.into(),
        args: args.into_iter().map(Into::into).collect(),
    }
}

/// `column IN (?, ?, ...)`；空列表渲染为恒假的 `0 = 1`。
pub fn in_list(
    column: impl Into<Column>,
    values: impl IntoIterator<Item = impl Into<SqlValue>>,
) -> Condition {
    membership(column.into(), "IN", "0 = 1", values)
}

/// `column NOT IN (?, ?, ...)`；空列表渲染为恒真的 `0 = 0`。
pub fn not_in_list(
    column: impl Into<Column>,
    values: impl IntoIterator<Item = impl Into<SqlValue>>,
) -> Condition {
    membership(column.into(), "NOT IN", "0 = 0", values)
}

fn membership(
    column: Column,
    keyword: &str,
    when_empty: &str,
    values: impl IntoIterator<Item = impl Into<SqlValue>>,
) -> Condition {
    let args: Vec<SqlValue> = values.into_iter().map(Into::into).collect();
    if args.is_empty() {
        return Condition::Raw {
            sql: when_empty.to_string(),
            args,
        };
    }
    let placeholders = vec!["?"; args.len()].join(", ");
    Condition::Raw {
        sql: format!("{column} {keyword} ({placeholders})"),
        args,
    }
}

/// JSON 数组列中包含 `value`：`JSON_CONTAINS(column, ?, '$') = 1`。
pub fn json_array_contains(column: impl Into<Column>, value: impl Into<SqlValue>) -> Condition {
    let column = column.into();
    Condition::Raw {
        sql: format!("JSON_CONTAINS({column}, ?, '$') = 1"),
        args: vec![value.into()],
    }
}

/// JSON 数组列中不包含 `value`：`JSON_CONTAINS(column, ?, '$') = 0`。
pub fn not_json_array_contains(
    column: impl Into<Column>,
    value: impl Into<SqlValue>,
) -> Condition {
    let column = column.into();
    Condition::Raw {
        sql: format!("JSON_CONTAINS({column}, ?, '$') = 0"),
        args: vec![value.into()],
    }
}
