//! SelectQuery：构建 SELECT 语句。
//!
//! 渲染顺序固定：`SELECT <cols> FROM <table>`，随后依次是 JOIN、WHERE、ORDER BY、LIMIT、OFFSET。
//! JOIN 的参数排在 WHERE 参数之前。

use crate::binder::SelectTargetsFn;
use crate::column::Column;
use crate::condition::{Condition, and};
use crate::order::OrderBy;
use crate::scan::ScanDest;
use crate::statement::Builder;
use crate::string_builder::StringBuilder;
use crate::value::SqlValue;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

/// JOIN 的种类；`None` 渲染为裸 `JOIN`。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    FullJoin,
    FullOuterJoin,
    InnerJoin,
    LeftJoin,
    LeftOuterJoin,
    RightJoin,
    RightOuterJoin,
}

impl JoinKind {
    fn as_str(self) -> &'static str {
        match self {
            Self::FullJoin => "FULL",
            Self::FullOuterJoin => "FULL OUTER",
            Self::InnerJoin => "INNER",
            Self::LeftJoin => "LEFT",
            Self::LeftOuterJoin => "LEFT OUTER",
            Self::RightJoin => "RIGHT",
            Self::RightOuterJoin => "RIGHT OUTER",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub kind: Option<JoinKind>,
    pub table: String,
    pub on: Condition,
}

impl Join {
    fn write_to(&self, buf: &mut StringBuilder, args: &mut Vec<SqlValue>) {
        if let Some(kind) = self.kind {
            buf.write_str(kind.as_str());
            buf.write_char(' ');
        }
        buf.write_str("JOIN ");
        buf.write_str(&self.table);

        let (on, on_args) = self.on.build();
        if !on.is_empty() {
            buf.write_str(" ON ");
            buf.write_str(&on);
            args.extend(on_args);
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectQuery {
    /// `None` 表示“未设置”，Repository 会用默认列补齐；空列表渲染为 `*`。
    pub columns: Option<Vec<Column>>,
    /// 空字符串表示“未设置”，Repository 会用默认表名补齐。
    pub table: String,
    pub joins: Vec<Join>,
    pub condition: Option<Condition>,
    pub order_by: Vec<OrderBy>,
    pub limit: i64,
    pub offset: i64,
}

impl SelectQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, columns: impl IntoIterator<Item = impl Into<Column>>) -> &mut Self {
        self.columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    pub fn from(&mut self, table: impl Into<String>) -> &mut Self {
        self.table = table.into();
        self
    }

    pub fn join(
        &mut self,
        kind: Option<JoinKind>,
        table: impl Into<String>,
        on: Condition,
    ) -> &mut Self {
        self.joins.push(Join {
            kind,
            table: table.into(),
            on,
        });
        self
    }

    /// 设置条件；已有条件时与新条件用 AND 组合。
    pub fn where_(&mut self, condition: Condition) -> &mut Self {
        self.condition = Some(match self.condition.take() {
            Some(existing) => and([existing, condition]),
            None => condition,
        });
        self
    }

    pub fn order_by(&mut self, order: OrderBy) -> &mut Self {
        self.order_by.push(order);
        self
    }

    pub fn order_by_asc(&mut self, column: impl Into<Column>) -> &mut Self {
        self.order_by(OrderBy::asc(column))
    }

    pub fn order_by_desc(&mut self, column: impl Into<Column>) -> &mut Self {
        self.order_by(OrderBy::desc(column))
    }

    pub fn limit(&mut self, limit: i64) -> &mut Self {
        self.limit = limit;
        self
    }

    pub fn offset(&mut self, offset: i64) -> &mut Self {
        self.offset = offset;
        self
    }
}

impl Builder for SelectQuery {
    fn render(&self) -> (String, Vec<SqlValue>) {
        let mut buf = StringBuilder::new();
        let mut args = Vec::new();

        buf.write_str("SELECT ");
        match &self.columns {
            Some(cols) if !cols.is_empty() => buf.write_joined(cols, ", "),
            _ => buf.write_char('*'),
        }
        buf.write_str(" FROM ");
        buf.write_str(&self.table);

        for join in &self.joins {
            buf.write_char(' ');
            join.write_to(&mut buf, &mut args);
        }

        buf.write_where(&mut args, self.condition.as_ref());

        if !self.order_by.is_empty() {
            buf.write_str(" ORDER BY ");
            buf.write_joined(&self.order_by, ", ");
        }

        buf.write_limit_offset(self.limit, self.offset);
        (buf.into_string(), args)
    }
}

/// 绑定记录类型的 SELECT：在 SelectQuery 之外携带扫描目标函数。
///
/// 通过 `Deref`/`DerefMut` 直接使用 SelectQuery 的字段与方法。
pub struct TypedSelectQuery<T> {
    pub query: SelectQuery,
    pub targets: Option<SelectTargetsFn<T>>,
}

impl<T> TypedSelectQuery<T> {
    pub fn new() -> Self {
        Self {
            query: SelectQuery::new(),
            targets: None,
        }
    }

    /// 覆盖默认的扫描目标（例如只选部分列时）。
    pub fn targets<F>(&mut self, f: F) -> &mut Self
    where
        F: for<'r> Fn(&'r mut T) -> Vec<&'r mut dyn ScanDest> + Send + Sync + 'static,
    {
        self.targets = Some(Arc::new(f));
        self
    }

    pub fn prepare(&self) -> SelectQuery {
        self.query.clone()
    }
}

impl<T> Default for TypedSelectQuery<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for TypedSelectQuery<T> {
    fn clone(&self) -> Self {
        Self {
            query: self.query.clone(),
            targets: self.targets.clone(),
        }
    }
}

impl<T> fmt::Debug for TypedSelectQuery<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedSelectQuery")
            .field("query", &self.query)
            .field("has_targets", &self.targets.is_some())
            .finish()
    }
}

impl<T> Deref for TypedSelectQuery<T> {
    type Target = SelectQuery;
    fn deref(&self) -> &Self::Target {
        &self.query
    }
}

impl<T> DerefMut for TypedSelectQuery<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.query
    }
}

impl<T> Builder for TypedSelectQuery<T> {
    fn render(&self) -> (String, Vec<SqlValue>) {
        self.query.render()
    }
}
