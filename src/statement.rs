//! Statement：四种语句的统一表示与渲染入口。

use crate::delete::DeleteQuery;
use crate::flavor::{Flavor, default_flavor};
use crate::insert::InsertQuery;
use crate::select::SelectQuery;
use crate::update::UpdateQuery;
use crate::value::SqlValue;
use std::fmt;

/// 可渲染为 `(sql, args)` 的语句。
///
/// `render` 统一输出 `?` 占位；`build_with_flavor` 再按方言改写占位符。
/// 渲染是纯函数：同一个未修改的语句多次渲染，结果逐字节相同。
pub trait Builder {
    fn render(&self) -> (String, Vec<SqlValue>);

    fn build_with_flavor(&self, flavor: Flavor) -> (String, Vec<SqlValue>) {
        let (sql, args) = self.render();
        (flavor.rewrite_placeholders(&sql), args)
    }

    fn build(&self) -> (String, Vec<SqlValue>) {
        self.build_with_flavor(default_flavor())
    }
}

/// 语句种类。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementKind {
    Select,
    Insert,
    Update,
    Delete,
}

impl StatementKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Select => "select",
            Self::Insert => "insert",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 已经补齐默认值、即将执行的语句；pre-action hook 拿到的就是它。
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Select(SelectQuery),
    Insert(InsertQuery),
    Update(UpdateQuery),
    Delete(DeleteQuery),
}

impl Statement {
    pub fn kind(&self) -> StatementKind {
        match self {
            Self::Select(_) => StatementKind::Select,
            Self::Insert(_) => StatementKind::Insert,
            Self::Update(_) => StatementKind::Update,
            Self::Delete(_) => StatementKind::Delete,
        }
    }

    pub fn table(&self) -> &str {
        match self {
            Self::Select(q) => &q.table,
            Self::Insert(q) => &q.table,
            Self::Update(q) => &q.table,
            Self::Delete(q) => &q.table,
        }
    }

    pub fn as_select(&self) -> Option<&SelectQuery> {
        match self {
            Self::Select(q) => Some(q),
            _ => None,
        }
    }
}

impl Builder for Statement {
    fn render(&self) -> (String, Vec<SqlValue>) {
        match self {
            Self::Select(q) => q.render(),
            Self::Insert(q) => q.render(),
            Self::Update(q) => q.render(),
            Self::Delete(q) => q.render(),
        }
    }
}

impl From<SelectQuery> for Statement {
    fn from(q: SelectQuery) -> Self {
        Self::Select(q)
    }
}

impl From<InsertQuery> for Statement {
    fn from(q: InsertQuery) -> Self {
        Self::Insert(q)
    }
}

impl From<UpdateQuery> for Statement {
    fn from(q: UpdateQuery) -> Self {
        Self::Update(q)
    }
}

impl From<DeleteQuery> for Statement {
    fn from(q: DeleteQuery) -> Self {
        Self::Delete(q)
    }
}
