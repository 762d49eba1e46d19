//! InsertQuery：构建 INSERT 语句，支持一次写入多行。

use crate::binder::ValuesFn;
use crate::column::{Column, ColumnValues};
use crate::statement::Builder;
use crate::string_builder::StringBuilder;
use crate::value::SqlValue;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InsertQuery {
    pub table: String,
    pub columns: Vec<Column>,
    /// 每个元素是一行，顺序与 `columns` 对齐。
    pub values: Vec<Vec<SqlValue>>,
    pub limit: i64,
    pub offset: i64,
}

impl InsertQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_table(&mut self, table: impl Into<String>) -> &mut Self {
        self.table = table.into();
        self
    }

    pub fn cols(&mut self, columns: impl IntoIterator<Item = impl Into<Column>>) -> &mut Self {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// 追加一行。
    pub fn values(&mut self, row: impl IntoIterator<Item = impl Into<SqlValue>>) -> &mut Self {
        self.values.push(row.into_iter().map(Into::into).collect());
        self
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

impl Builder for InsertQuery {
    fn render(&self) -> (String, Vec<SqlValue>) {
        let mut buf = StringBuilder::new();
        let mut args = Vec::new();

        buf.write_str("INSERT INTO ");
        buf.write_str(&self.table);
        buf.write_char('(');
        buf.write_joined(&self.columns, ", ");
        buf.write_str(") VALUES");

        for (i, row) in self.values.iter().enumerate() {
            buf.write_str(if i > 0 { ", " } else { " " });
            buf.write_char('(');
            buf.write_placeholders(row.len());
            buf.write_char(')');
            args.extend(row.iter().cloned());
        }

        buf.write_limit_offset(self.limit, self.offset);
        (buf.into_string(), args)
    }
}

/// 绑定记录类型的 INSERT：列与值由 `values` 函数从每条记录推导。
pub struct TypedInsertQuery<'a, T> {
    pub query: InsertQuery,
    pub values: Option<ValuesFn<T>>,
    pub targets: Vec<&'a T>,
}

impl<'a, T> TypedInsertQuery<'a, T> {
    pub fn new() -> Self {
        Self {
            query: InsertQuery::new(),
            values: None,
            targets: Vec::new(),
        }
    }

    /// 覆盖默认的取值函数。
    pub fn values_fn(&mut self, f: impl Fn(&T) -> ColumnValues + Send + Sync + 'static) -> &mut Self {
        self.values = Some(Arc::new(f));
        self
    }

    pub fn target(&mut self, target: &'a T) -> &mut Self {
        self.targets.push(target);
        self
    }

    pub fn targets(&mut self, targets: impl IntoIterator<Item = &'a T>) -> &mut Self {
        self.targets.extend(targets);
        self
    }

    /// 把记录展开成普通的 InsertQuery。
    ///
    /// 列取自第一条记录，其余记录按列名取值，因此各记录的列顺序可以不同。
    /// 没有取值函数或没有记录时，返回的语句不含任何行。
    ///
    /// # Panics
    ///
    /// 后续记录缺少第一条记录中出现过的列时 panic：这是映射函数的配置错误。
    pub fn prepare(&self) -> InsertQuery {
        let mut query = self.query.clone();
        let Some(values_fn) = &self.values else {
            return query;
        };

        let mut rows = self.targets.iter().map(|t| values_fn(*t));
        let Some(first) = rows.next() else {
            return query;
        };

        query.columns = first.columns().cloned().collect();
        query.values = vec![first.iter().map(|(_, v)| v.clone()).collect()];

        for (idx, row) in rows.enumerate() {
            let ordered = query
                .columns
                .iter()
                .map(|col| match row.get(col) {
                    Some(v) => v.clone(),
                    None => panic!("insert record #{} is missing column `{col}`", idx + 1),
                })
                .collect();
            query.values.push(ordered);
        }
        query
    }
}

impl<T> Default for TypedInsertQuery<'_, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for TypedInsertQuery<'_, T> {
    fn clone(&self) -> Self {
        Self {
            query: self.query.clone(),
            values: self.values.clone(),
            targets: self.targets.clone(),
        }
    }
}

impl<T> fmt::Debug for TypedInsertQuery<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedInsertQuery")
            .field("query", &self.query)
            .field("has_values", &self.values.is_some())
            .field("targets", &self.targets.len())
            .finish()
    }
}

impl<T> Deref for TypedInsertQuery<'_, T> {
    type Target = InsertQuery;
    fn deref(&self) -> &Self::Target {
        &self.query
    }
}

impl<T> DerefMut for TypedInsertQuery<'_, T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.query
    }
}

impl<T> Builder for TypedInsertQuery<'_, T> {
    fn render(&self) -> (String, Vec<SqlValue>) {
        self.prepare().render()
    }
}
