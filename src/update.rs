//! UpdateQuery：构建 UPDATE 语句。

use crate::binder::{ConditionFn, ValuesFn};
use crate::column::{Column, ColumnValues};
use crate::condition::{Condition, and};
use crate::statement::Builder;
use crate::string_builder::StringBuilder;
use crate::value::SqlValue;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateQuery {
    pub table: String,
    /// SET 子句，按写入顺序渲染。
    pub values: ColumnValues,
    pub condition: Option<Condition>,
    pub limit: i64,
    pub offset: i64,
}

impl UpdateQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(&mut self, table: impl Into<String>) -> &mut Self {
        self.table = table.into();
        self
    }

    pub fn set(&mut self, column: impl Into<Column>, value: impl Into<SqlValue>) -> &mut Self {
        self.values.set(column, value);
        self
    }

    pub fn set_values(&mut self, values: ColumnValues) -> &mut Self {
        self.values = values;
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

    pub fn limit(&mut self, limit: i64) -> &mut Self {
        self.limit = limit;
        self
    }

    pub fn offset(&mut self, offset: i64) -> &mut Self {
        self.offset = offset;
        self
    }
}

impl Builder for UpdateQuery {
    fn render(&self) -> (String, Vec<SqlValue>) {
        let mut buf = StringBuilder::new();
        let mut args = Vec::with_capacity(self.values.len());

        buf.write_str("UPDATE ");
        buf.write_str(&self.table);
        buf.write_str(" SET ");
        for (i, (col, val)) in self.values.iter().enumerate() {
            if i > 0 {
                buf.write_str(", ");
            }
            buf.write_str(col.as_str());
            buf.write_str(" = ?");
            args.push(val.clone());
        }

        buf.write_where(&mut args, self.condition.as_ref());
        buf.write_limit_offset(self.limit, self.offset);
        (buf.into_string(), args)
    }
}

/// 绑定记录类型的 UPDATE。
///
/// SET 与 WHERE 都在 [`prepare`](Self::prepare) 时才由函数从目标记录求值，
/// 构造阶段不会调用任何映射函数。
pub struct TypedUpdateQuery<'a, T> {
    pub query: UpdateQuery,
    pub values: Option<ValuesFn<T>>,
    pub condition: Option<ConditionFn<T>>,
    pub target: Option<&'a T>,
}

impl<'a, T> TypedUpdateQuery<'a, T> {
    pub fn new() -> Self {
        Self {
            query: UpdateQuery::new(),
            values: None,
            condition: None,
            target: None,
        }
    }

    pub fn values_fn(&mut self, f: impl Fn(&T) -> ColumnValues + Send + Sync + 'static) -> &mut Self {
        self.values = Some(Arc::new(f));
        self
    }

    pub fn condition_fn(&mut self, f: impl Fn(&T) -> Condition + Send + Sync + 'static) -> &mut Self {
        self.condition = Some(Arc::new(f));
        self
    }

    pub fn target(&mut self, target: &'a T) -> &mut Self {
        self.target = Some(target);
        self
    }

    /// 对目标记录求值，得到普通的 UpdateQuery；求出的条件与已有条件用 AND 组合。
    pub fn prepare(&self) -> UpdateQuery {
        let mut query = self.query.clone();
        let Some(target) = self.target else {
            return query;
        };
        if let Some(values_fn) = &self.values {
            query.values = values_fn(target);
        }
        if let Some(condition_fn) = &self.condition {
            query.where_(condition_fn(target));
        }
        query
    }
}

impl<T> Default for TypedUpdateQuery<'_, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for TypedUpdateQuery<'_, T> {
    fn clone(&self) -> Self {
        Self {
            query: self.query.clone(),
            values: self.values.clone(),
            condition: self.condition.clone(),
            target: self.target,
        }
    }
}

impl<T> fmt::Debug for TypedUpdateQuery<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedUpdateQuery")
            .field("query", &self.query)
            .field("has_values", &self.values.is_some())
            .field("has_condition", &self.condition.is_some())
            .field("has_target", &self.target.is_some())
            .finish()
    }
}

impl<T> Deref for TypedUpdateQuery<'_, T> {
    type Target = UpdateQuery;
    fn deref(&self) -> &Self::Target {
        &self.query
    }
}

impl<T> DerefMut for TypedUpdateQuery<'_, T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.query
    }
}

impl<T> Builder for TypedUpdateQuery<'_, T> {
    fn render(&self) -> (String, Vec<SqlValue>) {
        self.prepare().render()
    }
}
