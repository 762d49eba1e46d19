//! DeleteQuery：构建 DELETE 语句。

use crate::binder::ConditionFn;
use crate::condition::{Condition, and};
use crate::statement::Builder;
use crate::string_builder::StringBuilder;
use crate::value::SqlValue;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeleteQuery {
    pub table: String,
    pub condition: Option<Condition>,
    pub limit: i64,
    pub offset: i64,
}

impl DeleteQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delete_from(&mut self, table: impl Into<String>) -> &mut Self {
        self.table = table.into();
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

impl Builder for DeleteQuery {
    fn render(&self) -> (String, Vec<SqlValue>) {
        let mut buf = StringBuilder::new();
        let mut args = Vec::new();

        buf.write_str("DELETE FROM ");
        buf.write_str(&self.table);
        buf.write_where(&mut args, self.condition.as_ref());
        buf.write_limit_offset(self.limit, self.offset);
        (buf.into_string(), args)
    }
}

/// 绑定记录类型的 DELETE：条件在 [`prepare`](Self::prepare) 时由目标记录求值。
pub struct TypedDeleteQuery<'a, T> {
    pub query: DeleteQuery,
    pub condition: Option<ConditionFn<T>>,
    pub target: Option<&'a T>,
}

impl<'a, T> TypedDeleteQuery<'a, T> {
    pub fn new() -> Self {
        Self {
            query: DeleteQuery::new(),
            condition: None,
            target: None,
        }
    }

    pub fn condition_fn(&mut self, f: impl Fn(&T) -> Condition + Send + Sync + 'static) -> &mut Self {
        self.condition = Some(Arc::new(f));
        self
    }

    pub fn target(&mut self, target: &'a T) -> &mut Self {
        self.target = Some(target);
        self
    }

    pub fn prepare(&self) -> DeleteQuery {
        let mut query = self.query.clone();
        if let (Some(target), Some(condition_fn)) = (self.target, &self.condition) {
            query.where_(condition_fn(target));
        }
        query
    }
}

impl<T> Default for TypedDeleteQuery<'_, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for TypedDeleteQuery<'_, T> {
    fn clone(&self) -> Self {
        Self {
            query: self.query.clone(),
            condition: self.condition.clone(),
            target: self.target,
        }
    }
}

impl<T> fmt::Debug for TypedDeleteQuery<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedDeleteQuery")
            .field("query", &self.query)
            .field("has_condition", &self.condition.is_some())
            .field("has_target", &self.target.is_some())
            .finish()
    }
}

impl<T> Deref for TypedDeleteQuery<'_, T> {
    type Target = DeleteQuery;
    fn deref(&self) -> &Self::Target {
        &self.query
    }
}

impl<T> DerefMut for TypedDeleteQuery<'_, T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.query
    }
}

impl<T> Builder for TypedDeleteQuery<'_, T> {
    fn render(&self) -> (String, Vec<SqlValue>) {
        self.prepare().render()
    }
}
