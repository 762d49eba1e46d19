//! Column：列名标识，以及有序的“列 -> 值”映射。

use crate::value::SqlValue;
use std::borrow::Cow;
use std::fmt;

/// 列名（不可变、按文本精确比较，可作为 map/set 的 key）。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Column(Cow<'static, str>);

impl Column {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Column {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for Column {
    fn from(v: &'static str) -> Self {
        Self(Cow::Borrowed(v))
    }
}

impl From<String> for Column {
    fn from(v: String) -> Self {
        Self(Cow::Owned(v))
    }
}

impl From<&Column> for Column {
    fn from(v: &Column) -> Self {
        v.clone()
    }
}

/// 有序的“列 -> 值”映射，用于 INSERT 的单行取值与 UPDATE 的 SET 子句。
///
/// 列的输出顺序就是首次 `set` 的顺序；对同一列重复 `set` 只会覆盖值，不会新增列。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnValues {
    entries: Vec<(Column, SqlValue)>,
}

impl ColumnValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, column: impl Into<Column>, value: impl Into<SqlValue>) -> &mut Self {
        let column = column.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(c, _)| *c == column) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((column, value)),
        }
        self
    }

    /// 链式版本的 `set`，便于在闭包里直接返回。
    pub fn with(mut self, column: impl Into<Column>, value: impl Into<SqlValue>) -> Self {
        self.set(column, value);
        self
    }

    pub fn get(&self, column: &Column) -> Option<&SqlValue> {
        self.entries
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, v)| v)
    }

    pub fn columns(&self) -> impl Iterator<Item = &Column> {
        self.entries.iter().map(|(c, _)| c)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Column, &SqlValue)> {
        self.entries.iter().map(|(c, v)| (c, v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<C, V> FromIterator<(C, V)> for ColumnValues
where
    C: Into<Column>,
    V: Into<SqlValue>,
{
    fn from_iter<I: IntoIterator<Item = (C, V)>>(iter: I) -> Self {
        let mut out = Self::new();
        for (c, v) in iter {
            out.set(c, v);
        }
        out
    }
}
