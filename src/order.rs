//! ORDER BY 排序项。

use crate::column::Column;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Ascending,
    Descending,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 一个排序项，渲染为 `"<column> <direction>"`。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub column: Column,
    pub direction: Direction,
}

impl OrderBy {
    pub fn new(column: impl Into<Column>, direction: Direction) -> Self {
        Self {
            column: column.into(),
            direction,
        }
    }

    pub fn asc(column: impl Into<Column>) -> Self {
        Self::new(column, Direction::Ascending)
    }

    pub fn desc(column: impl Into<Column>) -> Self {
        Self::new(column, Direction::Descending)
    }
}

impl fmt::Display for OrderBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.column, self.direction)
    }
}
