//! Hook：在语句执行前或记录扫描前后插入的可失败回调。
//!
//! 同一阶段的 hook 按注册顺序执行，第一个返回错误的 hook 会中止整个操作。

use crate::select::SelectQuery;
use crate::statement::Statement;
use crate::store::BoxError;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookStage {
    PreSelect,
    PreInsert,
    PreUpdate,
    PreDelete,
    PreScan,
    PostScan,
}

impl HookStage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PreSelect => "pre select",
            Self::PreInsert => "pre insert",
            Self::PreUpdate => "pre update",
            Self::PreDelete => "pre delete",
            Self::PreScan => "pre scan",
            Self::PostScan => "post scan",
        }
    }
}

impl fmt::Display for HookStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 执行前 hook：拿到已补齐默认值的语句。
pub type StatementHook = Arc<dyn Fn(&Statement) -> Result<(), BoxError> + Send + Sync>;

/// 扫描 hook：拿到本次查询与当前记录。
pub type ScanHook<T> = Arc<dyn Fn(&SelectQuery, &mut T) -> Result<(), BoxError> + Send + Sync>;

pub(crate) fn run_statement_hooks(
    hooks: &[StatementHook],
    statement: &Statement,
) -> Result<(), BoxError> {
    hooks.iter().try_for_each(|hook| hook(statement))
}

pub(crate) fn run_scan_hooks<T>(
    hooks: &[ScanHook<T>],
    query: &SelectQuery,
    record: &mut T,
) -> Result<(), BoxError> {
    hooks.iter().try_for_each(|hook| hook(query, record))
}
