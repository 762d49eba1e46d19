//! Repository 操作的错误类型。
//!
//! 每个错误都带着出错的阶段：hook 拒绝时语句从未发往存储，
//! `Prepare`/`Execute` 表示存储侧失败，`Scan` 表示语句已执行但结果无法映射。

use crate::hook::HookStage;
use crate::statement::StatementKind;
use crate::store::{BoxError, StoreError};

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{stage} hook failed: {source}")]
    Hook {
        stage: HookStage,
        #[source]
        source: BoxError,
    },
    #[error("could not prepare query: {0}")]
    Prepare(#[source] StoreError),
    #[error("could not execute query: {0}")]
    Execute(#[source] StoreError),
    #[error("could not scan row: {0}")]
    Scan(#[source] StoreError),
    /// 记录映射函数缺失（既没有单次覆盖，也没有默认值）。
    #[error("record binder has no {0} function")]
    Binder(&'static str),
    /// typed 写操作没有目标记录，语句不会发往存储。
    #[error("typed {0} has no target record")]
    NoTarget(StatementKind),
}

impl Error {
    pub(crate) fn hook(stage: HookStage, source: BoxError) -> Self {
        Self::Hook { stage, source }
    }

    /// 由 hook 引起时返回对应阶段。
    pub fn stage(&self) -> Option<HookStage> {
        match self {
            Self::Hook { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    /// QueryRow 没有拿到任何行。
    pub fn is_no_rows(&self) -> bool {
        matches!(
            self,
            Self::Execute(StoreError::NoRows) | Self::Scan(StoreError::NoRows)
        )
    }
}
