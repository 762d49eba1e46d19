//! 存储边界：Repository 只依赖这里的 trait，不依赖任何具体驱动。
//!
//! 调用顺序固定为 `prepare` -> `execute`/`query`/`query_row` -> `close`；
//! Repository 保证每一个成功 prepare 的语句在所有退出路径上都会被 `close`。

use crate::scan::{ScanDest, ScanError};
use crate::value::SqlValue;
use std::sync::Arc;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// 期望一行却没有任何结果。
    #[error("no rows in result set")]
    NoRows,
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error("{0}")]
    Driver(#[source] BoxError),
}

impl StoreError {
    pub fn driver(err: impl Into<BoxError>) -> Self {
        Self::Driver(err.into())
    }
}

/// 写语句的执行结果。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecResult {
    pub rows_affected: u64,
    pub last_insert_id: Option<i64>,
}

pub trait Store {
    fn prepare(&self, sql: &str) -> Result<Box<dyn PreparedStatement>, StoreError>;
}

impl<S: Store + ?Sized> Store for &S {
    fn prepare(&self, sql: &str) -> Result<Box<dyn PreparedStatement>, StoreError> {
        (**self).prepare(sql)
    }
}

impl<S: Store + ?Sized> Store for Arc<S> {
    fn prepare(&self, sql: &str) -> Result<Box<dyn PreparedStatement>, StoreError> {
        (**self).prepare(sql)
    }
}

pub trait PreparedStatement {
    fn execute(&mut self, args: &[SqlValue]) -> Result<ExecResult, StoreError>;

    /// 返回的游标独立于语句句柄，语句关闭后仍可继续读取。
    fn query(&mut self, args: &[SqlValue]) -> Result<Box<dyn Rows>, StoreError>;

    /// 最多一行；没有结果时返回 `Ok(None)`。
    fn query_row(&mut self, args: &[SqlValue]) -> Result<Option<Box<dyn Row>>, StoreError>;

    fn close(&mut self);
}

pub trait Row {
    /// 按列顺序写入 `dests`。
    fn scan(&mut self, dests: &mut [&mut dyn ScanDest]) -> Result<(), StoreError>;
}

/// 多行游标；`scan` 读取的是最近一次 `next` 返回 `true` 时所在的行。
pub trait Rows: Row {
    fn next(&mut self) -> Result<bool, StoreError>;

    fn close(&mut self);
}

/// 持有已 prepare 的语句，离开作用域时关闭它。
pub(crate) struct StatementGuard {
    stmt: Box<dyn PreparedStatement>,
}

impl StatementGuard {
    pub(crate) fn new(stmt: Box<dyn PreparedStatement>) -> Self {
        Self { stmt }
    }

    pub(crate) fn get_mut(&mut self) -> &mut dyn PreparedStatement {
        self.stmt.as_mut()
    }
}

impl Drop for StatementGuard {
    fn drop(&mut self) {
        self.stmt.close();
    }
}

/// 持有多行游标，离开作用域时关闭它。
pub(crate) struct RowsGuard {
    rows: Box<dyn Rows>,
}

impl RowsGuard {
    pub(crate) fn new(rows: Box<dyn Rows>) -> Self {
        Self { rows }
    }

    pub(crate) fn get_mut(&mut self) -> &mut dyn Rows {
        self.rows.as_mut()
    }
}

impl Drop for RowsGuard {
    fn drop(&mut self) {
        self.rows.close();
    }
}
