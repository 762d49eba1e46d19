//! TypedRepository：在 Repository 之上按 [`RecordBinder`] 完成记录与行之间的映射。
//!
//! 读操作为每一行新建一个 `T::default()`，依次执行 pre-scan hook、按扫描目标写入字段、
//! 执行 post-scan hook；任意一行失败，整个调用只返回该错误。
//! 写操作用绑定函数把记录展开成普通语句，再交给内部的 Repository（它的 pre-action hook 照常执行）。

use crate::binder::{RecordBinder, SelectTargetsFn};
use crate::delete::TypedDeleteQuery;
use crate::error::{Error, Result};
use crate::hook::{HookStage, ScanHook, run_scan_hooks};
use crate::insert::TypedInsertQuery;
use crate::repository::Repository;
use crate::select::{SelectQuery, TypedSelectQuery};
use crate::statement::StatementKind;
use crate::store::{BoxError, ExecResult, Row, RowsGuard, Store};
use crate::trace::SpanGuard;
use crate::update::TypedUpdateQuery;
use std::fmt;
use std::sync::Arc;

pub struct TypedRepository<T, S> {
    repo: Repository<S>,
    binder: RecordBinder<T>,
    pre_scan: Vec<ScanHook<T>>,
    post_scan: Vec<ScanHook<T>>,
}

impl<T: Default, S: Store> TypedRepository<T, S> {
    pub fn new(repo: Repository<S>, binder: RecordBinder<T>) -> Self {
        Self {
            repo,
            binder,
            pre_scan: Vec::new(),
            post_scan: Vec::new(),
        }
    }

    /// 在字段写入之前对新建记录执行。
    pub fn pre_scan(
        mut self,
        hook: impl Fn(&SelectQuery, &mut T) -> Result<(), BoxError> + Send + Sync + 'static,
    ) -> Self {
        self.pre_scan.push(Arc::new(hook));
        self
    }

    /// 在字段写入之后对记录执行。
    pub fn post_scan(
        mut self,
        hook: impl Fn(&SelectQuery, &mut T) -> Result<(), BoxError> + Send + Sync + 'static,
    ) -> Self {
        self.post_scan.push(Arc::new(hook));
        self
    }

    pub fn repository(&self) -> &Repository<S> {
        &self.repo
    }

    pub fn binder(&self) -> &RecordBinder<T> {
        &self.binder
    }

    pub fn select_query(&self) -> TypedSelectQuery<T> {
        TypedSelectQuery::new()
    }

    pub fn insert_query<'a>(&self) -> TypedInsertQuery<'a, T> {
        TypedInsertQuery::new()
    }

    pub fn update_query<'a>(&self) -> TypedUpdateQuery<'a, T> {
        TypedUpdateQuery::new()
    }

    pub fn delete_query<'a>(&self) -> TypedDeleteQuery<'a, T> {
        TypedDeleteQuery::new()
    }

    pub fn query(&self, query: TypedSelectQuery<T>) -> Result<Vec<T>> {
        let _span = SpanGuard::start(self.repo.tracer_ref(), "typed_query");
        let targets = self.select_targets(&query)?;
        let select = self.repo.select_defaults(query.prepare());

        let mut rows = RowsGuard::new(self.repo.query(select.clone())?);
        let mut records = Vec::new();
        while rows.get_mut().next().map_err(Error::Execute)? {
            records.push(self.scan_with(&select, &targets, rows.get_mut())?);
        }
        Ok(records)
    }

    pub fn query_with(&self, f: impl FnOnce(&mut TypedSelectQuery<T>)) -> Result<Vec<T>> {
        let _span = SpanGuard::start(self.repo.tracer_ref(), "typed_query_with");
        let mut query = self.select_query();
        f(&mut query);
        self.query(query)
    }

    /// 单条记录；没有结果时返回 `Error::Execute(StoreError::NoRows)`。
    pub fn query_row(&self, query: TypedSelectQuery<T>) -> Result<T> {
        let _span = SpanGuard::start(self.repo.tracer_ref(), "typed_query_row");
        let targets = self.select_targets(&query)?;
        let select = self.repo.select_defaults(query.prepare());

        let mut row = self.repo.query_row(select.clone())?;
        self.scan_with(&select, &targets, row.as_mut())
    }

    pub fn query_row_with(&self, f: impl FnOnce(&mut TypedSelectQuery<T>)) -> Result<T> {
        let _span = SpanGuard::start(self.repo.tracer_ref(), "typed_query_row_with");
        let mut query = self.select_query();
        f(&mut query);
        self.query_row(query)
    }

    /// 没有目标记录时返回 [`Error::NoTarget`]，不会访问存储。
    pub fn insert(&self, mut query: TypedInsertQuery<'_, T>) -> Result<ExecResult> {
        let _span = SpanGuard::start(self.repo.tracer_ref(), "typed_insert");
        if query.targets.is_empty() {
            return Err(Error::NoTarget(StatementKind::Insert));
        }
        if query.values.is_none() {
            query.values = Some(
                self.binder
                    .insert_values
                    .clone()
                    .ok_or(Error::Binder("insert_values"))?,
            );
        }
        self.repo.insert(query.prepare())
    }

    pub fn insert_with<'a>(&self, f: impl FnOnce(&mut TypedInsertQuery<'a, T>)) -> Result<ExecResult>
    where
        T: 'a,
    {
        let _span = SpanGuard::start(self.repo.tracer_ref(), "typed_insert_with");
        let mut query = self.insert_query();
        f(&mut query);
        self.insert(query)
    }

    pub fn update(&self, mut query: TypedUpdateQuery<'_, T>) -> Result<ExecResult> {
        let _span = SpanGuard::start(self.repo.tracer_ref(), "typed_update");
        if query.target.is_none() {
            return Err(Error::NoTarget(StatementKind::Update));
        }
        if query.values.is_none() {
            query.values = Some(
                self.binder
                    .update_values
                    .clone()
                    .ok_or(Error::Binder("update_values"))?,
            );
        }
        if query.condition.is_none() {
            query.condition = Some(
                self.binder
                    .update_condition
                    .clone()
                    .ok_or(Error::Binder("update_condition"))?,
            );
        }
        self.repo.update(query.prepare())
    }

    pub fn update_with<'a>(&self, f: impl FnOnce(&mut TypedUpdateQuery<'a, T>)) -> Result<ExecResult>
    where
        T: 'a,
    {
        let _span = SpanGuard::start(self.repo.tracer_ref(), "typed_update_with");
        let mut query = self.update_query();
        f(&mut query);
        self.update(query)
    }

    /// 条件默认取 `delete_condition`，未配置时退回 `update_condition`。
    /// 没有目标记录时返回 [`Error::NoTarget`]，不会发出无条件的 DELETE。
    pub fn delete(&self, mut query: TypedDeleteQuery<'_, T>) -> Result<ExecResult> {
        let _span = SpanGuard::start(self.repo.tracer_ref(), "typed_delete");
        if query.target.is_none() {
            return Err(Error::NoTarget(StatementKind::Delete));
        }
        if query.condition.is_none() {
            query.condition = Some(
                self.binder
                    .delete_condition
                    .clone()
                    .or_else(|| self.binder.update_condition.clone())
                    .ok_or(Error::Binder("delete_condition"))?,
            );
        }
        self.repo.delete(query.prepare())
    }

    pub fn delete_with<'a>(&self, f: impl FnOnce(&mut TypedDeleteQuery<'a, T>)) -> Result<ExecResult>
    where
        T: 'a,
    {
        let _span = SpanGuard::start(self.repo.tracer_ref(), "typed_delete_with");
        let mut query = self.delete_query();
        f(&mut query);
        self.delete(query)
    }

    /// 用默认扫描目标把任意一行映射成记录，scan hook 照常执行。
    pub fn scan_row<R: Row + ?Sized>(&self, query: &SelectQuery, row: &mut R) -> Result<T> {
        let targets = self
            .binder
            .select_targets
            .clone()
            .ok_or(Error::Binder("select_targets"))?;
        self.scan_with(query, &targets, row)
    }

    fn select_targets(&self, query: &TypedSelectQuery<T>) -> Result<SelectTargetsFn<T>> {
        query
            .targets
            .clone()
            .or_else(|| self.binder.select_targets.clone())
            .ok_or(Error::Binder("select_targets"))
    }

    fn scan_with<R: Row + ?Sized>(
        &self,
        query: &SelectQuery,
        targets: &SelectTargetsFn<T>,
        row: &mut R,
    ) -> Result<T> {
        let mut record = T::default();
        run_scan_hooks(&self.pre_scan, query, &mut record)
            .map_err(|source| Error::hook(HookStage::PreScan, source))?;

        let mut dests = targets(&mut record);
        row.scan(&mut dests).map_err(Error::Scan)?;
        drop(dests);

        run_scan_hooks(&self.post_scan, query, &mut record)
            .map_err(|source| Error::hook(HookStage::PostScan, source))?;
        Ok(record)
    }
}

impl<T, S> fmt::Debug for TypedRepository<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedRepository")
            .field("repo", &self.repo)
            .field("binder", &self.binder)
            .field("pre_scan", &self.pre_scan.len())
            .field("post_scan", &self.post_scan.len())
            .finish()
    }
}
