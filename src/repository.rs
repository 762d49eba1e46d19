//! Repository：把语句补齐默认值、跑 hook、渲染并交给 [`Store`] 执行。
//!
//! 每个操作都有两种写法：直接传入构建好的语句（`query`），或在回调里配置一个空语句（`query_with`）。
//! 配置在构建后不可变，默认值只在每次调用开头合并进语句副本。

use crate::column::Column;
use crate::delete::DeleteQuery;
use crate::error::{Error, Result};
use crate::flavor::Flavor;
use crate::hook::{HookStage, StatementHook, run_statement_hooks};
use crate::insert::InsertQuery;
use crate::select::SelectQuery;
use crate::statement::{Builder, Statement, StatementKind};
use crate::store::{BoxError, ExecResult, Row, Rows, StatementGuard, Store, StoreError};
use crate::trace::{LogFn, SpanGuard, Tracer};
use crate::update::UpdateQuery;
use crate::value::SqlValue;
use std::fmt;
use std::sync::Arc;

pub struct Repository<S> {
    store: S,
    table: String,
    select_columns: Option<Vec<Column>>,
    flavor: Option<Flavor>,
    log_fn: Option<LogFn>,
    tracer: Option<Arc<dyn Tracer>>,
    pre_select: Vec<StatementHook>,
    pre_insert: Vec<StatementHook>,
    pre_update: Vec<StatementHook>,
    pre_delete: Vec<StatementHook>,
}

impl<S: Store> Repository<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            table: String::new(),
            select_columns: None,
            flavor: None,
            log_fn: None,
            tracer: None,
            pre_select: Vec::new(),
            pre_insert: Vec::new(),
            pre_update: Vec::new(),
            pre_delete: Vec::new(),
        }
    }

    /// 语句未指定表名时使用的默认表。
    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    /// SELECT 未指定列时使用的默认列。
    pub fn select_columns(mut self, columns: impl IntoIterator<Item = impl Into<Column>>) -> Self {
        self.select_columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// 占位符方言；`None` 表示跟随全局默认值。
    pub fn flavor(mut self, flavor: Option<Flavor>) -> Self {
        self.flavor = flavor;
        self
    }

    pub fn log_fn(mut self, f: impl Fn(&str, &[SqlValue]) + Send + Sync + 'static) -> Self {
        self.log_fn = Some(Arc::new(f));
        self
    }

    pub fn tracer(mut self, tracer: impl Tracer + 'static) -> Self {
        self.tracer = Some(Arc::new(tracer));
        self
    }

    pub fn pre_select(
        mut self,
        hook: impl Fn(&Statement) -> Result<(), BoxError> + Send + Sync + 'static,
    ) -> Self {
        self.pre_select.push(Arc::new(hook));
        self
    }

    pub fn pre_insert(
        mut self,
        hook: impl Fn(&Statement) -> Result<(), BoxError> + Send + Sync + 'static,
    ) -> Self {
        self.pre_insert.push(Arc::new(hook));
        self
    }

    pub fn pre_update(
        mut self,
        hook: impl Fn(&Statement) -> Result<(), BoxError> + Send + Sync + 'static,
    ) -> Self {
        self.pre_update.push(Arc::new(hook));
        self
    }

    pub fn pre_delete(
        mut self,
        hook: impl Fn(&Statement) -> Result<(), BoxError> + Send + Sync + 'static,
    ) -> Self {
        self.pre_delete.push(Arc::new(hook));
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn default_table(&self) -> &str {
        &self.table
    }

    pub fn default_columns(&self) -> Option<&[Column]> {
        self.select_columns.as_deref()
    }

    pub(crate) fn tracer_ref(&self) -> Option<&dyn Tracer> {
        self.tracer.as_deref()
    }

    pub(crate) fn select_defaults(&self, mut query: SelectQuery) -> SelectQuery {
        if query.table.is_empty() {
            query.table = self.table.clone();
        }
        if query.columns.is_none() {
            query.columns = self.select_columns.clone();
        }
        query
    }

    pub(crate) fn insert_defaults(&self, mut query: InsertQuery) -> InsertQuery {
        if query.table.is_empty() {
            query.table = self.table.clone();
        }
        query
    }

    pub(crate) fn update_defaults(&self, mut query: UpdateQuery) -> UpdateQuery {
        if query.table.is_empty() {
            query.table = self.table.clone();
        }
        query
    }

    pub(crate) fn delete_defaults(&self, mut query: DeleteQuery) -> DeleteQuery {
        if query.table.is_empty() {
            query.table = self.table.clone();
        }
        query
    }

    /// 多行查询。返回的游标由调用方负责 `close`。
    pub fn query(&self, query: SelectQuery) -> Result<Box<dyn Rows>> {
        let _span = SpanGuard::start(self.tracer_ref(), "query");
        let statement = Statement::Select(self.select_defaults(query));
        self.check(&statement)?;
        self.exec_query(&statement)
    }

    pub fn query_with(&self, f: impl FnOnce(&mut SelectQuery)) -> Result<Box<dyn Rows>> {
        let _span = SpanGuard::start(self.tracer_ref(), "query_with");
        let mut query = SelectQuery::new();
        f(&mut query);
        self.query(query)
    }

    /// 单行查询；没有结果时返回 `Error::Execute(StoreError::NoRows)`。
    pub fn query_row(&self, query: SelectQuery) -> Result<Box<dyn Row>> {
        let _span = SpanGuard::start(self.tracer_ref(), "query_row");
        let statement = Statement::Select(self.select_defaults(query));
        self.check(&statement)?;
        self.exec_query_row(&statement)
    }

    pub fn query_row_with(&self, f: impl FnOnce(&mut SelectQuery)) -> Result<Box<dyn Row>> {
        let _span = SpanGuard::start(self.tracer_ref(), "query_row_with");
        let mut query = SelectQuery::new();
        f(&mut query);
        self.query_row(query)
    }

    pub fn insert(&self, query: InsertQuery) -> Result<ExecResult> {
        let _span = SpanGuard::start(self.tracer_ref(), "insert");
        let statement = Statement::Insert(self.insert_defaults(query));
        self.check(&statement)?;
        self.exec(&statement)
    }

    pub fn insert_with(&self, f: impl FnOnce(&mut InsertQuery)) -> Result<ExecResult> {
        let _span = SpanGuard::start(self.tracer_ref(), "insert_with");
        let mut query = InsertQuery::new();
        f(&mut query);
        self.insert(query)
    }

    pub fn update(&self, query: UpdateQuery) -> Result<ExecResult> {
        let _span = SpanGuard::start(self.tracer_ref(), "update");
        let statement = Statement::Update(self.update_defaults(query));
        self.check(&statement)?;
        self.exec(&statement)
    }

    pub fn update_with(&self, f: impl FnOnce(&mut UpdateQuery)) -> Result<ExecResult> {
        let _span = SpanGuard::start(self.tracer_ref(), "update_with");
        let mut query = UpdateQuery::new();
        f(&mut query);
        self.update(query)
    }

    pub fn delete(&self, query: DeleteQuery) -> Result<ExecResult> {
        let _span = SpanGuard::start(self.tracer_ref(), "delete");
        let statement = Statement::Delete(self.delete_defaults(query));
        self.check(&statement)?;
        self.exec(&statement)
    }

    pub fn delete_with(&self, f: impl FnOnce(&mut DeleteQuery)) -> Result<ExecResult> {
        let _span = SpanGuard::start(self.tracer_ref(), "delete_with");
        let mut query = DeleteQuery::new();
        f(&mut query);
        self.delete(query)
    }

    /// 底层执行：不补默认值、不跑 hook，直接渲染并执行。
    pub fn exec(&self, statement: &Statement) -> Result<ExecResult> {
        let mut span = SpanGuard::start(self.tracer_ref(), "exec");
        let (sql, args) = self.render(statement, &mut span);
        let mut stmt = self.prepare(&sql)?;
        stmt.get_mut().execute(&args).map_err(Error::Execute)
    }

    fn exec_query(&self, statement: &Statement) -> Result<Box<dyn Rows>> {
        let mut span = SpanGuard::start(self.tracer_ref(), "exec_query");
        let (sql, args) = self.render(statement, &mut span);
        let mut stmt = self.prepare(&sql)?;
        stmt.get_mut().query(&args).map_err(Error::Execute)
    }

    fn exec_query_row(&self, statement: &Statement) -> Result<Box<dyn Row>> {
        let mut span = SpanGuard::start(self.tracer_ref(), "exec_query_row");
        let (sql, args) = self.render(statement, &mut span);
        let mut stmt = self.prepare(&sql)?;
        stmt.get_mut()
            .query_row(&args)
            .map_err(Error::Execute)?
            .ok_or(Error::Execute(StoreError::NoRows))
    }

    /// 按语句种类跑对应的 pre-action hook。
    fn check(&self, statement: &Statement) -> Result<()> {
        let (stage, hooks) = match statement.kind() {
            StatementKind::Select => (HookStage::PreSelect, &self.pre_select),
            StatementKind::Insert => (HookStage::PreInsert, &self.pre_insert),
            StatementKind::Update => (HookStage::PreUpdate, &self.pre_update),
            StatementKind::Delete => (HookStage::PreDelete, &self.pre_delete),
        };
        run_statement_hooks(hooks, statement).map_err(|source| {
            tracing::debug!(
                target: "halo_space::sql",
                stage = %stage,
                table = statement.table(),
                error = %source,
                "hook rejected statement"
            );
            Error::hook(stage, source)
        })
    }

    fn render(&self, statement: &Statement, span: &mut SpanGuard) -> (String, Vec<SqlValue>) {
        let (sql, args) = match self.flavor {
            Some(flavor) => statement.build_with_flavor(flavor),
            None => statement.build(),
        };
        tracing::debug!(
            target: "halo_space::sql",
            kind = %statement.kind(),
            sql = %sql,
            args = args.len(),
            "executing statement"
        );
        if let Some(log) = &self.log_fn {
            log(&sql, &args);
        }
        span.set_attribute("query", &sql);
        (sql, args)
    }

    fn prepare(&self, sql: &str) -> Result<StatementGuard> {
        self.store
            .prepare(sql)
            .map(StatementGuard::new)
            .map_err(Error::Prepare)
    }
}

impl<S> fmt::Debug for Repository<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Repository")
            .field("table", &self.table)
            .field("select_columns", &self.select_columns)
            .field("flavor", &self.flavor)
            .field("has_log_fn", &self.log_fn.is_some())
            .field("has_tracer", &self.tracer.is_some())
            .field("pre_select", &self.pre_select.len())
            .field("pre_insert", &self.pre_insert.len())
            .field("pre_update", &self.pre_update.len())
            .field("pre_delete", &self.pre_delete.len())
            .finish()
    }
}
