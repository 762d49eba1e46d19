//! 测试用的脚本化 Store：记录每一次 prepare/execute/close，并回放预设的行。

use crate::scan::{ScanDest, scan_values};
use crate::store::{
    BoxError, ExecResult, PreparedStatement, Row, Rows, Store, StoreError,
};
use crate::value::SqlValue;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    Prepare(String),
    Execute(Vec<SqlValue>),
    Query(Vec<SqlValue>),
    QueryRow(Vec<SqlValue>),
    CloseStatement,
    CloseRows,
}

#[derive(Debug, Default)]
struct State {
    calls: Vec<Call>,
    rows: Vec<Vec<SqlValue>>,
    exec_result: ExecResult,
    fail_prepare: Option<String>,
    fail_execute: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct TestStore {
    state: Arc<Mutex<State>>,
}

impl TestStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_rows(self, rows: Vec<Vec<SqlValue>>) -> Self {
        self.state.lock().unwrap().rows = rows;
        self
    }

    pub(crate) fn with_exec_result(self, result: ExecResult) -> Self {
        self.state.lock().unwrap().exec_result = result;
        self
    }

    pub(crate) fn fail_prepare(self, msg: &str) -> Self {
        self.state.lock().unwrap().fail_prepare = Some(msg.to_string());
        self
    }

    pub(crate) fn fail_execute(self, msg: &str) -> Self {
        self.state.lock().unwrap().fail_execute = Some(msg.to_string());
        self
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub(crate) fn prepared(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Prepare(sql) => Some(sql),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.state.lock().unwrap().calls.push(call);
    }

    fn execute_error(&self) -> Option<StoreError> {
        let msg = self.state.lock().unwrap().fail_execute.clone()?;
        Some(StoreError::Driver(BoxError::from(msg)))
    }
}

impl Store for TestStore {
    fn prepare(&self, sql: &str) -> Result<Box<dyn PreparedStatement>, StoreError> {
        self.record(Call::Prepare(sql.to_string()));
        if let Some(msg) = self.state.lock().unwrap().fail_prepare.clone() {
            return Err(StoreError::driver(msg));
        }
        Ok(Box::new(TestStatement {
            store: self.clone(),
        }))
    }
}

struct TestStatement {
    store: TestStore,
}

impl PreparedStatement for TestStatement {
    fn execute(&mut self, args: &[SqlValue]) -> Result<ExecResult, StoreError> {
        self.store.record(Call::Execute(args.to_vec()));
        match self.store.execute_error() {
            Some(err) => Err(err),
            None => Ok(self.store.state.lock().unwrap().exec_result),
        }
    }

    fn query(&mut self, args: &[SqlValue]) -> Result<Box<dyn Rows>, StoreError> {
        self.store.record(Call::Query(args.to_vec()));
        if let Some(err) = self.store.execute_error() {
            return Err(err);
        }
        let rows = self.store.state.lock().unwrap().rows.clone();
        Ok(Box::new(TestRows {
            store: self.store.clone(),
            pending: rows.into(),
            current: None,
        }))
    }

    fn query_row(&mut self, args: &[SqlValue]) -> Result<Option<Box<dyn Row>>, StoreError> {
        self.store.record(Call::QueryRow(args.to_vec()));
        if let Some(err) = self.store.execute_error() {
            return Err(err);
        }
        let first = self.store.state.lock().unwrap().rows.first().cloned();
        Ok(first.map(|values| Box::new(TestRow { values }) as Box<dyn Row>))
    }

    fn close(&mut self) {
        self.store.record(Call::CloseStatement);
    }
}

struct TestRow {
    values: Vec<SqlValue>,
}

impl Row for TestRow {
    fn scan(&mut self, dests: &mut [&mut dyn ScanDest]) -> Result<(), StoreError> {
        Ok(scan_values(&self.values, dests)?)
    }
}

struct TestRows {
    store: TestStore,
    pending: VecDeque<Vec<SqlValue>>,
    current: Option<Vec<SqlValue>>,
}

impl Row for TestRows {
    fn scan(&mut self, dests: &mut [&mut dyn ScanDest]) -> Result<(), StoreError> {
        let values = self.current.as_deref().ok_or(StoreError::NoRows)?;
        Ok(scan_values(values, dests)?)
    }
}

impl Rows for TestRows {
    fn next(&mut self) -> Result<bool, StoreError> {
        self.current = self.pending.pop_front();
        Ok(self.current.is_some())
    }

    fn close(&mut self) {
        self.store.record(Call::CloseRows);
    }
}
