//! halo-sql-repo：可组合的 SQL 语句构建与带记录映射的 Repository。
//!
//! 语句（SELECT/INSERT/UPDATE/DELETE）与条件树都是普通值，渲染为 `?` 占位的 SQL 与按位置对齐的参数；
//! [`Repository`] 负责补齐默认值、执行 hook 并交给 [`Store`]，[`TypedRepository`] 再按
//! [`RecordBinder`] 完成记录与行之间的映射。

pub mod binder;
pub mod column;
pub mod condition;
pub mod delete;
pub mod error;
pub mod flavor;
pub mod hook;
pub mod insert;
pub mod macros;
pub use crate::macros::*;
pub mod order;
pub mod repository;
pub mod scan;
pub mod select;
#[cfg(test)]
mod select_tests;
pub mod statement;
pub mod store;
mod string_builder;
#[cfg(test)]
mod test_store;
pub mod trace;
pub mod typed_repository;
#[cfg(test)]
mod typed_repository_tests;
pub mod update;
#[cfg(test)]
mod update_delete_tests;
pub mod value;

pub use crate::binder::{ConditionFn, RecordBinder, SelectTargetsFn, ValuesFn};
pub use crate::column::{Column, ColumnValues};
pub use crate::condition::{
    Condition, Operator, and, equal, greater_equal_than, greater_than, in_list, is_not_null,
    is_null, json_array_contains, less_equal_than, less_than, like, not_equal, not_in_list,
    not_json_array_contains, not_like, or, raw,
};
pub use crate::delete::{DeleteQuery, TypedDeleteQuery};
pub use crate::error::{Error, Result};
pub use crate::flavor::{Flavor, default_flavor, set_default_flavor, set_default_flavor_scoped};
pub use crate::hook::{HookStage, ScanHook, StatementHook};
pub use crate::insert::{InsertQuery, TypedInsertQuery};
pub use crate::order::{Direction, OrderBy};
pub use crate::repository::Repository;
pub use crate::scan::{ScanDest, ScanError, scan_values};
pub use crate::select::{Join, JoinKind, SelectQuery, TypedSelectQuery};
pub use crate::statement::{Builder, Statement, StatementKind};
pub use crate::store::{BoxError, ExecResult, PreparedStatement, Row, Rows, Store, StoreError};
pub use crate::trace::{LogFn, TraceSpan, Tracer, TracingTracer};
pub use crate::typed_repository::TypedRepository;
pub use crate::update::{TypedUpdateQuery, UpdateQuery};
pub use crate::value::SqlValue;

/// 便捷命名空间：允许 `use halo_space::sqlrepo::{...}` 形式导入。
pub mod sqlrepo {
    pub use crate::*;
}
