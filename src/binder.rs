//! RecordBinder：记录类型 `T` 与列/值/扫描目标之间的映射函数集合。
//!
//! 没有反射，也没有派生宏：映射逻辑完全由调用方以普通闭包提供，
//! TypedRepository 把它当作默认值，单条 typed 语句可以覆盖其中任意一个。

use crate::column::ColumnValues;
use crate::condition::Condition;
use crate::scan::ScanDest;
use std::fmt;
use std::sync::Arc;

/// 给出一条记录的扫描目标，顺序与 SELECT 列一致。
pub type SelectTargetsFn<T> =
    Arc<dyn for<'r> Fn(&'r mut T) -> Vec<&'r mut dyn ScanDest> + Send + Sync>;

/// 给出一条记录的“列 -> 值”。
pub type ValuesFn<T> = Arc<dyn Fn(&T) -> ColumnValues + Send + Sync>;

/// 给出定位一条记录的条件。
pub type ConditionFn<T> = Arc<dyn Fn(&T) -> Condition + Send + Sync>;

pub struct RecordBinder<T> {
    pub select_targets: Option<SelectTargetsFn<T>>,
    pub insert_values: Option<ValuesFn<T>>,
    pub update_values: Option<ValuesFn<T>>,
    pub update_condition: Option<ConditionFn<T>>,
    pub delete_condition: Option<ConditionFn<T>>,
}

impl<T> RecordBinder<T> {
    pub fn new() -> Self {
        Self {
            select_targets: None,
            insert_values: None,
            update_values: None,
            update_condition: None,
            delete_condition: None,
        }
    }

    pub fn select_targets<F>(mut self, f: F) -> Self
    where
        F: for<'r> Fn(&'r mut T) -> Vec<&'r mut dyn ScanDest> + Send + Sync + 'static,
    {
        self.select_targets = Some(Arc::new(f));
        self
    }

    pub fn insert_values(mut self, f: impl Fn(&T) -> ColumnValues + Send + Sync + 'static) -> Self {
        self.insert_values = Some(Arc::new(f));
        self
    }

    pub fn update_values(mut self, f: impl Fn(&T) -> ColumnValues + Send + Sync + 'static) -> Self {
        self.update_values = Some(Arc::new(f));
        self
    }

    pub fn update_condition(
        mut self,
        f: impl Fn(&T) -> Condition + Send + Sync + 'static,
    ) -> Self {
        self.update_condition = Some(Arc::new(f));
        self
    }

    pub fn delete_condition(
        mut self,
        f: impl Fn(&T) -> Condition + Send + Sync + 'static,
    ) -> Self {
        self.delete_condition = Some(Arc::new(f));
        self
    }
}

impl<T> Default for RecordBinder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for RecordBinder<T> {
    fn clone(&self) -> Self {
        Self {
            select_targets: self.select_targets.clone(),
            insert_values: self.insert_values.clone(),
            update_values: self.update_values.clone(),
            update_condition: self.update_condition.clone(),
            delete_condition: self.delete_condition.clone(),
        }
    }
}

impl<T> fmt::Debug for RecordBinder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordBinder")
            .field("has_select_targets", &self.select_targets.is_some())
            .field("has_insert_values", &self.insert_values.is_some())
            .field("has_update_values", &self.update_values.is_some())
            .field("has_update_condition", &self.update_condition.is_some())
            .field("has_delete_condition", &self.delete_condition.is_some())
            .finish()
    }
}
