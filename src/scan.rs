//! Scan：把一行里的 `SqlValue` 写入调用方提供的扫描目标。
//!
//! 扫描目标是 `&mut dyn ScanDest`，通常由记录的字段借用组成（见 [`crate::targets!`]），
//! 顺序必须与 SELECT 的列顺序一致；数量不一致在扫描时报错。

use crate::value::SqlValue;

/// 扫描/转换错误。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScanError {
    #[error("scan expected {expected} destinations, row has {got} columns")]
    ColumnCount { expected: usize, got: usize },
    #[error("cannot scan {got} into {expected}")]
    TypeMismatch {
        expected: &'static str,
        got: &'static str,
    },
    #[error("cannot scan NULL into {0}")]
    UnexpectedNull(&'static str),
    #[error("value out of range for {0}")]
    OutOfRange(&'static str),
}

/// 可被一列的值写入的目标。
pub trait ScanDest {
    fn scan_value(&mut self, value: &SqlValue) -> Result<(), ScanError>;
}

fn mismatch(expected: &'static str, value: &SqlValue) -> ScanError {
    if value.is_null() {
        ScanError::UnexpectedNull(expected)
    } else {
        ScanError::TypeMismatch {
            expected,
            got: value.kind(),
        }
    }
}

impl ScanDest for SqlValue {
    fn scan_value(&mut self, value: &SqlValue) -> Result<(), ScanError> {
        *self = value.clone();
        Ok(())
    }
}

impl ScanDest for String {
    fn scan_value(&mut self, value: &SqlValue) -> Result<(), ScanError> {
        match value {
            SqlValue::String(s) => {
                self.clear();
                self.push_str(s);
                Ok(())
            }
            other => Err(mismatch("String", other)),
        }
    }
}

macro_rules! scan_int {
    ($($t:ty),+ $(,)?) => {
        $(impl ScanDest for $t {
            fn scan_value(&mut self, value: &SqlValue) -> Result<(), ScanError> {
                *self = match value {
                    SqlValue::I64(v) => {
                        <$t>::try_from(*v).map_err(|_| ScanError::OutOfRange(stringify!($t)))?
                    }
                    SqlValue::U64(v) => {
                        <$t>::try_from(*v).map_err(|_| ScanError::OutOfRange(stringify!($t)))?
                    }
                    other => return Err(mismatch(stringify!($t), other)),
                };
                Ok(())
            }
        })+
    };
}

scan_int!(i32, i64, u32, u64);

impl ScanDest for f64 {
    fn scan_value(&mut self, value: &SqlValue) -> Result<(), ScanError> {
        *self = match value {
            SqlValue::F64(v) => *v,
            SqlValue::I64(v) => *v as f64,
            SqlValue::U64(v) => *v as f64,
            other => return Err(mismatch("f64", other)),
        };
        Ok(())
    }
}

impl ScanDest for bool {
    fn scan_value(&mut self, value: &SqlValue) -> Result<(), ScanError> {
        *self = match value {
            SqlValue::Bool(v) => *v,
            SqlValue::I64(0) | SqlValue::U64(0) => false,
            SqlValue::I64(1) | SqlValue::U64(1) => true,
            other => return Err(mismatch("bool", other)),
        };
        Ok(())
    }
}

impl ScanDest for Vec<u8> {
    fn scan_value(&mut self, value: &SqlValue) -> Result<(), ScanError> {
        *self = match value {
            SqlValue::Bytes(v) => v.clone(),
            SqlValue::String(s) => s.as_bytes().to_vec(),
            other => return Err(mismatch("Vec<u8>", other)),
        };
        Ok(())
    }
}

impl ScanDest for time::OffsetDateTime {
    fn scan_value(&mut self, value: &SqlValue) -> Result<(), ScanError> {
        match value {
            SqlValue::DateTime(v) => {
                *self = *v;
                Ok(())
            }
            other => Err(mismatch("OffsetDateTime", other)),
        }
    }
}

/// NULL 写入 `None`，其余值先扫描进 `T::default()` 再包成 `Some`。
impl<T: ScanDest + Default> ScanDest for Option<T> {
    fn scan_value(&mut self, value: &SqlValue) -> Result<(), ScanError> {
        if value.is_null() {
            *self = None;
            return Ok(());
        }
        let mut inner = T::default();
        inner.scan_value(value)?;
        *self = Some(inner);
        Ok(())
    }
}

/// 把一行的值按位置写入 `dests`；列数与目标数不一致时报错且不写入任何目标。
pub fn scan_values(values: &[SqlValue], dests: &mut [&mut dyn ScanDest]) -> Result<(), ScanError> {
    if values.len() != dests.len() {
        return Err(ScanError::ColumnCount {
            expected: dests.len(),
            got: values.len(),
        });
    }
    for (dest, value) in dests.iter_mut().zip(values) {
        dest.scan_value(value)?;
    }
    Ok(())
}
