//! SQL 参数值类型。

use std::borrow::Cow;

/// 绑定到占位符上的参数值，也是扫描时从行里读出的值。
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Bool(bool),
    I64(i64),
    U64(u64),
    F64(f64),
    String(Cow<'static, str>),
    Bytes(Vec<u8>),
    DateTime(time::OffsetDateTime),
}

impl SqlValue {
    /// 将 `Option<T>` 映射为 `SqlValue`：`None => Null`，`Some(v) => v.into()`。
    pub fn from_option<T: Into<SqlValue>>(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Self::Null,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// 值的种类名，用于扫描错误信息。
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "NULL",
            Self::Bool(_) => "bool",
            Self::I64(_) => "i64",
            Self::U64(_) => "u64",
            Self::F64(_) => "f64",
            Self::String(_) => "string",
            Self::Bytes(_) => "bytes",
            Self::DateTime(_) => "datetime",
        }
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(v: Option<T>) -> Self {
        Self::from_option(v)
    }
}

impl From<()> for SqlValue {
    fn from(_: ()) -> Self {
        Self::Null
    }
}

impl From<bool> for SqlValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

macro_rules! from_signed {
    ($($t:ty),+ $(,)?) => {
        $(impl From<$t> for SqlValue {
            fn from(v: $t) -> Self {
                Self::I64(v as i64)
            }
        })+
    };
}

macro_rules! from_unsigned {
    ($($t:ty),+ $(,)?) => {
        $(impl From<$t> for SqlValue {
            fn from(v: $t) -> Self {
                Self::U64(v as u64)
            }
        })+
    };
}

from_signed!(i8, i16, i32, i64);
from_unsigned!(u8, u16, u32, u64);

impl From<f32> for SqlValue {
    fn from(v: f32) -> Self {
        Self::F64(v as f64)
    }
}

impl From<f64> for SqlValue {
    fn from(v: f64) -> Self {
        Self::F64(v)
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        Self::String(Cow::Owned(v))
    }
}

impl From<&String> for SqlValue {
    fn from(v: &String) -> Self {
        Self::String(Cow::Owned(v.clone()))
    }
}

impl From<&'static str> for SqlValue {
    fn from(v: &'static str) -> Self {
        Self::String(Cow::Borrowed(v))
    }
}

impl From<Vec<u8>> for SqlValue {
    fn from(v: Vec<u8>) -> Self {
        Self::Bytes(v)
    }
}

impl From<time::OffsetDateTime> for SqlValue {
    fn from(v: time::OffsetDateTime) -> Self {
        Self::DateTime(v)
    }
}
