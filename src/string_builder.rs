//! 语句渲染用的字符串拼接工具。

use crate::condition::Condition;
use crate::value::SqlValue;
use std::fmt::{Display, Write as _};

#[derive(Debug, Default, Clone)]
pub(crate) struct StringBuilder {
    buf: String,
}

impl StringBuilder {
    pub(crate) fn new() -> Self {
        Self { buf: String::new() }
    }

    /// 写入 `s`；如果不是首次写入，会先写入一个空格。
    pub(crate) fn write_leading(&mut self, s: &str) {
        if !self.buf.is_empty() {
            self.buf.push(' ');
        }
        self.buf.push_str(s);
    }

    pub(crate) fn write_str(&mut self, s: &str) {
        self.buf.push_str(s);
    }

    pub(crate) fn write_char(&mut self, c: char) {
        self.buf.push(c);
    }

    /// 按 `sep` 拼接任意可 Display 的元素（列名、排序项等）。
    pub(crate) fn write_joined<I>(&mut self, items: I, sep: &str)
    where
        I: IntoIterator,
        I::Item: Display,
    {
        for (i, item) in items.into_iter().enumerate() {
            if i > 0 {
                self.buf.push_str(sep);
            }
            // 写入 String 不会失败
            let _ = write!(self.buf, "{item}");
        }
    }

    /// 写入 `n` 个 `?`，以 `, ` 分隔。
    pub(crate) fn write_placeholders(&mut self, n: usize) {
        for i in 0..n {
            if i > 0 {
                self.buf.push_str(", ");
            }
            self.buf.push('?');
        }
    }

    /// 条件渲染非空时写入 ` WHERE <cond>` 并追加参数；空条件不输出任何内容。
    pub(crate) fn write_where(&mut self, args: &mut Vec<SqlValue>, condition: Option<&Condition>) {
        let Some(cond) = condition else {
            return;
        };
        let (sql, cond_args) = cond.build();
        if sql.is_empty() {
            return;
        }
        self.buf.push_str(" WHERE ");
        self.buf.push_str(&sql);
        args.extend(cond_args);
    }

    /// 写入正数的 LIMIT/OFFSET；0 与负数视为未设置。
    pub(crate) fn write_limit_offset(&mut self, limit: i64, offset: i64) {
        if limit > 0 {
            let _ = write!(self.buf, " LIMIT {limit}");
        }
        if offset > 0 {
            let _ = write!(self.buf, " OFFSET {offset}");
        }
    }

    pub(crate) fn into_string(self) -> String {
        self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::StringBuilder;
    use pretty_assertions::assert_eq;

    #[test]
    fn write_leading_only_spaces_after_first() {
        let mut buf = StringBuilder::new();
        buf.write_leading("SELECT");
        buf.write_leading("1");
        assert_eq!(buf.into_string(), "SELECT 1");
    }

    #[test]
    fn limit_offset_skip_non_positive() {
        let mut buf = StringBuilder::new();
        buf.write_limit_offset(0, -3);
        assert_eq!(buf.into_string(), "");

        let mut buf = StringBuilder::new();
        buf.write_limit_offset(-1, 4);
        assert_eq!(buf.into_string(), " OFFSET 4");
    }

    #[test]
    fn placeholders_are_comma_separated() {
        let mut buf = StringBuilder::new();
        buf.write_placeholders(3);
        assert_eq!(buf.into_string(), "?, ?, ?");
    }
}
