//! SQL Flavor：只控制占位符的写法（`?` / `$n` / `@pN`）。
//!
//! 所有条件与语句先统一渲染成 `?` 占位，再由 [`Flavor::rewrite_placeholders`] 按方言改写；
//! 单引号字符串字面量内部的 `?` 不会被改写。

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Flavor {
    #[default]
    MySQL,
    PostgreSQL,
    SQLite,
    SQLServer,
}

static DEFAULT_FLAVOR: AtomicU8 = AtomicU8::new(Flavor::MySQL as u8);
static DEFAULT_FLAVOR_LOCK: Mutex<()> = Mutex::new(());

impl Flavor {
    fn from_u8(v: u8) -> Self {
        match v {
            1 => Self::PostgreSQL,
            2 => Self::SQLite,
            3 => Self::SQLServer,
            _ => Self::MySQL,
        }
    }

    fn to_u8(self) -> u8 {
        self as u8
    }

    /// 把 `?` 占位符改写为当前方言的写法（编号从 1 开始）。
    pub fn rewrite_placeholders(self, sql: &str) -> String {
        match self {
            Self::MySQL | Self::SQLite => sql.to_string(),
            Self::PostgreSQL | Self::SQLServer => {
                let mut out = String::with_capacity(sql.len() + 8);
                let mut n = 0usize;
                let mut in_quote = false;
                for c in sql.chars() {
                    match c {
                        '\'' => {
                            in_quote = !in_quote;
                            out.push(c);
                        }
                        '?' if !in_quote => {
                            n += 1;
                            if self == Self::PostgreSQL {
                                out.push('$');
                            } else {
                                out.push_str("@p");
                            }
                            out.push_str(&n.to_string());
                        }
                        _ => out.push(c),
                    }
                }
                out
            }
        }
    }
}

/// 获取当前全局默认 Flavor。
pub fn default_flavor() -> Flavor {
    Flavor::from_u8(DEFAULT_FLAVOR.load(Ordering::Relaxed))
}

/// 设置全局默认 Flavor，返回旧值。
pub fn set_default_flavor(flavor: Flavor) -> Flavor {
    let old = DEFAULT_FLAVOR.swap(flavor.to_u8(), Ordering::Relaxed);
    Flavor::from_u8(old)
}

/// 修改全局默认 Flavor 的 RAII guard（会持有一个全局锁，避免并行测试互相干扰）。
pub struct DefaultFlavorGuard {
    _lock: MutexGuard<'static, ()>,
    old: Flavor,
}

impl Drop for DefaultFlavorGuard {
    fn drop(&mut self) {
        set_default_flavor(self.old);
    }
}

/// 在一个作用域内临时设置默认 Flavor，并保证退出作用域后自动恢复。
pub fn set_default_flavor_scoped(flavor: Flavor) -> DefaultFlavorGuard {
    let lock = DEFAULT_FLAVOR_LOCK
        .lock()
        .unwrap_or_else(|e| e.into_inner());
    let old = set_default_flavor(flavor);
    DefaultFlavorGuard { _lock: lock, old }
}

impl fmt::Display for Flavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::MySQL => "MySQL",
            Self::PostgreSQL => "PostgreSQL",
            Self::SQLite => "SQLite",
            Self::SQLServer => "SQLServer",
        };
        f.write_str(s)
    }
}
