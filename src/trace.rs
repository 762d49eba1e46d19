//! 可观测性：日志回调与追踪接口。
//!
//! 日志回调（[`LogFn`]）每条执行的语句恰好调用一次；追踪接口（[`Tracer`]）为每个公开操作
//! 以及底层的执行步骤各开一个 span，并把 SQL 记为 `query` 属性。

use crate::value::SqlValue;
use std::sync::Arc;

/// 日志回调：`(sql, args)`。
pub type LogFn = Arc<dyn Fn(&str, &[SqlValue]) + Send + Sync>;

pub trait Tracer: Send + Sync {
    fn start_span(&self, name: &'static str) -> Box<dyn TraceSpan>;
}

pub trait TraceSpan {
    fn set_attribute(&mut self, key: &'static str, value: &str);
    fn end(&mut self);
}

/// 基于 `tracing` 的实现：span 名固定，操作名记在 `op` 字段上。
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingTracer;

impl Tracer for TracingTracer {
    fn start_span(&self, name: &'static str) -> Box<dyn TraceSpan> {
        let span = tracing::debug_span!(
            target: "halo_space::sql",
            "halo_space",
            op = name,
            query = tracing::field::Empty
        );
        Box::new(TracingSpan {
            span: Some(span.entered()),
        })
    }
}

struct TracingSpan {
    span: Option<tracing::span::EnteredSpan>,
}

impl TraceSpan for TracingSpan {
    fn set_attribute(&mut self, key: &'static str, value: &str) {
        if let Some(span) = &self.span {
            span.record(key, value);
        }
    }

    fn end(&mut self) {
        if let Some(span) = self.span.take() {
            drop(span.exit());
        }
    }
}

/// 没有配置 tracer 时什么也不做；离开作用域时结束 span。
pub(crate) struct SpanGuard {
    span: Option<Box<dyn TraceSpan>>,
}

impl SpanGuard {
    pub(crate) fn start(tracer: Option<&dyn Tracer>, name: &'static str) -> Self {
        Self {
            span: tracer.map(|t| t.start_span(name)),
        }
    }

    pub(crate) fn set_attribute(&mut self, key: &'static str, value: &str) {
        if let Some(span) = self.span.as_mut() {
            span.set_attribute(key, value);
        }
    }
}

impl Drop for SpanGuard {
    fn drop(&mut self) {
        if let Some(mut span) = self.span.take() {
            span.end();
        }
    }
}
