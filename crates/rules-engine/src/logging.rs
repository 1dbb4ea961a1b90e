//! 进程级诊断日志出口
//!
//! 引擎内部只通过这里输出诊断信息。默认后端为空实现，
//! 宿主在启动时调用 `install` 注入后端（通常是 `TracingLogSink`），之后只读。
//! 日志从不影响求值结果。

use arc_swap::ArcSwap;
use std::sync::{Arc, LazyLock};

/// 日志级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Verbose,
    Debug,
    Warning,
    Error,
}

/// 日志后端
pub trait LogSink: Send + Sync {
    fn log(&self, level: LogLevel, tag: &str, message: &str);
}

/// 空后端
#[derive(Debug, Default)]
pub struct NoopLogSink;

impl LogSink for NoopLogSink {
    fn log(&self, _level: LogLevel, _tag: &str, _message: &str) {}
}

/// 转发到 `tracing` 的后端，tag 作为结构化字段输出
#[derive(Debug, Default)]
pub struct TracingLogSink;

impl LogSink for TracingLogSink {
    fn log(&self, level: LogLevel, tag: &str, message: &str) {
        match level {
            LogLevel::Verbose => tracing::trace!(tag, "{}", message),
            LogLevel::Debug => tracing::debug!(tag, "{}", message),
            LogLevel::Warning => tracing::warn!(tag, "{}", message),
            LogLevel::Error => tracing::error!(tag, "{}", message),
        }
    }
}

static SINK: LazyLock<ArcSwap<Box<dyn LogSink>>> =
    LazyLock::new(|| ArcSwap::from_pointee(Box::new(NoopLogSink) as Box<dyn LogSink>));

/// 安装日志后端，替换当前后端
pub fn install(sink: impl LogSink + 'static) {
    SINK.store(Arc::new(Box::new(sink)));
}

/// 安装 `TracingLogSink`
pub fn install_tracing() {
    install(TracingLogSink);
}

/// 恢复为空后端
pub fn reset() {
    install(NoopLogSink);
}

pub fn log(level: LogLevel, tag: &str, message: &str) {
    SINK.load().log(level, tag, message);
}

pub fn verbose(tag: &str, message: &str) {
    log(LogLevel::Verbose, tag, message);
}

pub fn debug(tag: &str, message: &str) {
    log(LogLevel::Debug, tag, message);
}

pub fn warning(tag: &str, message: &str) {
    log(LogLevel::Warning, tag, message);
}

pub fn error(tag: &str, message: &str) {
    log(LogLevel::Error, tag, message);
}
