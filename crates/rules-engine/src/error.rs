//! 规则引擎错误类型
//!
//! 仅用于构建期（定界符配置、规则定义解析）。
//! 求值期的"未匹配"、"未找到"不走错误通道，统一由 `RulesResult` 或 `None` 表达。

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuleError {
    #[error("无效的定界符: {0}")]
    InvalidDelimiter(String),

    #[error("规则解析失败: {0}")]
    ParseError(String),

    #[error("不支持的匹配器: {matcher} (条件 {path})")]
    UnknownMatcher { matcher: String, path: String },

    #[error("不支持的条件类型: {condition_type} (条件 {path})")]
    UnsupportedCondition {
        condition_type: String,
        path: String,
    },

    #[error("JSON 序列化错误: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RuleError>;
