//! 求值结果模型
//!
//! 只有两种构造方式：共享的 `RulesResult::SUCCESS`，或携带失败类型与诊断信息的失败结果。

use std::fmt;

/// 失败类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    Unknown,
    /// 操作符执行了但结果为 false
    ConditionFailed,
    /// 预留给能力实现，表示上游数据类型不符
    TypeMismatched,
    /// 求值器不认识该操作符
    MissingOperator,
    /// 操作数无法解析出值
    InvalidOperand,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Unknown => "UNKNOWN",
            Self::ConditionFailed => "CONDITION_FAILED",
            Self::TypeMismatched => "TYPE_MISMATCHED",
            Self::MissingOperator => "MISSING_OPERATOR",
            Self::InvalidOperand => "INVALID_OPERAND",
        };
        write!(f, "{}", s)
    }
}

/// 条件求值结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RulesResult {
    Success,
    Failure { kind: FailureKind, message: String },
}

impl RulesResult {
    /// 共享的成功结果，不携带消息
    pub const SUCCESS: RulesResult = RulesResult::Success;

    pub fn failure(kind: FailureKind, message: impl Into<String>) -> Self {
        Self::Failure {
            kind,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            Self::Success => None,
            Self::Failure { kind, .. } => Some(*kind),
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Success => None,
            Self::Failure { message, .. } => Some(message),
        }
    }
}

impl fmt::Display for RulesResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "SUCCESS"),
            Self::Failure { kind, message } => write!(f, "{}: {}", kind, message),
        }
    }
}
