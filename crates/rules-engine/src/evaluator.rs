//! 条件评估器
//!
//! 实现各操作符的比较语义。求值从不返回错误：
//! 类型不符或数值无法解析时一律按条件不成立处理。

use crate::logging;
use crate::operators::Operator;
use crate::result::{FailureKind, RulesResult};
use rules_shared::config::ComparisonMode;
use serde_json::Value;

const LOG_TAG: &str = "ConditionEvaluator";

/// 可插拔的比较策略，供条件树叶子节点调用
pub trait Evaluating: Send + Sync {
    /// 二元比较
    fn evaluate(&self, lhs: &Value, operator: &str, rhs: &Value) -> RulesResult;

    /// 一元检查（exists / notExists）
    fn evaluate_unary(&self, operator: &str, lhs: Option<&Value>) -> RulesResult;
}

/// 条件评估器
#[derive(Debug, Clone, Copy, Default)]
pub struct ConditionEvaluator {
    mode: ComparisonMode,
}

impl ConditionEvaluator {
    pub fn new(mode: ComparisonMode) -> Self {
        Self { mode }
    }

    pub fn case_insensitive() -> Self {
        Self::new(ComparisonMode::CaseInsensitive)
    }

    pub fn mode(&self) -> ComparisonMode {
        self.mode
    }

    fn ignore_case(&self) -> bool {
        self.mode == ComparisonMode::CaseInsensitive
    }

    /// 二元比较，一元操作符返回 `None`
    fn compare(&self, lhs: &Value, op: Operator, rhs: &Value) -> Option<bool> {
        let matched = match op {
            Operator::Equals => self.equals(lhs, rhs),
            Operator::NotEquals => !self.equals(lhs, rhs),
            Operator::StartsWith => self.string_match(lhs, rhs, |l, r| l.starts_with(r)),
            Operator::EndsWith => self.string_match(lhs, rhs, |l, r| l.ends_with(r)),
            Operator::Contains => self.string_match(lhs, rhs, |l, r| l.contains(r)),
            Operator::NotContains => self.string_match(lhs, rhs, |l, r| !l.contains(r)),
            Operator::GreaterThan => Self::numeric(lhs, rhs, |l, r| l > r),
            Operator::GreaterThanOrEquals => Self::numeric(lhs, rhs, |l, r| l >= r),
            Operator::LessThan => Self::numeric(lhs, rhs, |l, r| l < r),
            Operator::LessThanOrEquals => Self::numeric(lhs, rhs, |l, r| l <= r),
            Operator::Exists | Operator::NotExists => return None,
        };
        Some(matched)
    }

    /// 相等比较：仅当两侧都是字符串时才受大小写策略影响
    fn equals(&self, lhs: &Value, rhs: &Value) -> bool {
        match (lhs, rhs) {
            (Value::String(l), Value::String(r)) if self.ignore_case() => {
                l.to_lowercase() == r.to_lowercase()
            }
            _ => lhs == rhs,
        }
    }

    /// 字符串操作，任一侧不是字符串时结果为 false
    fn string_match<F>(&self, lhs: &Value, rhs: &Value, matcher: F) -> bool
    where
        F: Fn(&str, &str) -> bool,
    {
        let (Some(l), Some(r)) = (lhs.as_str(), rhs.as_str()) else {
            return false;
        };

        if self.ignore_case() {
            matcher(&l.to_lowercase(), &r.to_lowercase())
        } else {
            matcher(l, r)
        }
    }

    /// 数值比较，任一侧无法解析为 f64 时结果为 false
    fn numeric<F>(lhs: &Value, rhs: &Value, cmp: F) -> bool
    where
        F: Fn(f64, f64) -> bool,
    {
        match (Self::as_f64(lhs), Self::as_f64(rhs)) {
            (Some(l), Some(r)) => cmp(l, r),
            _ => false,
        }
    }

    /// 字符串只接受有限数值，`nan` / `inf` 之类视为无法解析
    fn as_f64(value: &Value) -> Option<f64> {
        match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            _ => None,
        }
    }

    fn exists(value: Option<&Value>) -> bool {
        !matches!(value, None | Some(Value::Null))
    }

    fn missing_operator(operator: &str) -> RulesResult {
        logging::warning(LOG_TAG, &format!("Operator is not handled - {}", operator));
        RulesResult::failure(
            FailureKind::MissingOperator,
            format!("Operator is not handled - {}", operator),
        )
    }

    fn outcome(matched: bool, operator: &str) -> RulesResult {
        if matched {
            RulesResult::SUCCESS
        } else {
            RulesResult::failure(
                FailureKind::ConditionFailed,
                format!("Condition not matched for operation {}", operator),
            )
        }
    }
}

impl Evaluating for ConditionEvaluator {
    fn evaluate(&self, lhs: &Value, operator: &str, rhs: &Value) -> RulesResult {
        match Operator::from_name(operator) {
            Some(op) => match self.compare(lhs, op, rhs) {
                Some(matched) => Self::outcome(matched, operator),
                None => Self::missing_operator(operator),
            },
            None => Self::missing_operator(operator),
        }
    }

    fn evaluate_unary(&self, operator: &str, lhs: Option<&Value>) -> RulesResult {
        let matched = match Operator::from_name(operator) {
            Some(Operator::Exists) => Self::exists(lhs),
            Some(Operator::NotExists) => !Self::exists(lhs),
            _ => return Self::missing_operator(operator),
        };
        Self::outcome(matched, operator)
    }
}
