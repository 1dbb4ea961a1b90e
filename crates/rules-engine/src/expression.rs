//! 条件树
//!
//! 叶子节点调用 `Evaluating` 完成比较，逻辑节点以短路方式组合子结果。

use crate::context::Context;
use crate::operand::Operand;
use crate::operators::LogicalOperator;
use crate::result::{FailureKind, RulesResult};
use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt;

/// 可求值的条件
pub trait Evaluable: Send + Sync {
    fn evaluate(&self, context: &Context<'_>) -> RulesResult;
}

/// 比较项：字面量或占位符
#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    Literal(Value),
    Token(Operand),
}

impl Term {
    pub fn literal(value: impl Into<Value>) -> Self {
        Self::Literal(value.into())
    }

    pub fn token(token_string: &str) -> Self {
        Self::Token(Operand::new(token_string))
    }

    pub fn resolve(&self, context: &Context<'_>) -> Option<Value> {
        match self {
            Self::Literal(value) => Some(value.clone()),
            Self::Token(operand) => operand.resolve(context),
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(value) => write!(f, "{}", value),
            Self::Token(operand) => match operand.token() {
                Some(token) => write!(f, "{{{{{}}}}}", token),
                None => write!(f, "<empty>"),
            },
        }
    }
}

/// 二元比较
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonExpression {
    pub lhs: Term,
    pub operation: String,
    pub rhs: Term,
}

impl ComparisonExpression {
    pub fn new(lhs: Term, operation: impl Into<String>, rhs: Term) -> Self {
        Self {
            lhs,
            operation: operation.into(),
            rhs,
        }
    }
}

impl Evaluable for ComparisonExpression {
    fn evaluate(&self, context: &Context<'_>) -> RulesResult {
        match (self.lhs.resolve(context), self.rhs.resolve(context)) {
            (Some(lhs), Some(rhs)) => context.evaluator.evaluate(&lhs, &self.operation, &rhs),
            _ => RulesResult::failure(
                FailureKind::InvalidOperand,
                format!(
                    "Comparison {} {} {} has an unresolved operand",
                    self.lhs, self.operation, self.rhs
                ),
            ),
        }
    }
}

/// 一元检查
#[derive(Debug, Clone, PartialEq)]
pub struct UnaryExpression {
    pub lhs: Term,
    pub operation: String,
}

impl UnaryExpression {
    pub fn new(lhs: Term, operation: impl Into<String>) -> Self {
        Self {
            lhs,
            operation: operation.into(),
        }
    }
}

impl Evaluable for UnaryExpression {
    fn evaluate(&self, context: &Context<'_>) -> RulesResult {
        let lhs = self.lhs.resolve(context);
        context.evaluator.evaluate_unary(&self.operation, lhs.as_ref())
    }
}

/// 逻辑组合
#[derive(Debug, Clone, PartialEq)]
pub struct LogicalExpression {
    pub operation: String,
    pub operands: Vec<ConditionNode>,
}

impl LogicalExpression {
    pub fn new(operation: impl Into<String>, operands: Vec<ConditionNode>) -> Self {
        Self {
            operation: operation.into(),
            operands,
        }
    }

    pub fn and(operands: Vec<ConditionNode>) -> Self {
        Self::new(LogicalOperator::And.to_string(), operands)
    }

    pub fn or(operands: Vec<ConditionNode>) -> Self {
        Self::new(LogicalOperator::Or.to_string(), operands)
    }
}

impl Evaluable for LogicalExpression {
    fn evaluate(&self, context: &Context<'_>) -> RulesResult {
        match LogicalOperator::from_name(&self.operation) {
            // AND: 遇到失败立即返回
            Some(LogicalOperator::And) => {
                if self
                    .operands
                    .iter()
                    .all(|operand| operand.evaluate(context).is_success())
                {
                    RulesResult::SUCCESS
                } else {
                    RulesResult::failure(
                        FailureKind::ConditionFailed,
                        "AND operation returned false.",
                    )
                }
            }
            // OR: 遇到成功立即返回
            Some(LogicalOperator::Or) => {
                if self
                    .operands
                    .iter()
                    .any(|operand| operand.evaluate(context).is_success())
                {
                    RulesResult::SUCCESS
                } else {
                    RulesResult::failure(
                        FailureKind::ConditionFailed,
                        "OR operation returned false.",
                    )
                }
            }
            None => RulesResult::failure(
                FailureKind::MissingOperator,
                format!("Unknown conjunction operator {}", self.operation),
            ),
        }
    }
}

/// 条件树节点
#[derive(Debug, Clone, PartialEq)]
pub enum ConditionNode {
    Comparison(ComparisonExpression),
    Unary(UnaryExpression),
    Logical(LogicalExpression),
}

impl ConditionNode {
    /// 收集条件树中引用的所有变量路径
    pub fn variable_paths(&self) -> BTreeSet<String> {
        let mut paths = BTreeSet::new();
        self.collect_paths(&mut paths);
        paths
    }

    fn collect_paths(&self, paths: &mut BTreeSet<String>) {
        fn add(term: &Term, paths: &mut BTreeSet<String>) {
            if let Term::Token(operand) = term
                && let Some(token) = operand.token()
            {
                paths.insert(token.variable_path().to_string());
            }
        }

        match self {
            Self::Comparison(expr) => {
                add(&expr.lhs, paths);
                add(&expr.rhs, paths);
            }
            Self::Unary(expr) => add(&expr.lhs, paths),
            Self::Logical(expr) => {
                for operand in &expr.operands {
                    operand.collect_paths(paths);
                }
            }
        }
    }
}

impl Evaluable for ConditionNode {
    fn evaluate(&self, context: &Context<'_>) -> RulesResult {
        match self {
            Self::Comparison(expr) => expr.evaluate(context),
            Self::Unary(expr) => expr.evaluate(context),
            Self::Logical(expr) => expr.evaluate(context),
        }
    }
}

impl From<ComparisonExpression> for ConditionNode {
    fn from(expr: ComparisonExpression) -> Self {
        Self::Comparison(expr)
    }
}

impl From<UnaryExpression> for ConditionNode {
    fn from(expr: UnaryExpression) -> Self {
        Self::Unary(expr)
    }
}

impl From<LogicalExpression> for ConditionNode {
    fn from(expr: LogicalExpression) -> Self {
        Self::Logical(expr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::ConditionEvaluator;
    use crate::finder::JsonTokenFinder;
    use crate::transformer::DefaultTransformer;
    use serde_json::json;

    fn purchase_finder() -> JsonTokenFinder {
        JsonTokenFinder::new(json!({
            "event": {"type": "PURCHASE"},
            "order": {"amount": 1500},
            "user": {"level": "gold"}
        }))
    }

    fn run(node: &ConditionNode) -> RulesResult {
        let finder = purchase_finder();
        let evaluator = ConditionEvaluator::default();
        let transformer = DefaultTransformer::new();
        let context = Context::new(&finder, &evaluator, &transformer);
        node.evaluate(&context)
    }

    fn cmp(key: &str, op: &str, value: Value) -> ConditionNode {
        ComparisonExpression::new(Term::token(&format!("{{{{{}}}}}", key)), op, Term::Literal(value))
            .into()
    }

    #[test]
    fn test_comparison() {
        assert!(run(&cmp("event.type", "equals", json!("PURCHASE"))).is_success());
        assert!(run(&cmp("order.amount", "greaterThan", json!(1000))).is_success());
        assert_eq!(
            run(&cmp("order.amount", "lessThan", json!(1000))).failure_kind(),
            Some(FailureKind::ConditionFailed)
        );
    }

    #[test]
    fn test_missing_operand_is_invalid() {
        let result = run(&cmp("order.discount", "notEquals", json!(0)));
        assert_eq!(result.failure_kind(), Some(FailureKind::InvalidOperand));
    }

    #[test]
    fn test_unary() {
        let exists: ConditionNode = UnaryExpression::new(Term::token("{{user.level}}"), "exists").into();
        let missing: ConditionNode =
            UnaryExpression::new(Term::token("{{user.nickname}}"), "notExists").into();
        assert!(run(&exists).is_success());
        assert!(run(&missing).is_success());
    }

    #[test]
    fn test_logical_and_or() {
        let and: ConditionNode = LogicalExpression::and(vec![
            cmp("event.type", "equals", json!("PURCHASE")),
            cmp("order.amount", "greaterThanOrEquals", json!(1500)),
        ])
        .into();
        assert!(run(&and).is_success());

        let failing_and: ConditionNode = LogicalExpression::and(vec![
            cmp("event.type", "equals", json!("PURCHASE")),
            cmp("user.level", "equals", json!("silver")),
        ])
        .into();
        let result = run(&failing_and);
        assert_eq!(result.message(), Some("AND operation returned false."));

        let or: ConditionNode = LogicalExpression::or(vec![
            cmp("user.level", "equals", json!("silver")),
            cmp("user.level", "equals", json!("gold")),
        ])
        .into();
        assert!(run(&or).is_success());

        let failing_or: ConditionNode =
            LogicalExpression::or(vec![cmp("user.level", "equals", json!("silver"))]).into();
        assert_eq!(run(&failing_or).message(), Some("OR operation returned false."));
    }

    #[test]
    fn test_empty_groups() {
        assert!(run(&LogicalExpression::and(vec![]).into()).is_success());
        assert!(!run(&LogicalExpression::or(vec![]).into()).is_success());
    }

    #[test]
    fn test_unknown_conjunction() {
        let node: ConditionNode = LogicalExpression::new("xor", vec![]).into();
        assert_eq!(run(&node).failure_kind(), Some(FailureKind::MissingOperator));
    }

    #[test]
    fn test_variable_paths() {
        let node: ConditionNode = LogicalExpression::and(vec![
            cmp("event.type", "equals", json!("PURCHASE")),
            UnaryExpression::new(Term::token("{{int(order.amount)}}"), "exists").into(),
            ComparisonExpression::new(Term::literal(1), "equals", Term::literal(1)).into(),
        ])
        .into();

        let paths: Vec<_> = node.variable_paths().into_iter().collect();
        assert_eq!(paths, vec!["event.type".to_string(), "order.amount".to_string()]);
    }
}
