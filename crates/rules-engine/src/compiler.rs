//! 规则编译器
//!
//! 将 JSON 规则定义编译成内存中的条件树，并预提取引用的变量路径。

use crate::engine::Rule;
use crate::error::{Result, RuleError};
use crate::expression::{
    ComparisonExpression, ConditionNode, Evaluable, LogicalExpression, Term, UnaryExpression,
};
use crate::models::{ConditionDefinition, GroupDefinition, MatcherDefinition, RuleDefinition};
use crate::operand::Operand;
use crate::operators::{LogicalOperator, Operator};
use crate::token::MustacheToken;
use serde_json::Value;
use std::collections::BTreeSet;
use tracing::{instrument, warn};

/// 编译后的规则
#[derive(Debug, Clone)]
pub struct CompiledRule {
    pub id: String,
    pub name: String,
    pub condition: ConditionNode,
    /// 规则动作，原样保留
    pub consequences: Vec<Value>,
    /// 条件中引用的所有变量路径
    pub required_fields: BTreeSet<String>,
    /// 编译版本号
    pub compile_version: u64,
}

impl CompiledRule {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Rule for CompiledRule {
    fn evaluable(&self) -> &dyn Evaluable {
        &self.condition
    }
}

/// 规则编译器
#[derive(Debug, Default)]
pub struct RuleCompiler {
    compile_version: u64,
}

impl RuleCompiler {
    pub fn new() -> Self {
        Self { compile_version: 0 }
    }

    /// 从 JSON 字符串编译单条规则
    pub fn compile_from_json(&mut self, json: &str) -> Result<CompiledRule> {
        let definition: RuleDefinition = serde_json::from_str(json)?;
        self.compile(definition)
    }

    /// 批量编译，接受规则数组或 `{"rules": [...]}`
    ///
    /// 单条规则无效时记录告警并跳过，只有整体 JSON 无效才返回错误。
    #[instrument(skip(self, json))]
    pub fn compile_batch_from_json(&mut self, json: &str) -> Result<Vec<CompiledRule>> {
        let value: Value = serde_json::from_str(json)?;
        let items = match value {
            Value::Array(items) => items,
            Value::Object(mut map) => match map.remove("rules") {
                Some(Value::Array(items)) => items,
                _ => {
                    return Err(RuleError::ParseError(
                        "规则集缺少 rules 数组".to_string(),
                    ));
                }
            },
            _ => {
                return Err(RuleError::ParseError(
                    "规则集必须是数组或包含 rules 数组的对象".to_string(),
                ));
            }
        };

        let mut compiled = Vec::with_capacity(items.len());
        for (i, item) in items.into_iter().enumerate() {
            let result = serde_json::from_value::<RuleDefinition>(item)
                .map_err(RuleError::from)
                .and_then(|definition| self.compile(definition));

            match result {
                Ok(rule) => compiled.push(rule),
                Err(e) => warn!(index = i, error = %e, "跳过无效规则"),
            }
        }

        Ok(compiled)
    }

    /// 编译规则
    pub fn compile(&mut self, definition: RuleDefinition) -> Result<CompiledRule> {
        if definition.id.is_empty() {
            return Err(RuleError::ParseError("规则 ID 不能为空".to_string()));
        }

        let condition = self.compile_condition(&definition.condition, "condition")?;
        let required_fields = condition.variable_paths();

        self.compile_version += 1;

        Ok(CompiledRule {
            id: definition.id,
            name: definition.name,
            condition,
            consequences: definition.consequences,
            required_fields,
            compile_version: self.compile_version,
        })
    }

    fn compile_condition(&self, definition: &ConditionDefinition, path: &str) -> Result<ConditionNode> {
        match definition.condition_type.as_str() {
            "group" => {
                let group: GroupDefinition = Self::definition(definition, path)?;
                self.compile_group(group, path)
            }
            "matcher" => {
                let matcher: MatcherDefinition = Self::definition(definition, path)?;
                Self::compile_matcher(matcher, path)
            }
            other => Err(RuleError::UnsupportedCondition {
                condition_type: other.to_string(),
                path: path.to_string(),
            }),
        }
    }

    fn definition<T: serde::de::DeserializeOwned>(
        definition: &ConditionDefinition,
        path: &str,
    ) -> Result<T> {
        serde_json::from_value(definition.definition.clone()).map_err(|e| {
            RuleError::ParseError(format!("条件 '{}' 的定义无效: {}", path, e))
        })
    }

    fn compile_group(&self, group: GroupDefinition, path: &str) -> Result<ConditionNode> {
        let logic = LogicalOperator::from_name(&group.logic).ok_or_else(|| {
            RuleError::ParseError(format!(
                "逻辑组 '{}' 的连接符无效: {}",
                path, group.logic
            ))
        })?;

        if group.conditions.is_empty() {
            return Err(RuleError::ParseError(format!(
                "逻辑组 '{}' 不能为空",
                path
            )));
        }

        let operands = group
            .conditions
            .iter()
            .enumerate()
            .map(|(i, child)| self.compile_condition(child, &format!("{}.conditions[{}]", path, i)))
            .collect::<Result<Vec<_>>>()?;

        Ok(LogicalExpression::new(logic.to_string(), operands).into())
    }

    /// 匹配器：多个值以 OR 组合，单个值直接比较，ex / nx 为一元检查
    fn compile_matcher(matcher: MatcherDefinition, path: &str) -> Result<ConditionNode> {
        if matcher.key.is_empty() {
            return Err(RuleError::ParseError(format!(
                "条件 '{}' 的 key 不能为空",
                path
            )));
        }

        let operator =
            Self::matcher_operator(&matcher.matcher).ok_or_else(|| RuleError::UnknownMatcher {
                matcher: matcher.matcher.clone(),
                path: path.to_string(),
            })?;

        let key = || Term::Token(Operand::from_token(MustacheToken::parse(&matcher.key)));

        if operator.is_unary() {
            return Ok(UnaryExpression::new(key(), operator.name()).into());
        }

        let mut comparisons: Vec<ConditionNode> = matcher
            .values
            .iter()
            .map(|value| {
                ComparisonExpression::new(key(), operator.name(), Term::Literal(value.clone()))
                    .into()
            })
            .collect();

        match comparisons.len() {
            0 => Err(RuleError::ParseError(format!(
                "条件 '{}' 的 {} 匹配器需要至少一个值",
                path, matcher.matcher
            ))),
            1 => Ok(comparisons.remove(0)),
            _ => Ok(LogicalExpression::or(comparisons).into()),
        }
    }

    fn matcher_operator(matcher: &str) -> Option<Operator> {
        let op = match matcher {
            "eq" => Operator::Equals,
            "ne" => Operator::NotEquals,
            "gt" => Operator::GreaterThan,
            "ge" => Operator::GreaterThanOrEquals,
            "lt" => Operator::LessThan,
            "le" => Operator::LessThanOrEquals,
            "co" => Operator::Contains,
            "nc" => Operator::NotContains,
            "sw" => Operator::StartsWith,
            "ew" => Operator::EndsWith,
            "ex" => Operator::Exists,
            "nx" => Operator::NotExists,
            _ => return None,
        };
        Some(op)
    }
}
