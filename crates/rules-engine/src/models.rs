//! JSON 规则定义模型
//!
//! 条件的 `definition` 按 `type` 延迟解析，便于编译器对未知类型给出明确错误。

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// 规则定义
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleDefinition {
    #[serde(default = "generate_rule_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub condition: ConditionDefinition,
    /// 规则动作，引擎不解释其含义
    #[serde(default)]
    pub consequences: Vec<Value>,
}

fn generate_rule_id() -> String {
    Uuid::new_v4().to_string()
}

impl RuleDefinition {
    pub fn new(name: impl Into<String>, condition: ConditionDefinition) -> Self {
        Self {
            id: generate_rule_id(),
            name: name.into(),
            condition,
            consequences: Vec::new(),
        }
    }
}

/// 条件定义：`group` 或 `matcher`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConditionDefinition {
    #[serde(rename = "type")]
    pub condition_type: String,
    #[serde(default)]
    pub definition: Value,
}

impl ConditionDefinition {
    pub fn group(logic: impl Into<String>, conditions: Vec<ConditionDefinition>) -> Self {
        let group = GroupDefinition {
            logic: logic.into(),
            conditions,
        };
        Self {
            condition_type: "group".to_string(),
            definition: serde_json::to_value(group).unwrap_or_default(),
        }
    }

    pub fn matcher(key: impl Into<String>, matcher: impl Into<String>, values: Vec<Value>) -> Self {
        let matcher = MatcherDefinition {
            key: key.into(),
            matcher: matcher.into(),
            values,
        };
        Self {
            condition_type: "matcher".to_string(),
            definition: serde_json::to_value(matcher).unwrap_or_default(),
        }
    }
}

/// 逻辑组定义
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupDefinition {
    pub logic: String,
    pub conditions: Vec<ConditionDefinition>,
}

/// 匹配器定义
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatcherDefinition {
    pub key: String,
    pub matcher: String,
    #[serde(default)]
    pub values: Vec<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rule_deserialization() {
        let json = r#"
        {
            "id": "rule-001",
            "name": "purchase_badge",
            "condition": {
                "type": "group",
                "definition": {
                    "logic": "and",
                    "conditions": [
                        {
                            "type": "matcher",
                            "definition": {"key": "event.type", "matcher": "eq", "values": ["PURCHASE"]}
                        }
                    ]
                }
            },
            "consequences": [{"type": "url", "detail": {"url": "https://example.com"}}]
        }
        "#;

        let rule: RuleDefinition = serde_json::from_str(json).unwrap();
        assert_eq!(rule.id, "rule-001");
        assert_eq!(rule.condition.condition_type, "group");
        assert_eq!(rule.consequences.len(), 1);

        let group: GroupDefinition = serde_json::from_value(rule.condition.definition).unwrap();
        assert_eq!(group.logic, "and");
        assert_eq!(group.conditions[0].condition_type, "matcher");
    }

    #[test]
    fn test_missing_id_is_generated() {
        let rule: RuleDefinition = serde_json::from_value(json!({
            "condition": {"type": "matcher", "definition": {"key": "a", "matcher": "ex"}}
        }))
        .unwrap();
        assert!(!rule.id.is_empty());
        assert!(rule.name.is_empty());
    }

    #[test]
    fn test_builders() {
        let condition = ConditionDefinition::group(
            "or",
            vec![ConditionDefinition::matcher("user.level", "eq", vec![json!("gold")])],
        );
        let rule = RuleDefinition::new("vip", condition);
        let value = serde_json::to_value(&rule).unwrap();
        assert_eq!(value["condition"]["definition"]["logic"], json!("or"));
        assert_eq!(
            value["condition"]["definition"]["conditions"][0]["definition"]["key"],
            json!("user.level")
        );
    }
}
