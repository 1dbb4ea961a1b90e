//! 规则引擎集成测试
//!
//! 测试完整的规则编译、加载、匹配与占位符替换工作流。

use mockall::mock;
use mockall::predicate::eq;
use rules_engine::{
    ComparisonExpression, ComparisonMode, ConditionEvaluator, ConditionNode, DefaultTransformer,
    EngineConfig, Evaluable, Evaluating, FailureKind, JsonTokenFinder, LogicalExpression, Rule,
    RuleCompiler, RulesEngine, RulesResult, Term, TokenFinder, UnaryExpression,
};
use serde_json::{Value, json};

mock! {
    Finder {}

    impl TokenFinder for Finder {
        fn get(&self, path: &str) -> Option<Value>;
    }
}

/// 创建测试上下文：模拟一个购买事件
fn create_purchase_finder() -> JsonTokenFinder {
    JsonTokenFinder::new(json!({
        "event": {
            "type": "PURCHASE",
            "source": "mobile_app"
        },
        "order": {
            "id": "order-12345",
            "amount": "1500",
            "currency": "CNY"
        },
        "user": {
            "id": "user 67890",
            "level": "Gold",
            "is_vip": true
        }
    }))
}

/// 创建测试上下文：模拟一个退款事件
fn create_refund_finder() -> JsonTokenFinder {
    JsonTokenFinder::new(json!({
        "event": {
            "type": "REFUND",
            "source": "customer_service"
        },
        "order": {
            "id": "order-12345",
            "amount": 500
        },
        "user": {
            "id": "user 67890",
            "level": "silver",
            "is_vip": false
        }
    }))
}

const RULE_SET: &str = r#"
{
    "rules": [
        {
            "id": "vip-purchase",
            "name": "VIP 高额消费",
            "condition": {
                "type": "group",
                "definition": {
                    "logic": "and",
                    "conditions": [
                        {"type": "matcher", "definition": {"key": "event.type", "matcher": "eq", "values": ["PURCHASE"]}},
                        {"type": "matcher", "definition": {"key": "user.is_vip", "matcher": "eq", "values": [true]}},
                        {"type": "matcher", "definition": {"key": "order.amount", "matcher": "ge", "values": [1000]}}
                    ]
                }
            },
            "consequences": [
                {"type": "url", "detail": {"url": "https://example.com/badge?user={{urlenc(user.id)}}&amount={{int(order.amount)}}"}}
            ]
        },
        {
            "id": "any-refund",
            "name": "退款",
            "condition": {"type": "matcher", "definition": {"key": "event.type", "matcher": "eq", "values": ["REFUND"]}}
        },
        {
            "id": "gold-level",
            "name": "金卡用户",
            "condition": {"type": "matcher", "definition": {"key": "user.level", "matcher": "eq", "values": ["gold"]}}
        },
        {
            "id": "has-order",
            "name": "有订单",
            "condition": {"type": "matcher", "definition": {"key": "order.id", "matcher": "ex"}}
        }
    ]
}
"#;

fn load_engine(mode: ComparisonMode) -> RulesEngine<rules_engine::CompiledRule> {
    let config = EngineConfig {
        comparison_mode: mode,
        ..Default::default()
    };
    let mut engine = RulesEngine::from_config(&config).unwrap();
    let rules = RuleCompiler::new()
        .compile_batch_from_json(RULE_SET)
        .unwrap();
    engine.add_rules(rules);
    engine
}

fn matched_ids(engine: &RulesEngine<rules_engine::CompiledRule>, finder: &JsonTokenFinder) -> Vec<String> {
    engine
        .evaluate(finder)
        .into_iter()
        .map(|rule| rule.id.clone())
        .collect()
}

// ==================== 完整工作流测试 ====================

#[test]
fn test_full_workflow_default_mode() {
    let engine = load_engine(ComparisonMode::Default);
    assert_eq!(engine.len(), 4);

    assert_eq!(
        matched_ids(&engine, &create_purchase_finder()),
        vec!["vip-purchase", "has-order"]
    );
    assert_eq!(
        matched_ids(&engine, &create_refund_finder()),
        vec!["any-refund", "has-order"]
    );
}

#[test]
fn test_full_workflow_case_insensitive_mode() {
    let engine = load_engine(ComparisonMode::CaseInsensitive);

    assert_eq!(
        matched_ids(&engine, &create_purchase_finder()),
        vec!["vip-purchase", "gold-level", "has-order"]
    );
}

#[test]
fn test_consequence_url_replacement() {
    let engine = load_engine(ComparisonMode::Default);
    let finder = create_purchase_finder();
    let matched = engine.evaluate(&finder);

    let url = matched[0].consequences[0]["detail"]["url"].as_str().unwrap();
    let replaced = engine.replacer().replace(url, &engine.context(&finder));

    assert_eq!(
        replaced,
        "https://example.com/badge?user=user%2067890&amount=1500"
    );
}

#[test]
fn test_clear_and_reload() {
    let mut engine = load_engine(ComparisonMode::Default);
    engine.clear_rules();
    assert!(engine.evaluate(&create_purchase_finder()).is_empty());

    let rules = RuleCompiler::new()
        .compile_batch_from_json(RULE_SET)
        .unwrap();
    engine.add_rules(rules);
    assert_eq!(engine.len(), 4);
}

// ==================== 能力边界测试 ====================

/// 手工构建条件树的规则
struct ManualRule {
    id: &'static str,
    condition: ConditionNode,
}

impl Rule for ManualRule {
    fn evaluable(&self) -> &dyn Evaluable {
        &self.condition
    }
}

#[test]
fn test_manual_condition_tree_with_mock_finder() {
    let mut finder = MockFinder::new();
    finder
        .expect_get()
        .with(eq("user.age"))
        .returning(|_| Some(json!(30)));
    finder
        .expect_get()
        .with(eq("user.email"))
        .returning(|_| None);

    let adult = ManualRule {
        id: "adult",
        condition: ComparisonExpression::new(
            Term::token("{{user.age}}"),
            "greaterThanOrEquals",
            Term::literal(18),
        )
        .into(),
    };
    let no_email = ManualRule {
        id: "no-email",
        condition: UnaryExpression::new(Term::token("{{user.email}}"), "notExists").into(),
    };
    let either = ManualRule {
        id: "either",
        condition: LogicalExpression::or(vec![
            UnaryExpression::new(Term::token("{{user.email}}"), "exists").into(),
            ComparisonExpression::new(Term::token("{{user.age}}"), "lessThan", Term::literal(18))
                .into(),
        ])
        .into(),
    };

    let mut engine = RulesEngine::new(ConditionEvaluator::default(), DefaultTransformer::new());
    engine.add_rules([adult, either, no_email]);

    let ids: Vec<_> = engine.evaluate(&finder).into_iter().map(|r| r.id).collect();
    assert_eq!(ids, vec!["adult", "no-email"]);
}

/// 自定义求值器：所有比较都视为成立
struct AlwaysTrue;

impl Evaluating for AlwaysTrue {
    fn evaluate(&self, _lhs: &Value, _operator: &str, _rhs: &Value) -> RulesResult {
        RulesResult::SUCCESS
    }

    fn evaluate_unary(&self, _operator: &str, _lhs: Option<&Value>) -> RulesResult {
        RulesResult::SUCCESS
    }
}

#[test]
fn test_pluggable_evaluator() {
    let mut engine = RulesEngine::new(AlwaysTrue, DefaultTransformer::new());
    engine.add_rules(
        RuleCompiler::new()
            .compile_batch_from_json(RULE_SET)
            .unwrap(),
    );

    assert_eq!(engine.evaluate(&create_refund_finder()).len(), 4);
}

#[test]
fn test_unresolved_operand_fails_rule() {
    let finder = JsonTokenFinder::new(json!({}));
    let evaluator = ConditionEvaluator::default();
    let transformer = DefaultTransformer::new();
    let context = rules_engine::Context::new(&finder, &evaluator, &transformer);

    let node: ConditionNode = ComparisonExpression::new(
        Term::token("{{order.amount}}"),
        "notEquals",
        Term::literal(0),
    )
    .into();
    assert_eq!(
        node.evaluate(&context).failure_kind(),
        Some(FailureKind::InvalidOperand)
    );
}
