//! 规则条件评估引擎
//!
//! 可嵌入的规则条件求值核心，支持：
//! - 带定界符的模板分词与占位符解析（变量、可嵌套的函数调用）
//! - 类型化的比较操作符（数值强制转换、大小写策略）
//! - 有序规则集的确定性匹配
//! - JSON 规则定义编译与占位符替换

pub mod compiler;
pub mod context;
pub mod delimiter;
pub mod engine;
pub mod error;
pub mod evaluator;
pub mod expression;
pub mod finder;
pub mod logging;
pub mod models;
pub mod operand;
pub mod operators;
pub mod replacer;
pub mod result;
pub mod token;
pub mod tokenizer;
pub mod transformer;

pub use compiler::{CompiledRule, RuleCompiler};
pub use context::{Context, TokenFinder, Transforming};
pub use delimiter::DelimiterPair;
pub use engine::{Rule, RulesEngine};
pub use error::{Result, RuleError};
pub use evaluator::{ConditionEvaluator, Evaluating};
pub use expression::{
    ComparisonExpression, ConditionNode, Evaluable, LogicalExpression, Term, UnaryExpression,
};
pub use finder::JsonTokenFinder;
pub use models::{ConditionDefinition, RuleDefinition};
pub use operand::Operand;
pub use operators::{LogicalOperator, Operator};
pub use replacer::TokenReplacer;
pub use result::{FailureKind, RulesResult};
pub use rules_shared::config::{ComparisonMode, EngineConfig};
pub use token::MustacheToken;
pub use tokenizer::Segment;
pub use transformer::DefaultTransformer;
