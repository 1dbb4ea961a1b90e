//! 求值上下文与外部能力
//!
//! 每次 `evaluate` 调用构建一个新的 `Context`，只借用三种能力，自身不持有状态。

use crate::evaluator::Evaluating;
use serde_json::Value;

/// 变量查找能力：把点号路径解析为当前运行时值，未知路径返回 `None`
#[cfg_attr(test, mockall::automock)]
pub trait TokenFinder: Send + Sync {
    fn get(&self, path: &str) -> Option<Value>;
}

/// 函数变换能力：在占位符解析过程中对值应用命名函数
#[cfg_attr(test, mockall::automock)]
pub trait Transforming: Send + Sync {
    fn transform(&self, name: &str, value: Option<Value>) -> Option<Value>;
}

/// 单次求值的能力组合
#[derive(Clone, Copy)]
pub struct Context<'a> {
    pub token_finder: &'a dyn TokenFinder,
    pub evaluator: &'a dyn Evaluating,
    pub transformer: &'a dyn Transforming,
}

impl<'a> Context<'a> {
    pub fn new(
        token_finder: &'a dyn TokenFinder,
        evaluator: &'a dyn Evaluating,
        transformer: &'a dyn Transforming,
    ) -> Self {
        Self {
            token_finder,
            evaluator,
            transformer,
        }
    }
}
