//! 规则引擎
//!
//! 持有固定的求值器与变换器以及有序规则列表，
//! 每次 `evaluate` 构建一个上下文，按原始顺序返回当前匹配的规则。

use crate::context::{Context, TokenFinder, Transforming};
use crate::delimiter::DelimiterPair;
use crate::error::Result;
use crate::evaluator::{ConditionEvaluator, Evaluating};
use crate::expression::Evaluable;
use crate::logging;
use crate::replacer::TokenReplacer;
use crate::transformer::DefaultTransformer;
use rules_shared::config::EngineConfig;

const LOG_TAG: &str = "RulesEngine";

/// 规则：引擎只关心其条件树根节点
pub trait Rule {
    fn evaluable(&self) -> &dyn Evaluable;
}

/// 规则引擎
pub struct RulesEngine<R> {
    evaluator: Box<dyn Evaluating>,
    transformer: Box<dyn Transforming>,
    delimiter: DelimiterPair,
    rules: Vec<R>,
}

impl<R: Rule> RulesEngine<R> {
    pub fn new(
        evaluator: impl Evaluating + 'static,
        transformer: impl Transforming + 'static,
    ) -> Self {
        Self {
            evaluator: Box::new(evaluator),
            transformer: Box::new(transformer),
            delimiter: DelimiterPair::default(),
            rules: Vec::new(),
        }
    }

    /// 按配置的比较模式与定界符创建，使用默认变换器
    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        let engine = Self::new(
            ConditionEvaluator::new(config.comparison_mode),
            DefaultTransformer::new(),
        );
        Ok(engine.with_delimiter(DelimiterPair::from_config(config)?))
    }

    /// 替换模板占位符使用的定界符
    pub fn with_delimiter(mut self, delimiter: DelimiterPair) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn delimiter(&self) -> &DelimiterPair {
        &self.delimiter
    }

    /// 按引擎定界符构建的占位符替换器
    pub fn replacer(&self) -> TokenReplacer {
        TokenReplacer::new(self.delimiter.clone())
    }

    /// 追加规则到列表末尾
    pub fn add_rules(&mut self, rules: impl IntoIterator<Item = R>) {
        let before = self.rules.len();
        self.rules.extend(rules);
        logging::debug(
            LOG_TAG,
            &format!(
                "Added {} rules, {} rules in total",
                self.rules.len() - before,
                self.rules.len()
            ),
        );
    }

    /// 清空规则
    pub fn clear_rules(&mut self) {
        self.rules.clear();
        logging::debug(LOG_TAG, "Cleared all rules");
    }

    pub fn rules(&self) -> &[R] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// 以引擎持有的能力构建上下文，供占位符替换等场景复用
    pub fn context<'a>(&'a self, token_finder: &'a dyn TokenFinder) -> Context<'a> {
        Context::new(token_finder, self.evaluator.as_ref(), self.transformer.as_ref())
    }

    /// 评估所有规则，按原始顺序返回匹配的规则
    pub fn evaluate(&self, token_finder: &dyn TokenFinder) -> Vec<&R> {
        let context = self.context(token_finder);

        let matched: Vec<&R> = self
            .rules
            .iter()
            .filter(|rule| {
                let result = rule.evaluable().evaluate(&context);
                if !result.is_success() {
                    logging::verbose(LOG_TAG, &format!("Rule not matched: {}", result));
                }
                result.is_success()
            })
            .collect();

        logging::debug(
            LOG_TAG,
            &format!(
                "Evaluated {} rules, {} matched",
                self.rules.len(),
                matched.len()
            ),
        );

        matched
    }
}
