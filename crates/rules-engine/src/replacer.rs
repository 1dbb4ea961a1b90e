//! 占位符替换
//!
//! 把模板中的占位符替换为上下文中解析出的值，如规则动作中的 URL 模板。

use crate::context::Context;
use crate::delimiter::DelimiterPair;
use crate::logging;
use crate::tokenizer::{self, Segment};
use serde_json::Value;

const LOG_TAG: &str = "TokenReplacer";

/// 占位符替换器
#[derive(Debug, Clone, Default)]
pub struct TokenReplacer {
    delimiter: DelimiterPair,
}

impl TokenReplacer {
    pub fn new(delimiter: DelimiterPair) -> Self {
        Self { delimiter }
    }

    pub fn delimiter(&self) -> &DelimiterPair {
        &self.delimiter
    }

    /// 替换模板中的全部占位符
    ///
    /// 无法解析的占位符替换为空串；模板解析失败（占位符未闭合）时原样返回。
    pub fn replace(&self, template: &str, context: &Context<'_>) -> String {
        let segments = tokenizer::parse(template, Some(&self.delimiter));
        if segments.is_empty() {
            if !template.is_empty() {
                logging::warning(
                    LOG_TAG,
                    &format!("Unable to parse template '{}', leaving it unchanged", template),
                );
            }
            return template.to_string();
        }

        let mut output = String::with_capacity(template.len());
        for segment in &segments {
            match segment {
                Segment::Text(text) => output.push_str(text),
                Segment::Token { token, .. } => {
                    let value = token.resolve(context.token_finder, context.transformer);
                    output.push_str(&Self::stringify(value));
                }
            }
        }
        output
    }

    fn stringify(value: Option<Value>) -> String {
        match value {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s,
            Some(other) => other.to_string(),
        }
    }
}
