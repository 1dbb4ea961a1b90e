//! 操作数：对单个占位符的惰性包装

use crate::context::Context;
use crate::token::MustacheToken;
use crate::tokenizer::{self, Segment};
use serde_json::Value;

/// 操作数
///
/// 空输入得到永久为空的操作数，每次解析都返回 `None`。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Operand {
    token: Option<MustacheToken>,
}

impl Operand {
    /// 从原始占位符字符串创建，如 `{{event.type}}` 或 `event.type`
    pub fn new(token_string: &str) -> Self {
        if token_string.is_empty() {
            return Self::empty();
        }

        let mut tokens = tokenizer::parse(token_string, None)
            .into_iter()
            .filter_map(|segment| match segment {
                Segment::Token { token, .. } => Some(token),
                Segment::Text(_) => None,
            });
        // 恰好一个占位符时取该占位符，否则整串按占位符内容解析
        let token = match (tokens.next(), tokens.next()) {
            (Some(token), None) => token,
            _ => MustacheToken::parse(token_string),
        };

        Self { token: Some(token) }
    }

    /// 包装已解析的占位符
    pub fn from_token(token: MustacheToken) -> Self {
        Self { token: Some(token) }
    }

    pub fn empty() -> Self {
        Self { token: None }
    }

    pub fn token(&self) -> Option<&MustacheToken> {
        self.token.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.token.is_none()
    }

    /// 在上下文中解析值，从不 panic
    pub fn resolve(&self, context: &Context<'_>) -> Option<Value> {
        self.token
            .as_ref()
            .and_then(|token| token.resolve(context.token_finder, context.transformer))
    }
}
