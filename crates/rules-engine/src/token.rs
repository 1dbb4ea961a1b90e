//! 占位符模型
//!
//! 占位符要么是变量引用，要么是包裹内层占位符的函数调用，可任意嵌套。

use crate::context::{TokenFinder, Transforming};
use serde_json::Value;
use std::fmt;

/// 占位符
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MustacheToken {
    /// 变量引用，值为完整路径
    Variable(String),
    /// 函数调用：`name(inner)`
    Function {
        name: String,
        inner: Box<MustacheToken>,
    },
}

impl MustacheToken {
    /// 对占位符内容分类
    ///
    /// 存在非空括号子串时为函数：函数名取第一个 `(` 之前的部分，
    /// 内层取该 `(` 与其后最后一个 `)` 之间的内容并递归分类；否则为变量。
    /// 每层递归输入严格变短，树深度以输入长度为界。
    pub fn parse(token: &str) -> Self {
        if let Some(open) = token.find('(')
            && let Some(close) = token.rfind(')')
            && close > open + 1
        {
            return Self::Function {
                name: token[..open].to_string(),
                inner: Box::new(Self::parse(&token[open + 1..close])),
            };
        }

        Self::Variable(token.to_string())
    }

    /// 解析占位符的值
    pub fn resolve(
        &self,
        token_finder: &dyn TokenFinder,
        transformer: &dyn Transforming,
    ) -> Option<Value> {
        match self {
            Self::Variable(path) => token_finder.get(path),
            Self::Function { name, inner } => {
                let value = inner.resolve(token_finder, transformer);
                transformer.transform(name, value)
            }
        }
    }

    /// 还原占位符内容
    pub fn content(&self) -> String {
        match self {
            Self::Variable(path) => path.clone(),
            Self::Function { name, inner } => format!("{}({})", name, inner.content()),
        }
    }

    /// 最内层引用的变量路径
    pub fn variable_path(&self) -> &str {
        match self {
            Self::Variable(path) => path,
            Self::Function { inner, .. } => inner.variable_path(),
        }
    }
}

impl fmt::Display for MustacheToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.content())
    }
}
