//! 占位符定界符

use crate::error::{Result, RuleError};
use rules_shared::config::EngineConfig;

pub const DEFAULT_START_TAG: &str = "{{";
pub const DEFAULT_END_TAG: &str = "}}";

/// 起止定界符对，构建后只读
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DelimiterPair {
    start_tag: String,
    end_tag: String,
}

impl DelimiterPair {
    /// 创建定界符对，空定界符会让扫描器无法前进，因此直接拒绝
    pub fn new(start_tag: impl Into<String>, end_tag: impl Into<String>) -> Result<Self> {
        let start_tag = start_tag.into();
        let end_tag = end_tag.into();

        if start_tag.is_empty() || end_tag.is_empty() {
            return Err(RuleError::InvalidDelimiter(format!(
                "起止定界符不能为空: start='{}', end='{}'",
                start_tag, end_tag
            )));
        }

        Ok(Self { start_tag, end_tag })
    }

    /// 从引擎配置创建
    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        Self::new(config.start_tag.clone(), config.end_tag.clone())
    }

    pub fn start_tag(&self) -> &str {
        &self.start_tag
    }

    pub fn end_tag(&self) -> &str {
        &self.end_tag
    }

    /// 用定界符包裹内容，如 `event.type` -> `{{event.type}}`
    pub fn wrap(&self, content: &str) -> String {
        format!("{}{}{}", self.start_tag, content, self.end_tag)
    }
}

impl Default for DelimiterPair {
    fn default() -> Self {
        Self {
            start_tag: DEFAULT_START_TAG.to_string(),
            end_tag: DEFAULT_END_TAG.to_string(),
        }
    }
}
