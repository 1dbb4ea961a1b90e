//! 模板分词器
//!
//! 三态扫描器（Start / Text / Tag），从左到右把模板字符串切分为文本段和占位符段。
//! 占位符未闭合时整体丢弃，返回空序列，不返回部分结果。

use crate::delimiter::DelimiterPair;
use crate::logging;
use crate::token::MustacheToken;

const LOG_TAG: &str = "Tokenizer";

/// 模板片段
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// 原样输出的文本
    Text(String),
    /// 定界符之间的占位符，`content` 为原始内容
    Token {
        content: String,
        token: MustacheToken,
    },
}

impl Segment {
    fn token(content: &str) -> Self {
        Self::Token {
            content: content.to_string(),
            token: MustacheToken::parse(content),
        }
    }

    pub fn is_token(&self) -> bool {
        matches!(self, Self::Token { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Start,
    Text,
    Tag,
}

/// 解析模板
///
/// `delimiter` 为 `None` 时使用默认的 `{{` / `}}`。
/// 非空输入返回空序列即表示解析失败（占位符未闭合）。
pub fn parse(template: &str, delimiter: Option<&DelimiterPair>) -> Vec<Segment> {
    let default_pair;
    let delimiter = match delimiter {
        Some(pair) => pair,
        None => {
            default_pair = DelimiterPair::default();
            &default_pair
        }
    };
    let start_tag = delimiter.start_tag();
    let end_tag = delimiter.end_tag();

    let mut segments = Vec::new();
    let mut state = ScanState::Start;
    let mut span_start = 0;
    let mut index = 0;

    while index < template.len() {
        let rest = &template[index..];
        match state {
            ScanState::Start | ScanState::Text => {
                if rest.starts_with(start_tag) {
                    if index > span_start {
                        segments.push(Segment::Text(template[span_start..index].to_string()));
                    }
                    index += start_tag.len();
                    span_start = index;
                    state = ScanState::Tag;
                } else {
                    state = ScanState::Text;
                    index += next_char_len(rest);
                }
            }
            ScanState::Tag => {
                if rest.starts_with(end_tag) {
                    segments.push(Segment::token(&template[span_start..index]));
                    index += end_tag.len();
                    span_start = index;
                    state = ScanState::Start;
                } else {
                    index += next_char_len(rest);
                }
            }
        }
    }

    match state {
        ScanState::Tag => {
            logging::debug(
                LOG_TAG,
                &format!("Unterminated token in template '{}', discarding segments", template),
            );
            Vec::new()
        }
        ScanState::Text => {
            segments.push(Segment::Text(template[span_start..].to_string()));
            segments
        }
        ScanState::Start => segments,
    }
}

/// 按原定界符把片段还原为模板字符串
pub fn render(segments: &[Segment], delimiter: Option<&DelimiterPair>) -> String {
    let default_pair;
    let delimiter = match delimiter {
        Some(pair) => pair,
        None => {
            default_pair = DelimiterPair::default();
            &default_pair
        }
    };

    segments
        .iter()
        .map(|segment| match segment {
            Segment::Text(text) => text.clone(),
            Segment::Token { content, .. } => delimiter.wrap(content),
        })
        .collect()
}

fn next_char_len(rest: &str) -> usize {
    rest.chars().next().map_or(1, char::len_utf8)
}
