//! 默认函数变换实现
//!
//! 内置 `int`、`double`、`string`、`bool` 类型转换和 `urlenc`，
//! 支持注册自定义函数。未知函数名原样返回输入值。

use crate::context::Transforming;
use crate::logging;
use serde_json::Value;
use std::collections::HashMap;

const LOG_TAG: &str = "Transformer";

type Transformation = Box<dyn Fn(Option<Value>) -> Option<Value> + Send + Sync>;

/// 默认变换器
pub struct DefaultTransformer {
    transformations: HashMap<String, Transformation>,
}

impl DefaultTransformer {
    pub fn new() -> Self {
        let mut transformer = Self {
            transformations: HashMap::new(),
        };
        transformer.register("int", to_int);
        transformer.register("double", to_double);
        transformer.register("string", to_string);
        transformer.register("bool", to_bool);
        transformer.register("urlenc", url_encode);
        transformer
    }

    /// 注册（或覆盖）命名函数
    pub fn register<F>(&mut self, name: impl Into<String>, transformation: F)
    where
        F: Fn(Option<Value>) -> Option<Value> + Send + Sync + 'static,
    {
        self.transformations
            .insert(name.into(), Box::new(transformation));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.transformations.contains_key(name)
    }
}

impl Default for DefaultTransformer {
    fn default() -> Self {
        Self::new()
    }
}

impl Transforming for DefaultTransformer {
    fn transform(&self, name: &str, value: Option<Value>) -> Option<Value> {
        match self.transformations.get(name) {
            Some(transformation) => transformation(value),
            None => {
                logging::verbose(LOG_TAG, &format!("Unknown transformation '{}'", name));
                value
            }
        }
    }
}

fn to_int(value: Option<Value>) -> Option<Value> {
    let converted = match &value {
        Some(Value::String(s)) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f as i64))
        }
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Some(Value::Bool(b)) => Some(i64::from(*b)),
        _ => None,
    };
    converted.map(Value::from).or(value)
}

fn to_double(value: Option<Value>) -> Option<Value> {
    let converted = match &value {
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::Bool(b)) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    };
    converted.map(Value::from).or(value)
}

fn to_string(value: Option<Value>) -> Option<Value> {
    match value {
        Some(Value::String(s)) => Some(Value::String(s)),
        Some(other) => Some(Value::String(other.to_string())),
        None => None,
    }
}

fn to_bool(value: Option<Value>) -> Option<Value> {
    match value {
        Some(Value::String(s)) => Some(Value::Bool(s.trim().eq_ignore_ascii_case("true"))),
        Some(Value::Number(n)) => Some(Value::Bool(n.as_f64() == Some(1.0))),
        other => other,
    }
}

fn url_encode(value: Option<Value>) -> Option<Value> {
    match value {
        Some(Value::String(s)) => Some(Value::String(urlencoding::encode(&s).into_owned())),
        other => other,
    }
}
