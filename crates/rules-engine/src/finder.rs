//! 基于 JSON 数据的变量查找

use crate::context::TokenFinder;
use serde_json::Value;

/// 在 JSON 数据上按点号路径查找变量
#[derive(Debug, Clone, Default)]
pub struct JsonTokenFinder {
    data: Value,
}

impl JsonTokenFinder {
    pub fn new(data: Value) -> Self {
        Self { data }
    }

    /// 从 JSON 字符串创建
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let data: Value = serde_json::from_str(json)?;
        Ok(Self { data })
    }

    /// 获取字段值（支持点号分隔的路径，如 "event.type" 或 "order.items.0.name"）
    ///
    /// 先按完整路径匹配顶层键（兼容已扁平化的数据），再逐段下钻。
    pub fn get_field(&self, path: &str) -> Option<&Value> {
        if let Some(value) = self.data.as_object().and_then(|map| map.get(path)) {
            return Some(value);
        }

        let mut current = &self.data;
        for part in path.split('.') {
            match current {
                Value::Object(map) => {
                    current = map.get(part)?;
                }
                Value::Array(arr) => {
                    let index: usize = part.parse().ok()?;
                    current = arr.get(index)?;
                }
                _ => return None,
            }
        }

        Some(current)
    }

    /// 获取底层数据
    pub fn data(&self) -> &Value {
        &self.data
    }
}

impl TokenFinder for JsonTokenFinder {
    fn get(&self, path: &str) -> Option<Value> {
        self.get_field(path).cloned()
    }
}
