//! 响应规范化
//!
//! 把服务端返回的任意形状 JSON 转成可直接渲染的 [`NormalizedResult`]，永不失败。

use serde_json::{Map, Value};

use crate::models::{NormalizedResult, ResultBody, Verdict, VerdictSet};

/// 规范化一次响应；`None` 表示没有拿到响应体
pub fn normalize(payload: Option<&Value>, verdicts: &VerdictSet) -> NormalizedResult {
    let message = payload
        .and_then(|p| p.get("message"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let body = match payload.and_then(|p| p.get("data")) {
        Some(data) if is_truthy(data) => resolve_body(data, verdicts),
        _ => ResultBody::Empty,
    };

    NormalizedResult::new(message, body)
}

fn resolve_body(data: &Value, verdicts: &VerdictSet) -> ResultBody {
    match data {
        Value::String(text) => match serde_json::from_str::<Value>(text) {
            Ok(Value::Object(map)) => structured(map, text.clone(), verdicts),
            _ => ResultBody::RawFallback { raw: text.clone() },
        },
        Value::Object(map) => structured(map.clone(), pretty(data), verdicts),
        other => ResultBody::RawFallback { raw: pretty(other) },
    }
}

fn structured(data: Map<String, Value>, raw: String, verdicts: &VerdictSet) -> ResultBody {
    // 非字符串的 verdict 只视为缺失，对象本身仍是有效数据
    let verdict = match data.get("verdict").and_then(Value::as_str) {
        Some(text) => Verdict::Label {
            truthy: verdicts.is_truthy(text),
            text: text.to_string(),
        },
        None => Verdict::Missing,
    };
    ResultBody::Structured { data, raw, verdict }
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// null、false、0、空字符串视为"没有数据"
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
