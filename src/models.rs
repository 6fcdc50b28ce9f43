use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 没有 data 字段时展示的占位文本
pub const NO_DATA_PLACEHOLDER: &str = "No data received from server";

/// 默认的"真"判定集合
pub const DEFAULT_TRUTHY_VERDICTS: [&str; 3] = ["true", "real", "valid"];

/// 判定为"真"的 verdict 集合（大小写不敏感）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerdictSet {
    truthy: BTreeSet<String>,
}

impl VerdictSet {
    pub fn new<I, S>(verdicts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            truthy: verdicts
                .into_iter()
                .map(|v| v.as_ref().trim().to_lowercase())
                .filter(|v| !v.is_empty())
                .collect(),
        }
    }

    pub fn is_truthy(&self, verdict: &str) -> bool {
        self.truthy.contains(&verdict.trim().to_lowercase())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.truthy.iter().map(String::as_str)
    }
}

impl Default for VerdictSet {
    fn default() -> Self {
        Self::new(DEFAULT_TRUTHY_VERDICTS)
    }
}

/// 服务端给出的判定
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    /// 没有 verdict 字段，或者不是字符串
    Missing,
    Label { text: String, truthy: bool },
}

impl Verdict {
    pub fn is_true(&self) -> bool {
        matches!(self, Verdict::Label { truthy: true, .. })
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            Verdict::Missing => None,
            Verdict::Label { text, .. } => Some(text),
        }
    }
}

/// 结果主体：三种形态互斥
#[derive(Debug, Clone, PartialEq)]
pub enum ResultBody {
    /// data 缺失或为假值
    Empty,
    /// data 可以解释为对象
    Structured {
        data: Map<String, Value>,
        raw: String,
        verdict: Verdict,
    },
    /// data 存在但不是对象，原样保留
    RawFallback { raw: String },
}

/// 规范化后的服务端响应，生成后不可变
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedResult {
    message: String,
    body: ResultBody,
}

impl NormalizedResult {
    pub fn new(message: String, body: ResultBody) -> Self {
        Self { message, body }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn body(&self) -> &ResultBody {
        &self.body
    }

    pub fn raw_data(&self) -> &str {
        match &self.body {
            ResultBody::Empty => NO_DATA_PLACEHOLDER,
            ResultBody::Structured { raw, .. } | ResultBody::RawFallback { raw } => raw,
        }
    }

    pub fn parsed_data(&self) -> Option<&Map<String, Value>> {
        match &self.body {
            ResultBody::Structured { data, .. } => Some(data),
            _ => None,
        }
    }

    pub fn verdict(&self) -> Option<&Verdict> {
        match &self.body {
            ResultBody::Structured { verdict, .. } => Some(verdict),
            _ => None,
        }
    }

    pub fn is_true(&self) -> bool {
        self.verdict().is_some_and(Verdict::is_true)
    }

    pub fn has_valid_data(&self) -> bool {
        matches!(self.body, ResultBody::Structured { .. })
    }

    /// 调试面板用的快照
    pub fn snapshot(&self) -> ResultSnapshot<'_> {
        ResultSnapshot {
            message: self.message(),
            data: self.raw_data(),
            has_valid_data: self.has_valid_data(),
            is_true: self.is_true(),
        }
    }
}

/// 原始响应面板的 JSON 结构
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultSnapshot<'a> {
    pub message: &'a str,
    pub data: &'a str,
    pub has_valid_data: bool,
    pub is_true: bool,
}

/// 发往校验服务的请求体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationRequest {
    pub text: String,
}
