//! 结果展示用的文本格式化
//!
//! 识别编号行、项目符号行，把字段名转成标题，按值的形状决定展示方式。

use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextBlock {
    /// `1. xxx`，保留原编号
    Numbered { number: String, text: String },
    /// `• xxx` / `- xxx` / `* xxx`
    Bullet(String),
    Paragraph(String),
}

/// 字段值的展示形态
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldView {
    Text(Vec<TextBlock>),
    List(Vec<String>),
    Json(String),
    Scalar(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub title: String,
    pub view: FieldView,
}

/// 按行切分文本并识别列表项，空行丢弃
pub fn format_text(text: &str) -> Vec<TextBlock> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(classify_line)
        .collect()
}

fn classify_line(line: &str) -> TextBlock {
    if let Some((number, rest)) = split_numbered(line) {
        return TextBlock::Numbered {
            number: number.to_string(),
            text: rest.to_string(),
        };
    }
    for marker in ['•', '-', '*'] {
        if let Some(rest) = line.strip_prefix(marker) {
            if rest.starts_with(char::is_whitespace) {
                return TextBlock::Bullet(rest.trim_start().to_string());
            }
        }
    }
    TextBlock::Paragraph(line.to_string())
}

/// `12. text` -> ("12", "text")
fn split_numbered(line: &str) -> Option<(&str, &str)> {
    let digits = line.len() - line.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        return None;
    }
    let rest = line[digits..].strip_prefix('.')?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    Some((&line[..digits], rest.trim_start()))
}

/// `claimText` -> `Claim Text`
pub fn humanize_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for (i, c) in key.chars().enumerate() {
        if i == 0 {
            out.extend(c.to_uppercase());
        } else if c.is_uppercase() {
            out.push(' ');
            out.push(c);
        } else {
            out.push(c);
        }
    }
    out
}

pub fn field_view(value: &Value) -> FieldView {
    match value {
        Value::String(s) => FieldView::Text(format_text(s)),
        Value::Array(items) => FieldView::List(
            items
                .iter()
                .map(|item| match item {
                    Value::Object(_) | Value::Array(_) => pretty(item),
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect(),
        ),
        Value::Object(_) => FieldView::Json(pretty(value)),
        Value::Null => FieldView::Scalar("null".to_string()),
        Value::Bool(b) => FieldView::Scalar(b.to_string()),
        Value::Number(n) => FieldView::Scalar(n.to_string()),
    }
}

/// 对象的全部字段，保持原顺序
pub fn fields(data: &Map<String, Value>) -> Vec<Field> {
    data.iter()
        .map(|(key, value)| Field {
            title: humanize_key(key),
            view: field_view(value),
        })
        .collect()
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn detects_numbered_and_bulleted_lines() {
        let blocks = format_text("Summary line\n\n1. First point\n  2.  Second\n• dot\n- dash\n* star\n");
        assert_eq!(
            blocks,
            vec![
                TextBlock::Paragraph("Summary line".to_string()),
                TextBlock::Numbered {
                    number: "1".to_string(),
                    text: "First point".to_string()
                },
                TextBlock::Numbered {
                    number: "2".to_string(),
                    text: "Second".to_string()
                },
                TextBlock::Bullet("dot".to_string()),
                TextBlock::Bullet("dash".to_string()),
                TextBlock::Bullet("star".to_string()),
            ]
        );
    }

    #[test]
    fn near_misses_stay_paragraphs() {
        let blocks = format_text("3.5 million people\n-5 degrees\n2024.\n*emphasis*");
        assert!(blocks.iter().all(|b| matches!(b, TextBlock::Paragraph(_))));
        assert_eq!(blocks.len(), 4);
    }

    #[test]
    fn humanizes_camel_case_keys() {
        assert_eq!(humanize_key("verdict"), "Verdict");
        assert_eq!(humanize_key("claimText"), "Claim Text");
        assert_eq!(humanize_key("confidenceScoreValue"), "Confidence Score Value");
        assert_eq!(humanize_key(""), "");
    }

    #[test]
    fn field_views_follow_value_shape() {
        assert_eq!(field_view(&json!(0.87)), FieldView::Scalar("0.87".to_string()));
        assert_eq!(field_view(&json!(true)), FieldView::Scalar("true".to_string()));
        assert_eq!(
            field_view(&json!(["a", 2, {"k": "v"}])),
            FieldView::List(vec![
                "a".to_string(),
                "2".to_string(),
                "{\n  \"k\": \"v\"\n}".to_string()
            ])
        );
        assert_eq!(
            field_view(&json!({"k": 1})),
            FieldView::Json("{\n  \"k\": 1\n}".to_string())
        );
        assert_eq!(
            field_view(&json!("- one\n- two")),
            FieldView::Text(vec![
                TextBlock::Bullet("one".to_string()),
                TextBlock::Bullet("two".to_string())
            ])
        );
    }

    #[test]
    fn fields_keep_every_key() {
        let data = json!({"verdict": "fake", "claimText": "X", "sources": []});
        let Value::Object(map) = data else {
            unreachable!()
        };
        let titles: Vec<_> = fields(&map).into_iter().map(|f| f.title).collect();
        assert_eq!(titles.len(), 3);
        assert!(titles.contains(&"Claim Text".to_string()));
        assert!(titles.contains(&"Sources".to_string()));
    }

    #[test]
    fn fields_follow_server_key_order() {
        let map: Map<String, Value> =
            serde_json::from_str(r#"{"verdict":"fake","claim":"X","analysis":"Y"}"#).unwrap();
        let titles: Vec<_> = fields(&map).into_iter().map(|f| f.title).collect();
        assert_eq!(titles, ["Verdict", "Claim", "Analysis"]);
    }
}
