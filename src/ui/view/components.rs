//! 通用 UI 组件
//!
//! 对话框、输入框、结果内容等组件

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use serde_json::Value;

use crate::format::{self, FieldView, TextBlock};
use crate::models::{NormalizedResult, ResultBody, Verdict};

const FIELD_INDENT: &str = "  │ ";

/// [组件] 弹窗基础框架
pub fn render_dialog_framework(frame: &mut Frame, area: Rect, title: &str) -> Rect {
    frame.render_widget(Clear, area);
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    inner
}

/// [组件] 带有标题、底部提示和样式的输入框
pub fn render_input_widget(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    footer: &str,
    value: &str,
    is_focused: bool,
    active_color: Color,
) {
    let border_style = if is_focused {
        Style::default()
            .fg(active_color)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };

    let input = Paragraph::new(value)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title(title)
                .title_bottom(footer)
                .borders(Borders::ALL)
                .border_style(border_style),
        );
    frame.render_widget(input, area);
}

/// 规范化结果对应的全部行
pub fn result_lines(result: &NormalizedResult) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    if !result.message().is_empty() {
        lines.push(Line::styled(
            "Server Response:",
            Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
        ));
        lines.push(Line::styled(
            result.message().to_string(),
            Style::default().fg(Color::Blue),
        ));
        lines.push(Line::default());
    }

    match result.body() {
        ResultBody::Structured { data, verdict, .. } => {
            lines.push(verdict_heading(verdict));
            if let Some(claim) = data.get("claim").and_then(Value::as_str) {
                lines.push(Line::styled(
                    format!("Claim: \"{claim}\""),
                    Style::default().fg(Color::Gray),
                ));
            }
            lines.push(Line::default());
            lines.push(Line::styled(
                "Detailed Analysis",
                Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            ));
            for field in format::fields(data) {
                lines.push(Line::styled(
                    format!("{}:", field.title),
                    Style::default().add_modifier(Modifier::BOLD),
                ));
                lines.extend(field_lines(&field.view));
                lines.push(Line::default());
            }
        }
        ResultBody::Empty | ResultBody::RawFallback { .. } => {
            let warn = Style::default().fg(Color::Yellow);
            lines.push(Line::styled(
                "⚠ Response Received",
                warn.add_modifier(Modifier::BOLD),
            ));
            lines.push(Line::styled(
                "The server responded but the data format is not as expected or is null.",
                warn,
            ));
            lines.push(Line::default());
            lines.push(Line::styled("Raw Data:", warn.add_modifier(Modifier::BOLD)));
            lines.extend(
                result
                    .raw_data()
                    .lines()
                    .map(|l| Line::raw(l.to_string())),
            );
        }
    }

    lines
}

fn verdict_heading(verdict: &Verdict) -> Line<'static> {
    let (icon, color) = if verdict.is_true() {
        ("✓", Color::Green)
    } else {
        ("✗", Color::Red)
    };
    Line::from(vec![
        Span::styled(
            format!("{icon} "),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            "Validation Result: ",
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            verdict.label().unwrap_or("Unknown").to_string(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
    ])
}

fn field_lines(view: &FieldView) -> Vec<Line<'static>> {
    let indented = |text: String| Line::raw(format!("{FIELD_INDENT}{text}"));
    match view {
        FieldView::Text(blocks) => blocks
            .iter()
            .map(|block| match block {
                TextBlock::Numbered { number, text } => indented(format!("{number}. {text}")),
                TextBlock::Bullet(text) => indented(format!("• {text}")),
                TextBlock::Paragraph(text) => indented(text.clone()),
            })
            .collect(),
        FieldView::List(items) => items
            .iter()
            .flat_map(|item| {
                item.lines()
                    .enumerate()
                    .map(|(i, l)| {
                        if i == 0 {
                            indented(format!("• {l}"))
                        } else {
                            indented(format!("  {l}"))
                        }
                    })
                    .collect::<Vec<_>>()
            })
            .collect(),
        FieldView::Json(json) => json
            .lines()
            .map(|l| {
                Line::styled(
                    format!("{FIELD_INDENT}{l}"),
                    Style::default().fg(Color::DarkGray),
                )
            })
            .collect(),
        FieldView::Scalar(value) => vec![indented(value.clone())],
    }
}

/// 原始响应弹窗里的 JSON
pub fn raw_response_text(result: &NormalizedResult) -> String {
    serde_json::to_string_pretty(&result.snapshot())
        .unwrap_or_else(|e| format!("failed to serialize response: {e}"))
}
