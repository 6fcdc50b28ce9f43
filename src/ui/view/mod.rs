//! 视图层模块
//!
//! 包含主渲染入口和各种视图组件

pub mod components;
pub mod layouts;

use chrono::Local;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph, Wrap},
};

use super::state::{App, AppMode};
use crate::session::Phase;
use components::{
    raw_response_text, render_dialog_framework, render_input_widget, result_lines,
};
use layouts::centered_rect;

/// 渲染 UI
pub fn render(frame: &mut Frame, app: &App) {
    let error = app.session.failure().map(|f| f.message());
    let error_height = if error.is_some() { 3 } else { 0 };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),            // 标题
            Constraint::Percentage(35),       // 输入
            Constraint::Length(error_height), // 错误
            Constraint::Min(6),               // 结果
            Constraint::Length(3),            // 帮助
        ])
        .split(frame.area());

    render_title(frame, chunks[0]);
    render_input(frame, app, chunks[1]);
    if let Some(error) = error {
        render_error(frame, &error, chunks[2]);
    }
    render_result(frame, app, chunks[3]);
    render_help(frame, app, chunks[4]);

    // 渲染弹窗
    if app.mode == AppMode::RawResponse {
        render_raw_response_dialog(frame, app);
    }
}

fn render_title(frame: &mut Frame, area: Rect) {
    let title = Paragraph::new("📰 News Validation Tool")
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(title, area);
}

fn render_input(frame: &mut Frame, app: &App, area: Rect) {
    let title = match app.session.phase() {
        Phase::Submitting { started_at, .. } => {
            let elapsed = (Local::now() - *started_at).num_seconds().max(0);
            format!("News Content ⏳ Validating... {elapsed}s")
        }
        _ => "News Content".to_string(),
    };
    let footer = if app.can_submit() {
        format!("{} characters | Press Ctrl+Enter to validate", app.char_count())
    } else {
        format!("{} characters", app.char_count())
    };
    render_input_widget(
        frame,
        area,
        &title,
        &footer,
        &app.input_buffer,
        app.mode == AppMode::Editing,
        Color::Yellow,
    );
}

fn render_error(frame: &mut Frame, message: &str, area: Rect) {
    let error = Paragraph::new(Line::from(message.to_string()))
        .style(Style::default().fg(Color::Red))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title("Error")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        );
    frame.render_widget(error, area);
}

fn render_result(frame: &mut Frame, app: &App, area: Rect) {
    let (title, lines, border) = match app.session.phase() {
        Phase::Success {
            result,
            completed_at,
        } => {
            let border = if !result.has_valid_data() {
                Color::Yellow
            } else if result.is_true() {
                Color::Green
            } else {
                Color::Red
            };
            (
                format!("Result ({})", completed_at.format("%H:%M:%S")),
                result_lines(result),
                border,
            )
        }
        Phase::Submitting { .. } => (
            "Result".to_string(),
            vec![Line::styled(
                "Waiting for the validation service...",
                Style::default().fg(Color::Gray),
            )],
            Color::Gray,
        ),
        Phase::Idle | Phase::Failed(_) => (
            "Result".to_string(),
            vec![Line::styled(
                "Paste or type news content above, then press Ctrl+Enter to analyze.",
                Style::default().fg(Color::Gray),
            )],
            Color::Gray,
        ),
    };

    let result = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((app.result_scroll, 0))
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border)),
        );
    frame.render_widget(result, area);
}

fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = match app.mode {
        AppMode::Editing => {
            "[Ctrl+Enter] validate  [Ctrl+V] paste  [Ctrl+Y] copy  [Ctrl+X] cut  [Ctrl+L] clear all  [Ctrl+R] raw response  [PgUp/PgDn] scroll  [Esc] quit"
        }
        AppMode::RawResponse => "[Esc/Enter] close  [PgUp/PgDn] scroll",
    };

    let message = app.message.as_deref().unwrap_or("");
    let text = if message.is_empty() {
        help_text.to_string()
    } else {
        format!("{}  |  {}", help_text, message)
    };

    let help = Paragraph::new(text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(help, area);
}

fn render_raw_response_dialog(frame: &mut Frame, app: &App) {
    let Some(result) = app.session.result() else {
        return;
    };
    let area = centered_rect(70, 60, frame.area());
    let inner = render_dialog_framework(frame, area, "🔍 Raw Server Response");

    let raw = Paragraph::new(raw_response_text(result))
        .style(Style::default().fg(Color::White))
        .wrap(Wrap { trim: false })
        .scroll((app.result_scroll, 0));
    frame.render_widget(raw, inner);
}
