//! 业务逻辑处理 (Update/Dispatch)
//!
//! 包含核心的 dispatch 逻辑和各种业务处理方法

use uuid::Uuid;

use super::actions::Action;
use super::state::{App, AppMode};
use crate::clipboard::{self, ClipboardError};
use crate::session::{SubmitError, Submission};
use crate::worker::Completion;

const SCROLL_STEP: u16 = 5;

/// dispatch 之后需要主循环执行的副作用
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    Quit,
    Send(Submission),
    Cancel(Uuid),
}

impl App {
    /// 核心逻辑分发
    pub fn dispatch(&mut self, action: Action) -> Effect {
        match action {
            Action::Quit => return Effect::Quit,
            Action::Submit => return self.submit(),

            Action::Input(c) => self.input_buffer.push(c),
            Action::Newline => self.input_buffer.push('\n'),
            Action::DeleteChar => {
                self.input_buffer.pop();
                return self.cancel_if_emptied();
            }
            Action::PasteText(text) => {
                self.input_buffer
                    .push_str(&clipboard::normalize_line_endings(&text));
            }

            Action::CopyInput => self.copy_input(),
            Action::CutInput => return self.cut_input(),
            Action::PasteClipboard => self.paste_clipboard(),
            Action::ClearAll => return self.clear_all(),

            Action::ToggleRawResponse => self.toggle_raw_response(),
            Action::Close => self.mode = AppMode::Editing,
            Action::ScrollResultUp => {
                self.result_scroll = self.result_scroll.saturating_sub(SCROLL_STEP);
            }
            Action::ScrollResultDown => {
                self.result_scroll = self.result_scroll.saturating_add(SCROLL_STEP);
            }
        }
        Effect::None
    }

    // ============ 提交相关 ============

    /// 提交当前输入
    pub fn submit(&mut self) -> Effect {
        match self.session.begin_submit(&self.input_buffer) {
            Ok(submission) => {
                self.result_scroll = 0;
                self.mode = AppMode::Editing;
                self.message = None;
                Effect::Send(submission)
            }
            Err(SubmitError::InFlight) => {
                self.message = Some("Validation already in progress".to_string());
                Effect::None
            }
            Err(SubmitError::EmptyInput) => Effect::None,
        }
    }

    /// 应用后台请求结果，过期结果直接丢弃
    pub fn apply_completion(&mut self, completion: Completion) -> bool {
        let applied = self
            .session
            .complete(completion.ticket, completion.outcome);
        if applied {
            self.result_scroll = 0;
        }
        applied
    }

    // ============ 工具栏相关 ============

    /// 复制输入内容
    pub fn copy_input(&mut self) {
        match clipboard::copy(self.clipboard.as_mut(), &self.input_buffer) {
            Ok(true) => self.message = Some("Copied to clipboard".to_string()),
            Ok(false) => {}
            Err(err) => self.report_clipboard_error("copy", &err),
        }
    }

    /// 剪切输入内容；清空输入等同于重置在途请求
    pub fn cut_input(&mut self) -> Effect {
        match clipboard::cut(self.clipboard.as_mut(), &mut self.input_buffer) {
            Ok(true) => {
                self.message = Some("Cut to clipboard".to_string());
                return self.cancel_if_emptied();
            }
            Ok(false) => {}
            Err(err) => self.report_clipboard_error("cut", &err),
        }
        Effect::None
    }

    /// 从剪贴板粘贴到末尾
    pub fn paste_clipboard(&mut self) {
        match clipboard::paste(self.clipboard.as_mut(), &mut self.input_buffer) {
            Ok(count) => self.message = Some(format!("Pasted {count} characters")),
            Err(err) => self.report_clipboard_error("paste", &err),
        }
    }

    /// 清空输入、结果和错误
    pub fn clear_all(&mut self) -> Effect {
        self.input_buffer.clear();
        self.message = None;
        self.reset_session()
    }

    /// 输入被删空时作废在途请求
    fn cancel_if_emptied(&mut self) -> Effect {
        if self.input_buffer.is_empty() && self.session.is_submitting() {
            return self.reset_session();
        }
        Effect::None
    }

    fn reset_session(&mut self) -> Effect {
        self.mode = AppMode::Editing;
        self.result_scroll = 0;
        match self.session.reset() {
            Some(ticket) => Effect::Cancel(ticket),
            None => Effect::None,
        }
    }

    fn report_clipboard_error(&mut self, op: &str, err: &ClipboardError) {
        tracing::warn!(op, error = %err, "clipboard operation failed");
        self.message = Some(format!("Failed to {op}: {err}"));
    }

    // ============ 结果区相关 ============

    /// 打开/关闭原始响应弹窗
    pub fn toggle_raw_response(&mut self) {
        self.mode = match self.mode {
            AppMode::RawResponse => AppMode::Editing,
            AppMode::Editing if self.session.result().is_some() => AppMode::RawResponse,
            AppMode::Editing => {
                self.message = Some("No server response to show yet".to_string());
                AppMode::Editing
            }
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::tests::MemoryClipboard;
    use crate::models::VerdictSet;
    use crate::normalizer::normalize;
    use crate::session::Phase;
    use serde_json::json;

    fn app() -> App {
        App::new(Box::new(MemoryClipboard::default()))
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.dispatch(Action::Input(c));
        }
    }

    fn completion_for(ticket: Uuid) -> Completion {
        Completion {
            ticket,
            outcome: Ok(normalize(
                Some(&json!({"message": "ok", "data": {"verdict": "Real", "claim": "X"}})),
                &VerdictSet::default(),
            )),
        }
    }

    #[test]
    fn submit_emits_request_and_blocks_second() {
        let mut app = app();
        type_text(&mut app, "Water is wet");
        let Effect::Send(sub) = app.dispatch(Action::Submit) else {
            panic!("expected a request");
        };
        assert_eq!(sub.text, "Water is wet");
        assert!(!app.can_submit());

        assert_eq!(app.dispatch(Action::Submit), Effect::None);
        assert_eq!(app.message.as_deref(), Some("Validation already in progress"));

        assert!(app.apply_completion(completion_for(sub.ticket)));
        let result = app.session.result().unwrap();
        assert!(result.is_true());
        assert_eq!(result.parsed_data().unwrap()["claim"], "X");
        assert!(app.can_submit());
    }

    #[test]
    fn blank_submit_shows_validation_error() {
        let mut app = app();
        type_text(&mut app, "   ");
        assert_eq!(app.dispatch(Action::Submit), Effect::None);
        assert_eq!(
            app.session.failure().unwrap().message(),
            "Please enter some text to validate"
        );
    }

    #[test]
    fn clear_all_during_request_cancels_and_ignores_late_response() {
        let mut app = app();
        type_text(&mut app, "claim");
        let Effect::Send(sub) = app.dispatch(Action::Submit) else {
            panic!("expected a request");
        };

        assert_eq!(app.dispatch(Action::ClearAll), Effect::Cancel(sub.ticket));
        assert!(app.input_buffer.is_empty());
        assert!(!app.apply_completion(completion_for(sub.ticket)));
        assert_eq!(app.session.phase(), &Phase::Idle);
    }

    #[test]
    fn cut_during_request_cancels_it() {
        let mut app = app();
        type_text(&mut app, "claim");
        let Effect::Send(sub) = app.dispatch(Action::Submit) else {
            panic!("expected a request");
        };
        assert_eq!(app.dispatch(Action::CutInput), Effect::Cancel(sub.ticket));
        assert!(app.input_buffer.is_empty());
    }

    #[test]
    fn deleting_input_to_empty_cancels_request() {
        let mut app = app();
        type_text(&mut app, "ab");
        let Effect::Send(sub) = app.dispatch(Action::Submit) else {
            panic!("expected a request");
        };
        assert_eq!(app.dispatch(Action::DeleteChar), Effect::None);
        assert!(app.session.is_submitting());
        assert_eq!(app.dispatch(Action::DeleteChar), Effect::Cancel(sub.ticket));
        assert_eq!(app.session.phase(), &Phase::Idle);
        assert!(!app.apply_completion(completion_for(sub.ticket)));
    }

    #[test]
    fn deleting_input_keeps_finished_result() {
        let mut app = app();
        type_text(&mut app, "a");
        let Effect::Send(sub) = app.dispatch(Action::Submit) else {
            panic!("expected a request");
        };
        app.apply_completion(completion_for(sub.ticket));
        assert_eq!(app.dispatch(Action::DeleteChar), Effect::None);
        assert!(app.session.result().is_some());
    }

    #[test]
    fn clipboard_round_trip_through_actions() {
        let mut app = app();
        type_text(&mut app, "abc");
        app.dispatch(Action::CutInput);
        assert!(app.input_buffer.is_empty());
        app.dispatch(Action::PasteClipboard);
        app.dispatch(Action::PasteClipboard);
        assert_eq!(app.input_buffer, "abcabc");
        assert_eq!(app.message.as_deref(), Some("Pasted 3 characters"));
    }

    #[test]
    fn clipboard_failure_becomes_status_message() {
        let mut app = App::new(Box::new(MemoryClipboard {
            broken: true,
            ..Default::default()
        }));
        type_text(&mut app, "abc");
        app.dispatch(Action::CopyInput);
        assert_eq!(
            app.message.as_deref(),
            Some("Failed to copy: clipboard unavailable: no display")
        );
        assert_eq!(app.input_buffer, "abc");
    }

    #[test]
    fn editing_keys_modify_buffer() {
        let mut app = app();
        type_text(&mut app, "ab");
        app.dispatch(Action::Newline);
        app.dispatch(Action::PasteText("c\r\nd".to_string()));
        app.dispatch(Action::DeleteChar);
        assert_eq!(app.input_buffer, "ab\nc\n");
        assert_eq!(app.char_count(), 5);
    }

    #[test]
    fn raw_response_requires_a_result() {
        let mut app = app();
        app.dispatch(Action::ToggleRawResponse);
        assert_eq!(app.mode, AppMode::Editing);

        type_text(&mut app, "claim");
        let Effect::Send(sub) = app.dispatch(Action::Submit) else {
            panic!("expected a request");
        };
        app.apply_completion(completion_for(sub.ticket));
        app.dispatch(Action::ToggleRawResponse);
        assert_eq!(app.mode, AppMode::RawResponse);
        app.dispatch(Action::Close);
        assert_eq!(app.mode, AppMode::Editing);
    }

    #[test]
    fn scrolling_saturates_at_top() {
        let mut app = app();
        app.dispatch(Action::ScrollResultUp);
        assert_eq!(app.result_scroll, 0);
        app.dispatch(Action::ScrollResultDown);
        app.dispatch(Action::ScrollResultDown);
        app.dispatch(Action::ScrollResultUp);
        assert_eq!(app.result_scroll, SCROLL_STEP);
    }
}
