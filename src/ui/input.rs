//! 键盘事件映射 (Input -> Action)
//!
//! 将按键事件转换为 Action

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::actions::Action;
use super::logic::Effect;
use super::state::{App, AppMode};

/// 根据当前模式和按键获取对应的 Action
pub fn get_action(mode: &AppMode, key: KeyEvent) -> Option<Action> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);

    // 任何模式下都有效
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('c') if ctrl => return Some(Action::Quit),
        KeyCode::Char('r') if ctrl => return Some(Action::ToggleRawResponse),
        KeyCode::PageUp => return Some(Action::ScrollResultUp),
        KeyCode::PageDown => return Some(Action::ScrollResultDown),
        _ => {}
    }

    match mode {
        AppMode::Editing => match key.code {
            KeyCode::Esc => Some(Action::Quit),
            // Ctrl+Enter 与提交按钮等价；部分终端只能报告 Alt+Enter 或 Ctrl+S
            KeyCode::Enter if ctrl || alt => Some(Action::Submit),
            KeyCode::Char('s') if ctrl => Some(Action::Submit),
            KeyCode::Char('y') if ctrl => Some(Action::CopyInput),
            KeyCode::Char('x') if ctrl => Some(Action::CutInput),
            KeyCode::Char('v') if ctrl => Some(Action::PasteClipboard),
            KeyCode::Char('l') if ctrl => Some(Action::ClearAll),
            KeyCode::Enter => Some(Action::Newline),
            KeyCode::Backspace => Some(Action::DeleteChar),
            KeyCode::Tab => Some(Action::Input('\t')),
            KeyCode::Char(_) if ctrl || alt => None,
            KeyCode::Char(c) => Some(Action::Input(c)),
            _ => None,
        },
        AppMode::RawResponse => match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => Some(Action::Close),
            _ => None,
        },
    }
}

/// 处理按键事件
pub fn handle_key_event(app: &mut App, key: KeyEvent) -> Effect {
    match get_action(&app.mode, key) {
        Some(action) => app.dispatch(action),
        None => Effect::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn modified_enter_submits_plain_enter_breaks_line() {
        let mode = AppMode::Editing;
        assert_eq!(
            get_action(&mode, key(KeyCode::Enter, KeyModifiers::CONTROL)),
            Some(Action::Submit)
        );
        assert_eq!(
            get_action(&mode, key(KeyCode::Enter, KeyModifiers::ALT)),
            Some(Action::Submit)
        );
        assert_eq!(
            get_action(&mode, key(KeyCode::Char('s'), KeyModifiers::CONTROL)),
            Some(Action::Submit)
        );
        assert_eq!(
            get_action(&mode, key(KeyCode::Enter, KeyModifiers::NONE)),
            Some(Action::Newline)
        );
    }

    #[test]
    fn toolbar_shortcuts() {
        let mode = AppMode::Editing;
        let ctrl = |c| get_action(&mode, key(KeyCode::Char(c), KeyModifiers::CONTROL));
        assert_eq!(ctrl('y'), Some(Action::CopyInput));
        assert_eq!(ctrl('x'), Some(Action::CutInput));
        assert_eq!(ctrl('v'), Some(Action::PasteClipboard));
        assert_eq!(ctrl('l'), Some(Action::ClearAll));
        assert_eq!(ctrl('r'), Some(Action::ToggleRawResponse));
        assert_eq!(ctrl('q'), Some(Action::Quit));
        assert_eq!(ctrl('k'), None);
    }

    #[test]
    fn typed_characters_are_inserted() {
        let mode = AppMode::Editing;
        assert_eq!(
            get_action(&mode, key(KeyCode::Char('A'), KeyModifiers::SHIFT)),
            Some(Action::Input('A'))
        );
    }

    #[test]
    fn raw_response_popup_only_closes() {
        let mode = AppMode::RawResponse;
        assert_eq!(
            get_action(&mode, key(KeyCode::Char('a'), KeyModifiers::NONE)),
            None
        );
        assert_eq!(
            get_action(&mode, key(KeyCode::Esc, KeyModifiers::NONE)),
            Some(Action::Close)
        );
        assert_eq!(
            get_action(&mode, key(KeyCode::Char('r'), KeyModifiers::CONTROL)),
            Some(Action::ToggleRawResponse)
        );
    }
}
