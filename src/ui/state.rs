//! App 状态定义 (Model)
//!
//! 包含应用状态结构体及相关枚举

use crate::clipboard::Clipboard;
use crate::session::Session;

/// 应用状态
pub struct App {
    pub input_buffer: String,
    pub session: Session,
    pub mode: AppMode,
    pub result_scroll: u16,
    pub message: Option<String>, // 底部状态栏提示
    pub clipboard: Box<dyn Clipboard>,
}

/// 应用模式
#[derive(Debug, Clone, PartialEq)]
pub enum AppMode {
    Editing,
    RawResponse, // 原始响应弹窗
}

impl App {
    /// 创建新的应用实例
    pub fn new(clipboard: Box<dyn Clipboard>) -> Self {
        Self {
            input_buffer: String::new(),
            session: Session::new(),
            mode: AppMode::Editing,
            result_scroll: 0,
            message: None,
            clipboard,
        }
    }

    /// 输入框下方的字符计数
    pub fn char_count(&self) -> usize {
        self.input_buffer.chars().count()
    }

    /// 提交按钮是否可用
    pub fn can_submit(&self) -> bool {
        !self.session.is_submitting() && !self.input_buffer.trim().is_empty()
    }
}
