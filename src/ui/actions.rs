//! Action 枚举定义 (Intent)
//!
//! 用户交互转化为明确的语义化 Action

/// 用户操作枚举
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Quit,
    Submit,

    // 输入缓冲区编辑
    Input(char),
    Newline,
    DeleteChar,
    PasteText(String), // 终端 bracketed paste

    // 工具栏
    CopyInput,
    CutInput,
    PasteClipboard,
    ClearAll,

    // 结果区
    ToggleRawResponse,
    ScrollResultUp,
    ScrollResultDown,
    Close, // 关闭原始响应弹窗
}
