//! 剪贴板
//!
//! 复制/剪切/粘贴只作用于输入缓冲区。

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClipboardError {
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),
    #[error("clipboard does not contain text")]
    Empty,
}

pub trait Clipboard {
    fn get_text(&mut self) -> Result<String, ClipboardError>;
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// 系统剪贴板，首次使用时才连接
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl SystemClipboard {
    fn handle(&mut self) -> Result<&mut arboard::Clipboard, ClipboardError> {
        if self.inner.is_none() {
            let clipboard =
                arboard::Clipboard::new().map_err(|e| ClipboardError::Unavailable(e.to_string()))?;
            self.inner = Some(clipboard);
        }
        self.inner
            .as_mut()
            .ok_or_else(|| ClipboardError::Unavailable("not initialized".to_string()))
    }
}

impl Clipboard for SystemClipboard {
    fn get_text(&mut self) -> Result<String, ClipboardError> {
        self.handle()?.get_text().map_err(|e| match e {
            arboard::Error::ContentNotAvailable => ClipboardError::Empty,
            other => ClipboardError::Unavailable(other.to_string()),
        })
    }

    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.handle()?
            .set_text(text.to_string())
            .map_err(|e| ClipboardError::Unavailable(e.to_string()))
    }
}

/// 复制输入内容；输入为空时返回 false
pub fn copy(clipboard: &mut dyn Clipboard, buffer: &str) -> Result<bool, ClipboardError> {
    if buffer.is_empty() {
        return Ok(false);
    }
    clipboard.set_text(buffer)?;
    Ok(true)
}

/// 剪切：先复制再清空，复制失败时缓冲区保持不变
pub fn cut(clipboard: &mut dyn Clipboard, buffer: &mut String) -> Result<bool, ClipboardError> {
    if !copy(clipboard, buffer)? {
        return Ok(false);
    }
    buffer.clear();
    Ok(true)
}

/// 粘贴：追加到缓冲区末尾，返回追加的字符数
pub fn paste(clipboard: &mut dyn Clipboard, buffer: &mut String) -> Result<usize, ClipboardError> {
    let text = normalize_line_endings(&clipboard.get_text()?);
    buffer.push_str(&text);
    Ok(text.chars().count())
}

pub fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}
