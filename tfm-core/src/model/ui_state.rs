//! UI state that is not a panel: status notification, the text-entry prompt
//! and the clipboard.

use std::fmt;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use compact_str::CompactString;

use crate::drives::mount_controller::MountOp;

/// Notification levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum NotificationLevel {
    Info = 0,
    Success = 1,
    Warning = 2,
    Error = 3,
}

/// Status message with timestamp
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: CompactString,
    pub level: NotificationLevel,
    pub timestamp: Instant,
    pub auto_dismiss: Duration,
}

impl Notification {
    #[must_use]
    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.timestamp) >= self.auto_dismiss
    }
}

/// What a submitted prompt is for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptKind {
    /// `f name` / `d name` in the working directory.
    Create,
    Rename { from: PathBuf },
    Search,
    /// Shell command run against the selected file.
    Command { file: PathBuf },
    /// Password for an escalated mount or unmount of `device`.
    Credential { device: CompactString, op: MountOp },
}

/// Single-line text entry. Masked prompts render as `*` and redact their
/// text from `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct Prompt {
    pub kind: PromptKind,
    pub title: CompactString,
    text: String,
    /// Byte offset into `text`, always on a char boundary.
    cursor: usize,
    masked: bool,
}

impl Prompt {
    pub fn new(kind: PromptKind, title: impl Into<CompactString>) -> Self {
        let masked = matches!(kind, PromptKind::Credential { .. });
        Self {
            kind,
            title: title.into(),
            text: String::new(),
            cursor: 0,
            masked,
        }
    }

    /// Prompt pre-filled with `text`, cursor at the end.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self.cursor = self.text.len();
        self
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn into_text(self) -> String {
        self.text
    }

    #[must_use]
    pub const fn is_masked(&self) -> bool {
        self.masked
    }

    /// What the overlay shows.
    #[must_use]
    pub fn display_text(&self) -> String {
        if self.masked {
            "*".repeat(self.text.chars().count())
        } else {
            self.text.clone()
        }
    }

    /// Cursor column in display cells (one cell per char).
    #[must_use]
    pub fn cursor_column(&self) -> usize {
        self.text[..self.cursor].chars().count()
    }

    pub fn insert_char(&mut self, ch: char) {
        self.text.insert(self.cursor, ch);
        self.cursor += ch.len_utf8();
    }

    pub fn delete_char_before(&mut self) -> bool {
        let Some((pos, _)) = self.text[..self.cursor].char_indices().next_back() else {
            return false;
        };
        self.text.remove(pos);
        self.cursor = pos;
        true
    }

    pub fn delete_char_at(&mut self) -> bool {
        if self.cursor >= self.text.len() {
            return false;
        }
        self.text.remove(self.cursor);
        true
    }

    pub fn move_left(&mut self) {
        if let Some((pos, _)) = self.text[..self.cursor].char_indices().next_back() {
            self.cursor = pos;
        }
    }

    pub fn move_right(&mut self) {
        if let Some(ch) = self.text[self.cursor..].chars().next() {
            self.cursor += ch.len_utf8();
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.text.len();
    }
}

impl fmt::Debug for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text: &str = if self.masked { "<redacted>" } else { &self.text };
        f.debug_struct("Prompt")
            .field("kind", &self.kind)
            .field("title", &self.title)
            .field("text", &text)
            .field("cursor", &self.cursor)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipMode {
    Copy,
    Cut,
}

/// One path waiting to be pasted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clipboard {
    pub path: PathBuf,
    pub mode: ClipMode,
}

#[derive(Debug, Clone)]
pub struct UIState {
    pub notification: Option<Notification>,
    pub prompt: Option<Prompt>,
    pub clipboard: Option<Clipboard>,
    message_duration: Duration,
}

impl UIState {
    #[must_use]
    pub const fn new(message_duration: Duration) -> Self {
        Self {
            notification: None,
            prompt: None,
            clipboard: None,
            message_duration,
        }
    }

    pub fn show_notification(&mut self, message: impl Into<CompactString>, level: NotificationLevel) {
        self.notification = Some(Notification {
            message: message.into(),
            level,
            timestamp: Instant::now(),
            auto_dismiss: self.message_duration,
        });
    }

    #[inline]
    pub fn show_info(&mut self, message: impl Into<CompactString>) {
        self.show_notification(message, NotificationLevel::Info);
    }

    #[inline]
    pub fn show_success(&mut self, message: impl Into<CompactString>) {
        self.show_notification(message, NotificationLevel::Success);
    }

    #[inline]
    pub fn show_warning(&mut self, message: impl Into<CompactString>) {
        self.show_notification(message, NotificationLevel::Warning);
    }

    #[inline]
    pub fn show_error(&mut self, message: impl Into<CompactString>) {
        self.show_notification(message, NotificationLevel::Error);
    }

    // Auto-dismiss notifications
    pub fn update_notification(&mut self, now: Instant) -> bool {
        if self.notification.as_ref().is_some_and(|n| n.is_expired(now)) {
            self.notification = None;
            return true;
        }
        false
    }

    pub fn open_prompt(&mut self, prompt: Prompt) {
        self.prompt = Some(prompt);
    }

    /// Close the prompt and hand back what was typed.
    pub fn take_prompt(&mut self) -> Option<Prompt> {
        self.prompt.take()
    }
}
