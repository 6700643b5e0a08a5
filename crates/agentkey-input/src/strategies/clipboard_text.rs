use agentkey_platform::Clipboard;

use crate::content::{InputContent, InputKind};
use crate::strategy::CaptureStrategy;

/// Captures text the user already copied to the clipboard.
///
/// A whitespace-only clipboard counts as unavailable.
pub struct TextSelectionStrategy;

impl TextSelectionStrategy {
    pub fn new() -> Self {
        Self
    }

    fn read_non_blank() -> Option<String> {
        let mut clipboard = Clipboard::new().ok()?;
        let text = clipboard.get_text().ok()?;
        let trimmed = text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}

impl Default for TextSelectionStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptureStrategy for TextSelectionStrategy {
    fn kind(&self) -> InputKind {
        InputKind::TextSelection
    }

    fn is_available(&mut self) -> bool {
        Self::read_non_blank().is_some()
    }

    fn capture(&mut self) -> Option<InputContent> {
        let text = Self::read_non_blank()?;
        tracing::info!("captured clipboard text ({} chars)", text.len());
        Some(
            InputContent::new(InputKind::TextSelection)
                .with_meta("source", "clipboard")
                .with_meta("char_count", text.len())
                .with_meta("word_count", text.split_whitespace().count())
                .with_text(text),
        )
    }
}
