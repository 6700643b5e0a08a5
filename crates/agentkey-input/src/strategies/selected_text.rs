use agentkey_platform::{Clipboard, KeySynth};

use crate::content::{InputContent, InputKind};
use crate::strategy::CaptureStrategy;

/// Captures the current mouse selection by synthesizing a copy chord.
///
/// Sequence: save the clipboard, send Ctrl+C, wait for propagation, read,
/// restore the original clipboard. Known ambiguity: if nothing was
/// selected the copy is a no-op and the read returns the pre-existing
/// clipboard text; the caller cannot tell the difference. Availability is
/// always reported true because probing would itself disturb the
/// clipboard; capture reports emptiness instead.
pub struct SelectedTextStrategy;

impl SelectedTextStrategy {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SelectedTextStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptureStrategy for SelectedTextStrategy {
    fn kind(&self) -> InputKind {
        InputKind::SelectedText
    }

    fn is_available(&mut self) -> bool {
        true
    }

    fn capture(&mut self) -> Option<InputContent> {
        let mut clipboard = Clipboard::new().ok()?;
        let saved = clipboard.get_text().ok();

        if let Err(e) = KeySynth::send_copy_chord() {
            tracing::warn!("copy chord failed: {e}");
            return None;
        }

        let text = clipboard.get_text().ok();

        if let Some(ref original) = saved {
            if let Err(e) = clipboard.set_text(original) {
                tracing::warn!("failed to restore clipboard: {e}");
            }
        }

        let text = text?;
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }

        tracing::info!("captured mouse selection ({} chars)", trimmed.len());
        Some(
            InputContent::new(InputKind::SelectedText)
                .with_meta("source", "mouse_selection")
                .with_meta("char_count", trimmed.len())
                .with_meta("word_count", trimmed.split_whitespace().count())
                .with_text(trimmed.to_string()),
        )
    }
}
