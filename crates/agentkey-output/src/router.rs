//! Delivery mode dispatch.
//!
//! `handle` returns `true` only when the chosen side effect happened (or
//! its documented degraded form did); `false` means no delivery took
//! place. The router logs failures and never panics.

use std::fs;
use std::path::Path;
use std::time::Duration;

use tracing::{error, info, warn};

use agentkey_ai::AgentResult;
use agentkey_common::OutputMode;
use agentkey_platform::{Clipboard, KeySynth};

use crate::review::{ReviewDecision, ReviewHandler, ReviewRequest};

/// Extensions written as-is in file mode; anything else gets `.txt`
/// appended.
const SAFE_EXTENSIONS: [&str; 7] = [".txt", ".py", ".js", ".md", ".json", ".yaml", ".yml"];
const DEFAULT_FILENAME: &str = "output.txt";
/// Auto mode treats content above this many lines as file-worthy.
const AUTO_FILE_LINE_THRESHOLD: usize = 50;
/// Wait between clipboard write and synthesized paste.
const CLIPBOARD_SETTLE: Duration = Duration::from_millis(100);

/// Desktop side effects, separated out so the router is testable without
/// a real clipboard.
pub trait Desktop: Send {
    fn set_clipboard(&mut self, text: &str) -> bool;
    fn paste_at_cursor(&mut self) -> bool;
}

/// Real clipboard and key synthesis.
pub struct SystemDesktop;

impl Desktop for SystemDesktop {
    fn set_clipboard(&mut self, text: &str) -> bool {
        let result = match Clipboard::new() {
            Ok(mut clipboard) => clipboard.set_text(text),
            Err(e) => Err(e),
        };
        match result {
            Ok(()) => true,
            Err(e) => {
                error!("clipboard write failed: {e}");
                false
            }
        }
    }

    fn paste_at_cursor(&mut self) -> bool {
        match KeySynth::send_paste_chord() {
            Ok(()) => true,
            Err(e) => {
                warn!("paste synthesis failed: {e}");
                false
            }
        }
    }
}

pub struct OutputRouter {
    desktop: Box<dyn Desktop>,
    review: Option<Box<dyn ReviewHandler>>,
}

impl OutputRouter {
    pub fn new(review: Option<Box<dyn ReviewHandler>>) -> Self {
        Self::with_desktop(Box::new(SystemDesktop), review)
    }

    pub fn with_desktop(
        desktop: Box<dyn Desktop>,
        review: Option<Box<dyn ReviewHandler>>,
    ) -> Self {
        Self { desktop, review }
    }

    /// Deliver `result` through its mode. `context_folder` scopes file
    /// writes; without it, file deliveries fall back to the clipboard.
    pub fn handle(&mut self, result: &AgentResult, context_folder: Option<&str>) -> bool {
        info!("handling output with mode: {}", result.output_mode.as_str());

        match result.output_mode {
            OutputMode::Auto => self.handle_auto(result, context_folder),
            OutputMode::ClipboardPure => self.clipboard_pure(result),
            OutputMode::ClipboardRich => self.clipboard_rich(result),
            OutputMode::File => self.to_file(
                result.pure_content(),
                result.suggested_filename.as_deref(),
                context_folder,
            ),
            OutputMode::PasteAtCursor => self.paste_at_cursor(result),
            OutputMode::InteractiveEditor => self.interactive(result, context_folder),
        }
    }

    /// Infer a concrete mode from content shape. Priority: suggested
    /// filename with a folder, then sheer size with a folder, then a
    /// reasoning trace, then plain clipboard.
    fn handle_auto(&mut self, result: &AgentResult, context_folder: Option<&str>) -> bool {
        let line_count = result.content.matches('\n').count();

        if result.suggested_filename.is_some() && context_folder.is_some() {
            info!("auto: filename and folder present, using file mode");
            return self.to_file(
                result.pure_content(),
                result.suggested_filename.as_deref(),
                context_folder,
            );
        }

        if line_count > AUTO_FILE_LINE_THRESHOLD && context_folder.is_some() {
            info!("auto: large content ({line_count} lines), using file mode");
            return self.to_file(
                result.pure_content(),
                result.suggested_filename.as_deref().or(Some(DEFAULT_FILENAME)),
                context_folder,
            );
        }

        if result.reasoning_trace.is_some() {
            info!("auto: reasoning trace present, using rich clipboard");
            return self.clipboard_rich(result);
        }

        info!("auto: using pure clipboard");
        self.clipboard_pure(result)
    }

    fn clipboard_pure(&mut self, result: &AgentResult) -> bool {
        self.desktop.set_clipboard(result.pure_content())
    }

    fn clipboard_rich(&mut self, result: &AgentResult) -> bool {
        self.desktop.set_clipboard(&result.rich_content())
    }

    fn to_file(
        &mut self,
        content: &str,
        suggested: Option<&str>,
        context_folder: Option<&str>,
    ) -> bool {
        let Some(folder) = context_folder else {
            warn!("no context folder for file mode, falling back to clipboard");
            return self.desktop.set_clipboard(content);
        };

        let filename = normalize_filename(suggested.unwrap_or(DEFAULT_FILENAME));
        let path = Path::new(folder).join(&filename);

        if let Some(parent) = path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                error!("cannot create {}: {e}", parent.display());
                return false;
            }
        }
        if let Err(e) = fs::write(&path, content) {
            error!("cannot write {}: {e}", path.display());
            return false;
        }
        info!("saved to file: {}", path.display());

        // dual delivery: the file content also lands on the clipboard
        self.desktop.set_clipboard(content);
        true
    }

    fn paste_at_cursor(&mut self, result: &AgentResult) -> bool {
        if !self.desktop.set_clipboard(result.pure_content()) {
            return false;
        }
        std::thread::sleep(CLIPBOARD_SETTLE);
        if !self.desktop.paste_at_cursor() {
            // degraded success: content is recoverable by manual paste
            warn!("paste step failed; content remains on the clipboard");
        }
        true
    }

    fn interactive(&mut self, result: &AgentResult, context_folder: Option<&str>) -> bool {
        let Some(review) = self.review.as_ref() else {
            warn!("no review surface configured, falling back to pure clipboard");
            return self.clipboard_pure(result);
        };

        match review.review(ReviewRequest::from_result(result, context_folder)) {
            ReviewDecision::Cancel => {
                info!("review cancelled; nothing delivered");
                false
            }
            ReviewDecision::Clipboard(content) => self.desktop.set_clipboard(&content),
            ReviewDecision::File { content, filename } => {
                self.to_file(&content, filename.as_deref(), context_folder)
            }
        }
    }
}

/// Keep a known-safe extension, append `.txt` to anything else.
fn normalize_filename(name: &str) -> String {
    if SAFE_EXTENSIONS.iter().any(|ext| name.ends_with(ext)) {
        name.to_string()
    } else {
        format!("{name}.txt")
    }
}
