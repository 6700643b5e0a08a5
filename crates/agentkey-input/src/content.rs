use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// The six ways input can reach an agent.
///
/// The snake_case serde names double as the identifiers stored in the
/// per-agent `allowed_inputs` list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    /// Text the user already copied to the clipboard.
    TextSelection,
    /// Text currently selected with the mouse, lifted via a synthetic copy.
    SelectedText,
    /// A file configured out-of-band (drag and drop).
    FileUpload,
    /// An image sitting on the clipboard.
    ClipboardImage,
    /// A screen grab.
    Screenshot,
    /// The file open in the foreground editor window.
    EditorActiveFile,
}

impl InputKind {
    pub const ALL: [InputKind; 6] = [
        InputKind::TextSelection,
        InputKind::SelectedText,
        InputKind::FileUpload,
        InputKind::ClipboardImage,
        InputKind::Screenshot,
        InputKind::EditorActiveFile,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InputKind::TextSelection => "text_selection",
            InputKind::SelectedText => "selected_text",
            InputKind::FileUpload => "file_upload",
            InputKind::ClipboardImage => "clipboard_image",
            InputKind::Screenshot => "screenshot",
            InputKind::EditorActiveFile => "editor_active_file",
        }
    }

    pub fn parse(value: &str) -> Option<InputKind> {
        InputKind::ALL.iter().copied().find(|k| k.as_str() == value)
    }

    /// Human-readable label for notices ("Clipboard Image").
    pub fn display_name(&self) -> String {
        self.as_str()
            .split('_')
            .map(|w| {
                let mut chars = w.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Uniform envelope returned by every capture strategy.
///
/// Constructed fresh per capture and never mutated after return. At least
/// one of `text`, `file_path`, `image_path` is populated; a capture that
/// would yield none of them reports "unavailable" instead.
#[derive(Debug, Clone)]
pub struct InputContent {
    pub kind: InputKind,
    pub text: Option<String>,
    pub file_path: Option<PathBuf>,
    pub image_path: Option<PathBuf>,
    pub metadata: HashMap<String, String>,
}

impl InputContent {
    pub fn new(kind: InputKind) -> Self {
        Self {
            kind,
            text: None,
            file_path: None,
            image_path: None,
            metadata: HashMap::new(),
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_file_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.file_path = Some(path.into());
        self
    }

    pub fn with_image_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.image_path = Some(path.into());
        self
    }

    pub fn with_meta(mut self, key: &str, value: impl ToString) -> Self {
        self.metadata.insert(key.to_string(), value.to_string());
        self
    }

    /// Whether the envelope satisfies its payload invariant.
    pub fn has_payload(&self) -> bool {
        self.text.as_deref().is_some_and(|t| !t.is_empty())
            || self.file_path.is_some()
            || self.image_path.is_some()
    }

    pub fn has_image(&self) -> bool {
        self.image_path.is_some()
    }

    /// The text handed to the agent, tagged with its source where the
    /// source matters to the prompt.
    pub fn prompt_text(&self) -> String {
        let body = self.text.as_deref().unwrap_or("");
        match self.kind {
            InputKind::TextSelection | InputKind::SelectedText => body.to_string(),
            InputKind::FileUpload => {
                let name = self
                    .metadata
                    .get("file_name")
                    .map(|n| format!("File: {n}"))
                    .unwrap_or_default();
                format!("[FILE UPLOAD: {name}]\n{body}")
            }
            InputKind::ClipboardImage => format!("[IMAGE from clipboard]\n{body}"),
            InputKind::Screenshot => format!("[SCREENSHOT captured]\n{body}"),
            InputKind::EditorActiveFile => {
                let name = self
                    .metadata
                    .get("file_name")
                    .map(|n| format!("Active file: {n}"))
                    .unwrap_or_default();
                format!("[EDITOR {name}]\n{body}")
            }
        }
    }
}
