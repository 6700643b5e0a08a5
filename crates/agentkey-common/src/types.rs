use serde::{Deserialize, Serialize};
use std::fmt;

/// How an agent result should be delivered to the user.
///
/// Persisted per agent in the settings file using the SCREAMING_SNAKE
/// identifiers; unrecognized values fall back to [`OutputMode::Auto`] so a
/// hand-edited settings file never breaks startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutputMode {
    ClipboardPure,
    ClipboardRich,
    File,
    InteractiveEditor,
    PasteAtCursor,
    #[serde(other)]
    Auto,
}

impl OutputMode {
    /// Parse a persisted identifier, case-insensitively. Unknown → `Auto`.
    pub fn from_str_lossy(value: &str) -> Self {
        match value.to_ascii_uppercase().as_str() {
            "CLIPBOARD_PURE" => OutputMode::ClipboardPure,
            "CLIPBOARD_RICH" => OutputMode::ClipboardRich,
            "FILE" => OutputMode::File,
            "INTERACTIVE_EDITOR" => OutputMode::InteractiveEditor,
            "PASTE_AT_CURSOR" => OutputMode::PasteAtCursor,
            "AUTO" => OutputMode::Auto,
            other => {
                tracing::warn!("unknown output mode '{other}', defaulting to AUTO");
                OutputMode::Auto
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputMode::Auto => "AUTO",
            OutputMode::ClipboardPure => "CLIPBOARD_PURE",
            OutputMode::ClipboardRich => "CLIPBOARD_RICH",
            OutputMode::File => "FILE",
            OutputMode::InteractiveEditor => "INTERACTIVE_EDITOR",
            OutputMode::PasteAtCursor => "PASTE_AT_CURSOR",
        }
    }

    /// Whether this mode requires a user round-trip before delivery.
    pub fn requires_interaction(&self) -> bool {
        matches!(self, OutputMode::InteractiveEditor)
    }
}

impl Default for OutputMode {
    fn default() -> Self {
        OutputMode::Auto
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_round_trips_through_json() {
        for mode in [
            OutputMode::Auto,
            OutputMode::ClipboardPure,
            OutputMode::ClipboardRich,
            OutputMode::File,
            OutputMode::InteractiveEditor,
            OutputMode::PasteAtCursor,
        ] {
            let json = serde_json::to_string(&mode).unwrap();
            let back: OutputMode = serde_json::from_str(&json).unwrap();
            assert_eq!(mode, back);
        }
    }

    #[test]
    fn unknown_mode_deserializes_to_auto() {
        let mode: OutputMode = serde_json::from_str("\"TELEGRAPH\"").unwrap();
        assert_eq!(mode, OutputMode::Auto);
    }

    #[test]
    fn lossy_parse_is_case_insensitive() {
        assert_eq!(OutputMode::from_str_lossy("file"), OutputMode::File);
        assert_eq!(
            OutputMode::from_str_lossy("clipboard_rich"),
            OutputMode::ClipboardRich
        );
        assert_eq!(OutputMode::from_str_lossy("nonsense"), OutputMode::Auto);
    }
}
