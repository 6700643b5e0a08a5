use std::fs;
use std::path::{Path, PathBuf};

use agentkey_platform::window;
use walkdir::WalkDir;

use crate::content::{InputContent, InputKind};
use crate::strategy::CaptureStrategy;

const EDITOR_NAME: &str = "Visual Studio Code";
const EDITOR_TITLE_SUFFIX: &str = " - Visual Studio Code";
const REMOTE_MARKERS: [&str; 4] = ["[SSH]", "[SSH:", "[WSL", "DEVCONTAINER"];
const SEARCH_DEPTH_LIMIT: usize = 5;

/// Reads the file open in the foreground editor window.
///
/// The file name is parsed out of the window title, so only saved, local
/// buffers qualify: unsaved ("Untitled-") and remote-session titles are
/// rejected rather than guessed at.
pub struct EditorActiveFileStrategy {
    search_root: PathBuf,
}

impl EditorActiveFileStrategy {
    pub fn new() -> Self {
        Self {
            search_root: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        }
    }

    pub fn with_search_root(search_root: PathBuf) -> Self {
        Self { search_root }
    }

    fn foreground_editor_file(&self) -> Option<String> {
        let win = window::foreground_window().ok()?;
        if !win.title.contains(EDITOR_NAME) {
            tracing::debug!("foreground window is not the editor: {}", win.title);
            return None;
        }
        parse_editor_title(&win.title)
    }
}

impl Default for EditorActiveFileStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptureStrategy for EditorActiveFileStrategy {
    fn kind(&self) -> InputKind {
        InputKind::EditorActiveFile
    }

    fn is_available(&mut self) -> bool {
        self.foreground_editor_file().is_some()
    }

    fn capture(&mut self) -> Option<InputContent> {
        let file_name = self.foreground_editor_file()?;
        let path = resolve_file(&file_name, &self.search_root)?;
        let (content, encoding) = read_text_guarded(&path)?;

        tracing::info!(
            "read active editor file: {} ({} lines, {encoding})",
            path.display(),
            content.lines().count()
        );
        Some(
            InputContent::new(InputKind::EditorActiveFile)
                .with_meta("file_name", &file_name)
                .with_meta("encoding", encoding)
                .with_meta("line_count", content.lines().count())
                .with_file_path(path)
                .with_text(content),
        )
    }
}

/// Extracts a candidate file name from an editor window title.
///
/// Titles look like `name.ext - folder - Visual Studio Code` or
/// `name.ext - Visual Studio Code`; a leading dirty marker (`● `) is
/// tolerated. Returns `None` for unsaved or remote-session buffers.
pub fn parse_editor_title(title: &str) -> Option<String> {
    let title = title.trim_start_matches('●').trim();

    if title.starts_with("Untitled-") {
        tracing::debug!("unsaved editor buffer rejected");
        return None;
    }
    if REMOTE_MARKERS.iter().any(|m| title.contains(m)) {
        tracing::debug!("remote-session editor title rejected");
        return None;
    }

    let stripped = title.strip_suffix(EDITOR_TITLE_SUFFIX)?;
    let first = stripped.split(" - ").next()?.trim();
    if first.is_empty() {
        return None;
    }
    Some(first.to_string())
}

/// Resolves a bare file name to an absolute path: the literal path first,
/// then a breadth-limited walk (depth ≤ 5) from `root`.
pub fn resolve_file(file_name: &str, root: &Path) -> Option<PathBuf> {
    let literal = Path::new(file_name);
    if literal.is_file() {
        return fs::canonicalize(literal).ok().or(Some(literal.to_path_buf()));
    }

    for entry in WalkDir::new(root)
        .max_depth(SEARCH_DEPTH_LIMIT)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if entry.file_type().is_file() && entry.file_name().to_string_lossy() == file_name {
            return Some(entry.into_path());
        }
    }
    tracing::debug!("file not found under {}: {file_name}", root.display());
    None
}

/// Reads a file trying utf-8, then utf-16 (either BOM), then latin-1, and
/// rejects anything containing a NUL byte as binary.
pub fn read_text_guarded(path: &Path) -> Option<(String, &'static str)> {
    let bytes = fs::read(path).ok()?;

    let decoded = if let Ok(text) = std::str::from_utf8(&bytes) {
        Some((text.to_string(), "utf-8"))
    } else if let Some(text) = decode_utf16(&bytes) {
        Some((text, "utf-16"))
    } else {
        // latin-1: every byte maps to the code point of the same value.
        Some((bytes.iter().map(|&b| b as char).collect(), "latin-1"))
    };

    let (text, encoding) = decoded?;
    if text.contains('\u{0}') {
        tracing::debug!("binary file rejected: {}", path.display());
        return None;
    }
    Some((text, encoding))
}

fn decode_utf16(bytes: &[u8]) -> Option<String> {
    if bytes.len() < 2 || bytes.len() % 2 != 0 {
        return None;
    }
    let units: Vec<u16> = match (bytes[0], bytes[1]) {
        (0xff, 0xfe) => bytes[2..]
            .chunks_exact(2)
            .map(|c| u16::from_le_bytes([c[0], c[1]]))
            .collect(),
        (0xfe, 0xff) => bytes[2..]
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect(),
        _ => return None,
    };
    String::from_utf16(&units).ok()
}
