use std::fs;
use std::path::PathBuf;

use crate::content::{InputContent, InputKind};
use crate::strategy::CaptureStrategy;

/// Captures the content of an explicitly configured file, typically set by
/// a drag-and-drop event on the shell.
///
/// Only UTF-8 text is delivered; a binary file is unavailable, never
/// garbled text.
pub struct FileUploadStrategy {
    path: Option<PathBuf>,
}

impl FileUploadStrategy {
    pub fn new() -> Self {
        Self { path: None }
    }

    pub fn set_file(&mut self, path: PathBuf) {
        tracing::info!("file upload configured: {}", path.display());
        self.path = Some(path);
    }

    pub fn clear_file(&mut self) {
        self.path = None;
    }
}

impl Default for FileUploadStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptureStrategy for FileUploadStrategy {
    fn kind(&self) -> InputKind {
        InputKind::FileUpload
    }

    fn is_available(&mut self) -> bool {
        self.path.as_deref().is_some_and(|p| p.is_file())
    }

    fn capture(&mut self) -> Option<InputContent> {
        let path = self.path.clone()?;
        if !path.is_file() {
            tracing::warn!("configured upload is not a regular file: {}", path.display());
            return None;
        }

        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!("cannot read upload {}: {e}", path.display());
                return None;
            }
        };
        let content = match String::from_utf8(bytes) {
            Ok(content) => content,
            Err(_) => {
                tracing::warn!("binary file not supported: {}", path.display());
                return None;
            }
        };

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let extension = path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();

        tracing::info!("file loaded: {file_name} ({} chars)", content.len());
        Some(
            InputContent::new(InputKind::FileUpload)
                .with_meta("file_name", &file_name)
                .with_meta("extension", extension)
                .with_meta("char_count", content.len())
                .with_meta("line_count", content.lines().count())
                .with_file_path(path)
                .with_text(content),
        )
    }

    fn set_source_file(&mut self, path: Option<PathBuf>) -> bool {
        match path {
            Some(p) => self.set_file(p),
            None => self.clear_file(),
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn unconfigured_strategy_is_unavailable() {
        let mut strategy = FileUploadStrategy::new();
        assert!(!strategy.is_available());
        assert!(strategy.capture().is_none());
    }

    #[test]
    fn reads_utf8_file_with_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.md");
        fs::write(&path, "line one\nline two\n").unwrap();

        let mut strategy = FileUploadStrategy::new();
        strategy.set_file(path.clone());
        assert!(strategy.is_available());

        let content = strategy.capture().unwrap();
        assert_eq!(content.kind, InputKind::FileUpload);
        assert_eq!(content.text.as_deref(), Some("line one\nline two\n"));
        assert_eq!(content.file_path.as_deref(), Some(path.as_path()));
        assert_eq!(content.metadata.get("file_name").unwrap(), "notes.md");
        assert_eq!(content.metadata.get("line_count").unwrap(), "2");
        assert_eq!(content.metadata.get("extension").unwrap(), ".md");
    }

    #[test]
    fn binary_file_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blob.bin");
        let mut f = fs::File::create(&path).unwrap();
        f.write_all(&[0xff, 0xfe, 0x00, 0x9c]).unwrap();

        let mut strategy = FileUploadStrategy::new();
        strategy.set_file(path);
        assert!(strategy.is_available());
        assert!(strategy.capture().is_none());
    }

    #[test]
    fn directory_is_not_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut strategy = FileUploadStrategy::new();
        strategy.set_file(dir.path().to_path_buf());
        assert!(!strategy.is_available());
        assert!(strategy.capture().is_none());
    }

    #[test]
    fn clear_resets_availability() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");
        fs::write(&path, "x").unwrap();

        let mut strategy = FileUploadStrategy::new();
        assert!(strategy.set_source_file(Some(path)));
        assert!(strategy.is_available());
        assert!(strategy.set_source_file(None));
        assert!(!strategy.is_available());
    }
}
