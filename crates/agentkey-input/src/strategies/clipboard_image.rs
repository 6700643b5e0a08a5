use std::path::PathBuf;
use std::time::Duration;

use agentkey_platform::{paths, Clipboard};

use crate::content::{InputContent, InputKind};
use crate::strategy::CaptureStrategy;

const FILE_PREFIX: &str = "clipboard_";

/// Captures an image sitting on the clipboard, persisting it as a
/// timestamp-named PNG in a strategy-owned temp directory.
pub struct ClipboardImageStrategy {
    temp_dir: PathBuf,
}

impl ClipboardImageStrategy {
    pub fn new() -> Self {
        Self {
            temp_dir: paths::clipboard_image_dir(),
        }
    }

    #[cfg(test)]
    fn with_temp_dir(temp_dir: PathBuf) -> Self {
        Self { temp_dir }
    }
}

impl Default for ClipboardImageStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptureStrategy for ClipboardImageStrategy {
    fn kind(&self) -> InputKind {
        InputKind::ClipboardImage
    }

    fn is_available(&mut self) -> bool {
        Clipboard::new().map(|mut c| c.has_image()).unwrap_or(false)
    }

    fn capture(&mut self) -> Option<InputContent> {
        let mut clipboard = Clipboard::new().ok()?;
        let img = match clipboard.get_image() {
            Ok(img) => img,
            Err(_) => {
                tracing::debug!("clipboard holds no image");
                return None;
            }
        };

        let name = paths::timestamped_png_name("clipboard");
        let path = match paths::write_png(&self.temp_dir, &name, &img) {
            Ok(path) => path,
            Err(e) => {
                tracing::warn!("failed to persist clipboard image: {e}");
                return None;
            }
        };

        tracing::info!(
            "clipboard image saved: {} ({}x{})",
            path.display(),
            img.width(),
            img.height()
        );
        Some(
            InputContent::new(InputKind::ClipboardImage)
                .with_meta("image_format", "PNG")
                .with_meta("width", img.width())
                .with_meta("height", img.height())
                .with_text("[Image captured from clipboard - ready for visual analysis]")
                .with_image_path(path),
        )
    }

    fn sweep_temp(&mut self, max_age: Duration) -> usize {
        paths::sweep_dir(&self.temp_dir, FILE_PREFIX, max_age)
    }
}
