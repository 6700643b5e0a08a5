use std::path::PathBuf;
use std::time::Duration;

use agentkey_platform::paths;
use agentkey_platform::screen::{CaptureRegion, Screen};

use crate::content::{InputContent, InputKind};
use crate::strategy::CaptureStrategy;

const FILE_PREFIX: &str = "screenshot_";

/// Grabs the full screen or a caller-supplied region.
///
/// Always available, but excluded from auto-detection: taking a screenshot
/// is an explicit user action, never a fallback.
pub struct ScreenshotStrategy {
    temp_dir: PathBuf,
}

impl ScreenshotStrategy {
    pub fn new() -> Self {
        Self {
            temp_dir: paths::screenshot_dir(),
        }
    }

    fn grab(&self, region: Option<CaptureRegion>) -> Option<InputContent> {
        let img = match region {
            Some(r) => Screen::capture_region(r),
            None => Screen::capture_primary(),
        };
        let img = match img {
            Ok(img) => img,
            Err(e) => {
                tracing::warn!("screen capture failed: {e}");
                return None;
            }
        };

        let name = paths::timestamped_png_name("screenshot");
        let path = match paths::write_png(&self.temp_dir, &name, &img) {
            Ok(path) => path,
            Err(e) => {
                tracing::warn!("failed to persist screenshot: {e}");
                return None;
            }
        };
        tracing::info!("screenshot saved: {}", path.display());

        let context = match region {
            Some(r) => format!(
                "[Screenshot of region: {}x{} size {}x{}]",
                r.left, r.top, r.width, r.height
            ),
            None => "[Screenshot of entire screen]".to_string(),
        };

        let mut content = InputContent::new(InputKind::Screenshot)
            .with_meta("image_format", "PNG")
            .with_meta("width", img.width())
            .with_meta("height", img.height())
            .with_text(format!("{context}\nReady for visual analysis."))
            .with_image_path(path);
        if let Some(r) = region {
            content = content.with_meta(
                "region",
                format!("{},{},{},{}", r.left, r.top, r.width, r.height),
            );
        }
        Some(content)
    }
}

impl Default for ScreenshotStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptureStrategy for ScreenshotStrategy {
    fn kind(&self) -> InputKind {
        InputKind::Screenshot
    }

    fn is_available(&mut self) -> bool {
        true
    }

    fn capture(&mut self) -> Option<InputContent> {
        self.grab(None)
    }

    fn capture_with_region(&mut self, region: CaptureRegion) -> Option<InputContent> {
        self.grab(Some(region))
    }

    fn sweep_temp(&mut self, max_age: Duration) -> usize {
        paths::sweep_dir(&self.temp_dir, FILE_PREFIX, max_age)
    }
}
