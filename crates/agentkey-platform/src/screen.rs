use agentkey_common::PlatformError;
use image::RgbaImage;

/// A rectangular capture region in primary-monitor pixel coordinates.
///
/// Coordinates are caller-supplied and not validated against the actual
/// screen bounds; an out-of-range region yields whatever the crop produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureRegion {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

/// Screen capture backed by `xcap`.
pub struct Screen;

impl Screen {
    /// Captures the primary monitor, falling back to the first one found.
    pub fn capture_primary() -> Result<RgbaImage, PlatformError> {
        let monitors =
            xcap::Monitor::all().map_err(|e| PlatformError::ScreenCaptureError(e.to_string()))?;
        let monitor = monitors
            .into_iter()
            .find(|m| m.is_primary().unwrap_or(false))
            .or_else(|| xcap::Monitor::all().ok()?.into_iter().next())
            .ok_or_else(|| PlatformError::ScreenCaptureError("no monitor found".into()))?;
        monitor
            .capture_image()
            .map_err(|e| PlatformError::ScreenCaptureError(e.to_string()))
    }

    /// Captures a region of the primary monitor.
    pub fn capture_region(region: CaptureRegion) -> Result<RgbaImage, PlatformError> {
        let full = Self::capture_primary()?;
        let cropped = image::imageops::crop_imm(
            &full,
            region.left,
            region.top,
            region.width,
            region.height,
        );
        Ok(cropped.to_image())
    }
}
