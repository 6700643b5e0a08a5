use agentkey_common::PlatformError;
use image::RgbaImage;

/// Cross-platform clipboard abstraction backed by `arboard`.
pub struct Clipboard {
    inner: arboard::Clipboard,
}

impl Clipboard {
    /// Creates a new clipboard handle.
    pub fn new() -> Result<Self, PlatformError> {
        let inner =
            arboard::Clipboard::new().map_err(|e| PlatformError::ClipboardError(e.to_string()))?;
        Ok(Self { inner })
    }

    /// Reads text from the system clipboard.
    pub fn get_text(&mut self) -> Result<String, PlatformError> {
        self.inner
            .get_text()
            .map_err(|e| PlatformError::ClipboardError(e.to_string()))
    }

    /// Writes text to the system clipboard.
    pub fn set_text(&mut self, text: &str) -> Result<(), PlatformError> {
        self.inner
            .set_text(text.to_owned())
            .map_err(|e| PlatformError::ClipboardError(e.to_string()))
    }

    /// Reads an image from the system clipboard as RGBA pixels.
    ///
    /// Returns a clipboard error when the clipboard holds no image; callers
    /// treat that as "unavailable", not a failure.
    pub fn get_image(&mut self) -> Result<RgbaImage, PlatformError> {
        let data = self
            .inner
            .get_image()
            .map_err(|e| PlatformError::ClipboardError(e.to_string()))?;
        RgbaImage::from_raw(
            data.width as u32,
            data.height as u32,
            data.bytes.into_owned(),
        )
        .ok_or_else(|| {
            PlatformError::ClipboardError("clipboard image has inconsistent dimensions".into())
        })
    }

    /// Whether the clipboard currently holds image data.
    pub fn has_image(&mut self) -> bool {
        self.inner.get_image().is_ok()
    }
}
