use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use agentkey_common::PlatformError;
use image::RgbaImage;

/// Temp directory for images lifted off the clipboard.
pub fn clipboard_image_dir() -> PathBuf {
    std::env::temp_dir().join("agentkey_images")
}

/// Temp directory for screenshots.
pub fn screenshot_dir() -> PathBuf {
    std::env::temp_dir().join("agentkey_screenshots")
}

/// A unique, sortable PNG name like `screenshot_20260828_141503_117.png`.
pub fn timestamped_png_name(prefix: &str) -> String {
    let now = chrono::Local::now();
    format!("{prefix}_{}.png", now.format("%Y%m%d_%H%M%S_%3f"))
}

/// Writes an RGBA image as PNG under `dir`, creating the directory first.
pub fn write_png(dir: &Path, name: &str, img: &RgbaImage) -> Result<PathBuf, PlatformError> {
    fs::create_dir_all(dir).map_err(|e| PlatformError::PathError(e.to_string()))?;
    let path = dir.join(name);
    img.save_with_format(&path, image::ImageFormat::Png)
        .map_err(|e| PlatformError::ImageError(e.to_string()))?;
    Ok(path)
}

/// Deletes files under `dir` whose name starts with `prefix` and whose
/// mtime is older than `max_age`. Returns the number deleted.
///
/// Missing directories and unreadable entries count as nothing to do, so
/// running the sweep twice in a row deletes on the first pass only.
pub fn sweep_dir(dir: &Path, prefix: &str, max_age: Duration) -> usize {
    let Ok(entries) = fs::read_dir(dir) else {
        return 0;
    };
    let cutoff = SystemTime::now()
        .checked_sub(max_age)
        .unwrap_or(SystemTime::UNIX_EPOCH);

    let mut deleted = 0;
    for entry in entries.flatten() {
        let name = entry.file_name();
        if !name.to_string_lossy().starts_with(prefix) {
            continue;
        }
        let Ok(meta) = entry.metadata() else { continue };
        let Ok(modified) = meta.modified() else {
            continue;
        };
        if modified < cutoff && fs::remove_file(entry.path()).is_ok() {
            deleted += 1;
        }
    }
    if deleted > 0 {
        tracing::info!("swept {deleted} stale files from {}", dir.display());
    }
    deleted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamped_names_carry_the_prefix() {
        let name = timestamped_png_name("clipboard");
        assert!(name.starts_with("clipboard_"));
        assert!(name.ends_with(".png"));
    }

    #[test]
    fn sweep_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        for i in 0..3 {
            fs::write(dir.path().join(format!("screenshot_{i}.png")), b"png").unwrap();
        }
        fs::write(dir.path().join("unrelated.txt"), b"keep").unwrap();

        // Let the mtimes fall behind the zero-age cutoff.
        std::thread::sleep(Duration::from_millis(20));

        let first = sweep_dir(dir.path(), "screenshot_", Duration::ZERO);
        assert_eq!(first, 3);
        let second = sweep_dir(dir.path(), "screenshot_", Duration::ZERO);
        assert_eq!(second, 0);
        assert!(dir.path().join("unrelated.txt").exists());
    }

    #[test]
    fn sweep_keeps_fresh_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("clipboard_now.png"), b"png").unwrap();

        let deleted = sweep_dir(dir.path(), "clipboard_", Duration::from_secs(3600));
        assert_eq!(deleted, 0);
        assert!(dir.path().join("clipboard_now.png").exists());
    }

    #[test]
    fn sweep_of_missing_dir_is_zero() {
        let deleted = sweep_dir(Path::new("/nonexistent/agentkey"), "x_", Duration::ZERO);
        assert_eq!(deleted, 0);
    }
}
