use std::path::PathBuf;
use std::time::Duration;

use agentkey_platform::screen::CaptureRegion;

use crate::content::{InputContent, InputKind};

/// One interchangeable method of capturing user-supplied input.
///
/// `capture` converts every platform failure into `None`; nothing escapes
/// the strategy boundary as an error. `is_available` is a cheap probe and
/// may be optimistic; the coordinator always re-checks by capturing.
pub trait CaptureStrategy: Send {
    fn kind(&self) -> InputKind;

    fn is_available(&mut self) -> bool;

    fn capture(&mut self) -> Option<InputContent>;

    /// Capture a specific screen region. Only meaningful for the screenshot
    /// strategy; everything else ignores the region.
    fn capture_with_region(&mut self, _region: CaptureRegion) -> Option<InputContent> {
        None
    }

    /// Configure the source file for upload-style strategies. Returns true
    /// if the strategy handled the path.
    fn set_source_file(&mut self, _path: Option<PathBuf>) -> bool {
        false
    }

    /// Delete temp artifacts older than `max_age`, returning the count.
    fn sweep_temp(&mut self, _max_age: Duration) -> usize {
        0
    }
}
