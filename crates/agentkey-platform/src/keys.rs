use std::time::Duration;

use agentkey_common::PlatformError;
use enigo::{Direction, Enigo, Key, Keyboard, Settings};

/// Delay after a synthesized chord so the focused application and the OS
/// clipboard have time to react before we read or continue.
pub const CHORD_SETTLE: Duration = Duration::from_millis(100);

/// Synthesizes copy/paste chords at the current cursor focus.
///
/// An `Enigo` handle is created per call; on some platforms the handle is
/// not `Send` and the callers here live on the hotkey thread.
pub struct KeySynth;

impl KeySynth {
    /// Sends Ctrl+C (Cmd+C on macOS) and waits for the clipboard to settle.
    pub fn send_copy_chord() -> Result<(), PlatformError> {
        Self::send_chord('c')
    }

    /// Sends Ctrl+V (Cmd+V on macOS) at the current cursor focus.
    pub fn send_paste_chord() -> Result<(), PlatformError> {
        Self::send_chord('v')
    }

    fn send_chord(letter: char) -> Result<(), PlatformError> {
        let mut enigo = Enigo::new(&Settings::default())
            .map_err(|e| PlatformError::KeySynthError(e.to_string()))?;

        #[cfg(target_os = "macos")]
        let modifier = Key::Meta;
        #[cfg(not(target_os = "macos"))]
        let modifier = Key::Control;

        enigo
            .key(modifier, Direction::Press)
            .map_err(|e| PlatformError::KeySynthError(e.to_string()))?;
        let result = enigo
            .key(Key::Unicode(letter), Direction::Click)
            .map_err(|e| PlatformError::KeySynthError(e.to_string()));
        // Always release the modifier, even if the click failed.
        let _ = enigo.key(modifier, Direction::Release);
        result?;

        std::thread::sleep(CHORD_SETTLE);
        Ok(())
    }
}
