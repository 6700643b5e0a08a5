//! OS seams: clipboard, synthetic key chords, screen capture, foreground
//! window queries, and temp artifact bookkeeping.
//!
//! Everything here converts platform failures into [`PlatformError`]; the
//! capture strategies above turn those into "unavailable" rather than
//! letting them propagate.

pub mod clipboard;
pub mod keys;
pub mod paths;
pub mod screen;
pub mod window;

pub use clipboard::Clipboard;
pub use keys::KeySynth;
pub use screen::Screen;
pub use window::{foreground_window, ForegroundWindow};
