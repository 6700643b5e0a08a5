//! Input capture: the global hotkey state machine, the capture strategy
//! set, and the coordinator that picks between them.

pub mod content;
pub mod coordinator;
pub mod hotkey;
pub mod listener;
pub mod strategies;
pub mod strategy;

pub use content::{InputContent, InputKind};
pub use coordinator::InputCoordinator;
pub use hotkey::{HotkeyStateMachine, KeyDirection, KeyName, RawKeyEvent, Trigger};
pub use strategy::CaptureStrategy;
