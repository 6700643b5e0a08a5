use std::sync::Arc;
use std::thread;

use tokio::sync::mpsc::UnboundedSender;

use crate::hotkey::{HotkeyStateMachine, KeyDirection, KeyName, RawKeyEvent, Trigger};

fn classify(key: rdev::Key) -> (KeyName, u32) {
    match key {
        rdev::Key::ControlLeft | rdev::Key::ControlRight => (KeyName::Ctrl, 0),
        rdev::Key::ShiftLeft | rdev::Key::ShiftRight => (KeyName::Shift, 0),
        rdev::Key::Pause => (KeyName::Pause, 0),
        rdev::Key::Unknown(code) => (KeyName::Other, code),
        _ => (KeyName::Other, 0),
    }
}

/// Installs the global keyboard hook on a dedicated thread.
///
/// Raw events are fed to the state machine and decoded triggers are sent
/// over `tx`. Failure to spawn the thread or install the hook is logged
/// and the process keeps running without global hotkeys.
pub fn spawn_hook(
    machine: Arc<HotkeyStateMachine>,
    tx: UnboundedSender<Trigger>,
) -> std::io::Result<thread::JoinHandle<()>> {
    thread::Builder::new()
        .name("agentkey-hook".into())
        .spawn(move || {
            let result = rdev::listen(move |event| {
                let (name, scan_code, direction) = match event.event_type {
                    rdev::EventType::KeyPress(key) => {
                        let (name, code) = classify(key);
                        (name, code, KeyDirection::Down)
                    }
                    rdev::EventType::KeyRelease(key) => {
                        let (name, code) = classify(key);
                        (name, code, KeyDirection::Up)
                    }
                    _ => return,
                };
                let raw = RawKeyEvent::new(name, scan_code, direction);
                if let Some(trigger) = machine.process(&raw) {
                    // Receiver gone means we are shutting down.
                    let _ = tx.send(trigger);
                }
            });
            if let Err(e) = result {
                tracing::error!("keyboard hook unavailable, hotkeys disabled: {e:?}");
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_returns_a_handle_without_panicking() {
        let machine = Arc::new(HotkeyStateMachine::new());
        let (tx, _rx) = tokio::sync::mpsc::unbounded_channel();

        // The hook itself may fail on a headless machine; the spawn must
        // still succeed and the failure stay inside the thread.
        let handle = spawn_hook(machine, tx);
        assert!(handle.is_ok());
    }
}
