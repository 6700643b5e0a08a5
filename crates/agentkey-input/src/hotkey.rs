use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Scan codes some keyboard layouts report for Pause instead of (or in
/// addition to) the symbolic key name.
pub const PAUSE_SCAN_CODES: [u32; 4] = [29, 70, 110, 119];

/// Minimum gap between two accepted Pause-down events. Some layouts emit a
/// duplicate down within a few milliseconds of the first.
pub const PAUSE_DEBOUNCE: Duration = Duration::from_millis(200);

/// Normalized key identity as seen by the global hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyName {
    Ctrl,
    Shift,
    Pause,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDirection {
    Down,
    Up,
}

/// One raw event from the global keyboard hook.
#[derive(Debug, Clone, Copy)]
pub struct RawKeyEvent {
    pub name: KeyName,
    pub scan_code: u32,
    pub direction: KeyDirection,
}

impl RawKeyEvent {
    pub fn new(name: KeyName, scan_code: u32, direction: KeyDirection) -> Self {
        Self {
            name,
            scan_code,
            direction,
        }
    }

    fn is_pause(&self) -> bool {
        self.name == KeyName::Pause || PAUSE_SCAN_CODES.contains(&self.scan_code)
    }
}

/// A discrete action decoded from the raw stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Pause alone: run the current agent.
    Activate,
    /// Ctrl+Pause: advance to the next agent.
    SwitchAgent,
    /// Ctrl+Shift+Pause: grab the screen and process it.
    CaptureScreenshot,
}

/// Latched intent recorded at Pause-down, for logging and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combo {
    None,
    SwitchAgent,
    Screenshot,
}

#[derive(Debug)]
struct State {
    ctrl: bool,
    shift: bool,
    pause_pressed: bool,
    armed: Combo,
    last_pause: Option<Instant>,
}

/// Decodes the raw, order-unconstrained key event stream into triggers.
///
/// All flags live under one mutex so a Pause handler never observes a
/// half-applied modifier toggle. A combo is armed on Pause-down, but the
/// dispatched trigger re-samples the modifier state at Pause-up: releasing
/// Ctrl before releasing Pause downgrades Ctrl+Pause to a plain Activate.
/// The trigger fires synchronously on the thread delivering the Pause-up.
pub struct HotkeyStateMachine {
    state: Mutex<State>,
}

impl HotkeyStateMachine {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                ctrl: false,
                shift: false,
                pause_pressed: false,
                armed: Combo::None,
                last_pause: None,
            }),
        }
    }

    /// Feed one raw event; returns the trigger to fire, if any.
    ///
    /// Never panics: unrecognized events fall through as no-ops.
    pub fn process(&self, event: &RawKeyEvent) -> Option<Trigger> {
        self.process_at(event, Instant::now())
    }

    fn process_at(&self, event: &RawKeyEvent, now: Instant) -> Option<Trigger> {
        let mut state = match self.state.lock() {
            Ok(guard) => guard,
            // A poisoned lock means a panic mid-update; drop the event.
            Err(_) => return None,
        };

        match event.name {
            KeyName::Ctrl => {
                state.ctrl = event.direction == KeyDirection::Down;
                None
            }
            KeyName::Shift => {
                state.shift = event.direction == KeyDirection::Down;
                None
            }
            _ if event.is_pause() => match event.direction {
                KeyDirection::Down => {
                    if let Some(last) = state.last_pause {
                        if now.duration_since(last) < PAUSE_DEBOUNCE {
                            tracing::debug!("pause down dropped by debounce");
                            return None;
                        }
                    }
                    state.last_pause = Some(now);
                    state.pause_pressed = true;
                    state.armed = if state.ctrl && state.shift {
                        Combo::Screenshot
                    } else if state.ctrl {
                        Combo::SwitchAgent
                    } else {
                        Combo::None
                    };
                    tracing::debug!(
                        "pause down (ctrl={}, shift={}, armed={:?})",
                        state.ctrl,
                        state.shift,
                        state.armed
                    );
                    None
                }
                KeyDirection::Up => {
                    if !state.pause_pressed {
                        // Spurious release, e.g. focus was lost mid-press.
                        return None;
                    }
                    state.pause_pressed = false;
                    state.armed = Combo::None;
                    // Modifier state is re-sampled at release; the armed
                    // value above is advisory only.
                    let trigger = if state.ctrl && state.shift {
                        Trigger::CaptureScreenshot
                    } else if state.ctrl {
                        Trigger::SwitchAgent
                    } else {
                        Trigger::Activate
                    };
                    tracing::debug!("pause up -> {trigger:?}");
                    Some(trigger)
                }
            },
            _ => None,
        }
    }
}

impl Default for HotkeyStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn down(name: KeyName) -> RawKeyEvent {
        RawKeyEvent::new(name, 0, KeyDirection::Down)
    }

    fn up(name: KeyName) -> RawKeyEvent {
        RawKeyEvent::new(name, 0, KeyDirection::Up)
    }

    #[test]
    fn pause_alone_fires_activate_on_release() {
        let machine = HotkeyStateMachine::new();
        let t0 = Instant::now();

        assert_eq!(machine.process_at(&down(KeyName::Pause), t0), None);
        assert_eq!(
            machine.process_at(&up(KeyName::Pause), t0),
            Some(Trigger::Activate)
        );
    }

    #[test]
    fn ctrl_pause_fires_switch_agent() {
        let machine = HotkeyStateMachine::new();
        let t0 = Instant::now();

        machine.process_at(&down(KeyName::Ctrl), t0);
        machine.process_at(&down(KeyName::Pause), t0);
        assert_eq!(
            machine.process_at(&up(KeyName::Pause), t0),
            Some(Trigger::SwitchAgent)
        );
    }

    #[test]
    fn full_chord_fires_exactly_one_screenshot_trigger() {
        let machine = HotkeyStateMachine::new();
        let t0 = Instant::now();

        machine.process_at(&down(KeyName::Ctrl), t0);
        machine.process_at(&down(KeyName::Shift), t0);
        machine.process_at(&down(KeyName::Pause), t0);
        assert_eq!(
            machine.process_at(&up(KeyName::Pause), t0),
            Some(Trigger::CaptureScreenshot)
        );
        // Releasing the modifiers afterwards fires nothing further.
        assert_eq!(machine.process_at(&up(KeyName::Shift), t0), None);
        assert_eq!(machine.process_at(&up(KeyName::Ctrl), t0), None);
    }

    /// Regression pin: modifier state is re-sampled at Pause-up, so
    /// releasing Ctrl first downgrades Ctrl+Pause to a plain activation.
    #[test]
    fn modifiers_resampled_at_release() {
        let machine = HotkeyStateMachine::new();
        let t0 = Instant::now();

        machine.process_at(&down(KeyName::Ctrl), t0);
        machine.process_at(&down(KeyName::Pause), t0);
        machine.process_at(&up(KeyName::Ctrl), t0);
        assert_eq!(
            machine.process_at(&up(KeyName::Pause), t0),
            Some(Trigger::Activate)
        );
    }

    #[test]
    fn duplicate_pause_down_is_debounced() {
        let machine = HotkeyStateMachine::new();
        let t0 = Instant::now();

        machine.process_at(&down(KeyName::Pause), t0);
        // A duplicate down 50ms later is dropped.
        machine.process_at(&down(KeyName::Pause), t0 + Duration::from_millis(50));
        assert_eq!(
            machine.process_at(&up(KeyName::Pause), t0 + Duration::from_millis(60)),
            Some(Trigger::Activate)
        );
        // The matching (second) up has no pressed flag left to consume.
        assert_eq!(
            machine.process_at(&up(KeyName::Pause), t0 + Duration::from_millis(70)),
            None
        );
    }

    #[test]
    fn pause_downs_spaced_past_debounce_both_count() {
        let machine = HotkeyStateMachine::new();
        let t0 = Instant::now();

        machine.process_at(&down(KeyName::Pause), t0);
        assert_eq!(
            machine.process_at(&up(KeyName::Pause), t0 + Duration::from_millis(10)),
            Some(Trigger::Activate)
        );

        let t1 = t0 + Duration::from_millis(250);
        machine.process_at(&down(KeyName::Pause), t1);
        assert_eq!(
            machine.process_at(&up(KeyName::Pause), t1 + Duration::from_millis(10)),
            Some(Trigger::Activate)
        );
    }

    #[test]
    fn spurious_pause_up_is_ignored() {
        let machine = HotkeyStateMachine::new();
        assert_eq!(machine.process_at(&up(KeyName::Pause), Instant::now()), None);
    }

    #[test]
    fn pause_matched_by_scan_code() {
        let machine = HotkeyStateMachine::new();
        let t0 = Instant::now();

        let pd = RawKeyEvent::new(KeyName::Other, 119, KeyDirection::Down);
        let pu = RawKeyEvent::new(KeyName::Other, 119, KeyDirection::Up);
        machine.process_at(&pd, t0);
        assert_eq!(machine.process_at(&pu, t0), Some(Trigger::Activate));
    }

    #[test]
    fn unrelated_keys_are_ignored() {
        let machine = HotkeyStateMachine::new();
        let t0 = Instant::now();
        let ev = RawKeyEvent::new(KeyName::Other, 30, KeyDirection::Down);
        assert_eq!(machine.process_at(&ev, t0), None);
    }
}
