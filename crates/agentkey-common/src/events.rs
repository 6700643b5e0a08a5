use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::types::OutputMode;

/// Severity attached to shell-visible log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Messages crossing the worker → shell boundary.
///
/// The hotkey thread and the trigger-processing task never touch shell state
/// directly; they publish events here and a handler bound to the shell's
/// event loop performs the actual mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Event {
    /// The active agent changed (round-robin switch).
    AgentSwitched { name: String, icon: String },
    /// A line for the shell's visible log pane.
    Log { level: LogLevel, message: String },
    /// No capture strategy produced content; the trigger was a no-op.
    InputUnavailable,
    /// A dropped file was configured for the file-upload strategy.
    FileLoaded { name: String },
    /// A screenshot artifact was written.
    ScreenshotCaptured { path: String },
    /// A result was delivered through the named mode.
    DeliverySucceeded { mode: OutputMode },
    /// Delivery failed or was cancelled; no side effect occurred.
    DeliveryFailed { reason: String },
    Shutdown,
    #[serde(other)]
    Unknown,
}

pub struct EventBus {
    sender: broadcast::Sender<Event>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.sender.subscribe()
    }

    /// Publish an event, returning the number of receivers that saw it.
    pub fn publish(&self, event: Event) -> usize {
        self.sender.send(event).unwrap_or(0)
    }

    /// Shorthand for the common log-line case.
    pub fn log(&self, level: LogLevel, message: impl Into<String>) -> usize {
        self.publish(Event::Log {
            level,
            message: message.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publish_and_receive() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();

        bus.publish(Event::InputUnavailable);

        let event = rx.recv().await.unwrap();
        assert!(matches!(event, Event::InputUnavailable));
    }

    #[tokio::test]
    async fn multiple_subscribers_see_the_same_event() {
        let bus = EventBus::new(16);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(Event::Shutdown);

        assert!(matches!(rx1.recv().await.unwrap(), Event::Shutdown));
        assert!(matches!(rx2.recv().await.unwrap(), Event::Shutdown));
    }

    #[tokio::test]
    async fn events_arrive_in_order() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();

        bus.publish(Event::AgentSwitched {
            name: "Prompt Assistant".into(),
            icon: "✨".into(),
        });
        bus.log(LogLevel::Warning, "no input available");
        bus.publish(Event::DeliverySucceeded {
            mode: OutputMode::ClipboardPure,
        });

        assert!(matches!(
            rx.recv().await.unwrap(),
            Event::AgentSwitched { ref name, .. } if name == "Prompt Assistant"
        ));
        assert!(matches!(
            rx.recv().await.unwrap(),
            Event::Log { level: LogLevel::Warning, .. }
        ));
        assert!(matches!(
            rx.recv().await.unwrap(),
            Event::DeliverySucceeded { mode: OutputMode::ClipboardPure }
        ));
    }

    #[test]
    fn publish_without_subscribers_returns_zero() {
        let bus = EventBus::new(16);
        assert_eq!(bus.publish(Event::Shutdown), 0);
    }

    #[test]
    fn unknown_event_deserializes() {
        let json = r#"{"type":"SomeFutureEvent","data":null}"#;
        let event: Event = serde_json::from_str(json).unwrap();
        assert!(matches!(event, Event::Unknown));
    }
}
