use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Severity of a transient user-facing notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A transient notice shown by the shell (tray bubble, log pane banner).
///
/// Failures in this system never crash the process; they end up here.
#[derive(Debug, Clone)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    pub created_at: Instant,
    pub ttl: Duration,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self::with_ttl(NoticeLevel::Info, message, Duration::from_secs(4))
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::with_ttl(NoticeLevel::Warning, message, Duration::from_secs(8))
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::with_ttl(NoticeLevel::Error, message, Duration::from_secs(12))
    }

    fn with_ttl(level: NoticeLevel, message: impl Into<String>, ttl: Duration) -> Self {
        Self {
            level,
            message: message.into(),
            created_at: Instant::now(),
            ttl,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() >= self.ttl
    }
}

/// Bounded FIFO of notices; expired entries are dropped on access.
#[derive(Debug)]
pub struct NoticeQueue {
    items: VecDeque<Notice>,
    capacity: usize,
}

impl NoticeQueue {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Push a notice, dropping the oldest entry if the queue is full.
    pub fn push(&mut self, notice: Notice) {
        self.items.retain(|n| !n.is_expired());
        if self.items.len() >= self.capacity {
            self.items.pop_front();
        }
        self.items.push_back(notice);
    }

    /// Currently visible (non-expired) notices, oldest first.
    pub fn visible(&mut self) -> Vec<&Notice> {
        self.items.retain(|n| !n.is_expired());
        self.items.iter().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Default for NoticeQueue {
    fn default() -> Self {
        Self::new(8)
    }
}
