//! Interactive review control flow.
//!
//! The router never talks to UI widgets. A [`ReviewHandler`] receives the
//! pending result and returns the user's decision; the channel-based
//! implementation marshals the request to the shell's event loop and
//! blocks the delivery thread until the user answers.

use agentkey_ai::AgentResult;

/// Everything the review surface needs to show.
#[derive(Debug, Clone)]
pub struct ReviewRequest {
    pub content: String,
    pub reasoning_trace: Option<String>,
    pub suggested_filename: Option<String>,
    pub context_folder: Option<String>,
}

impl ReviewRequest {
    pub fn from_result(result: &AgentResult, context_folder: Option<&str>) -> Self {
        Self {
            content: result.content.clone(),
            reasoning_trace: result.reasoning_trace.clone(),
            suggested_filename: result.suggested_filename.clone(),
            context_folder: context_folder.map(String::from),
        }
    }
}

/// The user's verdict, possibly carrying edited content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewDecision {
    /// Discard the result; no side effect happens.
    Cancel,
    /// Deliver (possibly edited) content to the clipboard.
    Clipboard(String),
    /// Write (possibly edited) content to a file.
    File {
        content: String,
        filename: Option<String>,
    },
}

pub trait ReviewHandler: Send {
    /// Present the request and block until a decision is made.
    fn review(&self, request: ReviewRequest) -> ReviewDecision;
}

/// A pending review travelling to the shell: the request plus the reply
/// channel the shell answers on.
pub type PendingReview = (ReviewRequest, std::sync::mpsc::Sender<ReviewDecision>);

/// Channel-based [`ReviewHandler`]: requests cross into the shell's event
/// loop over an unbounded channel, the decision comes back over a one-shot
/// sync channel. A dropped shell side reads as cancel.
pub struct ChannelReview {
    to_shell: tokio::sync::mpsc::UnboundedSender<PendingReview>,
}

impl ChannelReview {
    pub fn new(to_shell: tokio::sync::mpsc::UnboundedSender<PendingReview>) -> Self {
        Self { to_shell }
    }
}

impl ReviewHandler for ChannelReview {
    fn review(&self, request: ReviewRequest) -> ReviewDecision {
        let (reply_tx, reply_rx) = std::sync::mpsc::channel();
        if self.to_shell.send((request, reply_tx)).is_err() {
            tracing::warn!("review surface is gone; treating as cancel");
            return ReviewDecision::Cancel;
        }
        reply_rx.recv().unwrap_or(ReviewDecision::Cancel)
    }
}
