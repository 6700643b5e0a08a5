//! Agent layer: static agent registry, prompt assembly, reasoning-trace
//! extraction, and the remote model invocation over SSE.

pub mod invoke;
pub mod prompt;
pub mod reasoning;
pub mod registry;
pub mod streaming;

use std::collections::HashMap;

use agentkey_common::OutputMode;

pub use invoke::{
    AgentInvoker, GatewayConfig, HttpTransport, InvocationRequest, ModelTransport, QueryOptions,
    StreamEvent,
};
pub use registry::{AgentRegistry, AgentSpec};

/// Structured result of one agent invocation.
///
/// Created once per invocation and consumed exactly once by the output
/// router. The interactive review path may replace `content` and
/// `suggested_filename` before delivery; nothing else mutates it.
#[derive(Debug, Clone)]
pub struct AgentResult {
    pub content: String,
    pub output_mode: OutputMode,
    pub reasoning_trace: Option<String>,
    pub suggested_filename: Option<String>,
    pub metadata: HashMap<String, String>,
}

impl AgentResult {
    pub fn new(content: impl Into<String>, output_mode: OutputMode) -> Self {
        Self {
            content: content.into(),
            output_mode,
            reasoning_trace: None,
            suggested_filename: None,
            metadata: HashMap::new(),
        }
    }

    /// Content without any formatting or metadata.
    pub fn pure_content(&self) -> &str {
        &self.content
    }

    /// Two-section document when a reasoning trace exists, plain content
    /// otherwise.
    pub fn rich_content(&self) -> String {
        match &self.reasoning_trace {
            Some(trace) => format!(
                "# Reasoning\n\n{trace}\n\n---\n\n# Output\n\n{}",
                self.content
            ),
            None => self.content.clone(),
        }
    }

    pub fn context_folder(&self) -> Option<&str> {
        self.metadata.get("context_folder").map(String::as_str)
    }
}
