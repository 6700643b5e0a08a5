//! Remote agent invocation.
//!
//! The actual model call goes through a local gateway daemon that fronts
//! the hosted query service; the gateway speaks a small JSON-over-SSE
//! protocol (`text_delta`, `tool_use`, `error`, `done` events). The
//! transport sits behind a trait so the invoker is testable without a
//! network.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use agentkey_common::{AiError, OutputMode};

use crate::prompt;
use crate::reasoning::split_reasoning;
use crate::registry::AgentSpec;
use crate::streaming::{parse_response, SseEvent};
use crate::AgentResult;

const DEFAULT_GATEWAY_URL: &str = "http://127.0.0.1:8787/v1/query";

/// Tools granted to agents unless a caller narrows the set.
pub const DEFAULT_TOOLS: [&str; 5] = ["Read", "Write", "Edit", "Grep", "Glob"];

/// Body parameter keys the gateway reports tool paths under.
const PATH_PARAMS: [&str; 5] = ["file_path", "path", "filepath", "filename", "url"];

/// Per-invocation options forwarded to the gateway.
#[derive(Debug, Clone)]
pub struct QueryOptions {
    pub system_prompt: String,
    pub allowed_tools: Vec<String>,
    pub permission_mode: String,
    pub cwd: Option<PathBuf>,
}

impl QueryOptions {
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            allowed_tools: DEFAULT_TOOLS.iter().map(|t| t.to_string()).collect(),
            permission_mode: "bypassPermissions".to_string(),
            cwd: None,
        }
    }

    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }
}

/// Items surfaced while a query streams.
#[derive(Debug, Clone)]
pub enum StreamEvent {
    /// A text chunk of the final payload.
    Text(String),
    /// The remote agent used a tool; purely informational.
    ToolUse {
        tool: String,
        file_path: Option<String>,
    },
}

#[async_trait]
pub trait ModelTransport: Send + Sync {
    /// Run one query to completion, returning the concatenated payload.
    /// `on_event` observes the stream; it must never affect control flow.
    async fn query(
        &self,
        prompt: &str,
        options: &QueryOptions,
        on_event: Box<dyn FnMut(StreamEvent) + Send>,
    ) -> Result<String, AiError>;
}

/// Gateway connection settings.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub url: String,
    pub token: Option<String>,
}

impl GatewayConfig {
    /// `AGENTKEY_GATEWAY_URL` overrides the default local gateway;
    /// `AGENTKEY_GATEWAY_TOKEN` is attached as `x-api-key` when set.
    pub fn from_env() -> Self {
        Self {
            url: std::env::var("AGENTKEY_GATEWAY_URL")
                .unwrap_or_else(|_| DEFAULT_GATEWAY_URL.to_string()),
            token: std::env::var("AGENTKEY_GATEWAY_TOKEN").ok(),
        }
    }
}

/// HTTP implementation of [`ModelTransport`].
pub struct HttpTransport {
    config: GatewayConfig,
    http: reqwest::Client,
}

impl HttpTransport {
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    fn build_request_body(&self, prompt: &str, options: &QueryOptions) -> serde_json::Value {
        let mut body = serde_json::json!({
            "prompt": prompt,
            "system_prompt": options.system_prompt,
            "allowed_tools": options.allowed_tools,
            "permission_mode": options.permission_mode,
            "stream": true,
        });
        if let Some(ref cwd) = options.cwd {
            body["cwd"] = serde_json::json!(cwd.to_string_lossy());
        }
        body
    }
}

#[async_trait]
impl ModelTransport for HttpTransport {
    async fn query(
        &self,
        prompt: &str,
        options: &QueryOptions,
        mut on_event: Box<dyn FnMut(StreamEvent) + Send>,
    ) -> Result<String, AiError> {
        let body = self.build_request_body(prompt, options);

        debug!(url = %self.config.url, "gateway query");
        let mut request = self
            .http
            .post(&self.config.url)
            .header("content-type", "application/json")
            .json(&body);
        if let Some(ref token) = self.config.token {
            request = request.header("x-api-key", token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AiError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(AiError::ApiError(format!("HTTP {status}: {text}")));
        }

        let mut payload = String::new();
        let mut remote_error: Option<String> = None;

        parse_response(response, |event: SseEvent| {
            let data: serde_json::Value = match serde_json::from_str(&event.data) {
                Ok(data) => data,
                Err(_) => return,
            };
            match event.event.as_deref().unwrap_or("") {
                "text_delta" => {
                    if let Some(text) = data["text"].as_str() {
                        payload.push_str(text);
                        on_event(StreamEvent::Text(text.to_string()));
                    }
                }
                "tool_use" => {
                    let tool = data["name"].as_str().unwrap_or("").to_string();
                    if tool.is_empty() {
                        return;
                    }
                    let file_path = PATH_PARAMS
                        .iter()
                        .find_map(|p| data["input"][*p].as_str())
                        .map(String::from);
                    on_event(StreamEvent::ToolUse { tool, file_path });
                }
                "error" => {
                    remote_error = data["message"].as_str().map(String::from);
                }
                _ => {}
            }
        })
        .await?;

        if let Some(message) = remote_error {
            return Err(AiError::ApiError(message));
        }
        Ok(payload)
    }
}

/// Request data for one invocation, assembled by the trigger handler.
#[derive(Debug, Clone, Copy)]
pub struct InvocationRequest<'a> {
    pub task: &'a str,
    pub context_folder: Option<&'a str>,
    pub focus_file: Option<&'a str>,
    pub image_path: Option<&'a Path>,
    pub output_mode: OutputMode,
    pub verbose: bool,
}

/// Drives one agent invocation end to end: prompt assembly, the remote
/// call, reasoning extraction, and filename suggestion.
pub struct AgentInvoker {
    transport: Arc<dyn ModelTransport>,
}

impl AgentInvoker {
    pub fn new(transport: Arc<dyn ModelTransport>) -> Self {
        Self { transport }
    }

    /// Invoke `agent` with `request`. Tool-use progress lines go to
    /// `progress` when verbose logging is on. Cancelling the token aborts
    /// the call with [`AiError::Cancelled`].
    pub async fn invoke(
        &self,
        agent: &AgentSpec,
        request: InvocationRequest<'_>,
        cancel: &CancellationToken,
        progress: impl Fn(String) + Send + Sync + 'static,
    ) -> Result<AgentResult, AiError> {
        info!("invoking agent: {}", agent.name);

        let system_prompt = agent.system_prompt(request.context_folder, request.focus_file);
        let user_prompt = prompt::build_prompt(
            request.task,
            request.context_folder,
            request.focus_file,
            request.image_path,
        );
        let mut options = QueryOptions::new(system_prompt);
        if let Some(folder) = request.context_folder {
            options = options.with_cwd(folder);
        }

        let verbose = request.verbose;
        let on_event = Box::new(move |event: StreamEvent| {
            if let StreamEvent::ToolUse { tool, file_path } = event {
                debug!("remote tool use: {tool}");
                if verbose {
                    let line = match file_path {
                        Some(path) => format!("using {tool}: {path}"),
                        None => format!("using {tool}"),
                    };
                    progress(line);
                }
            }
        });

        let payload = tokio::select! {
            _ = cancel.cancelled() => {
                info!("invocation cancelled: {}", agent.name);
                return Err(AiError::Cancelled);
            }
            result = self.transport.query(&user_prompt, &options, on_event) => result?,
        };

        if payload.trim().is_empty() {
            return Err(AiError::EmptyResult);
        }

        let (content, reasoning_trace) = split_reasoning(&payload);
        let suggested_filename = if agent.planning {
            Some(prompt::planning_slug(request.task, agent.category))
        } else {
            prompt::suggest_filename(request.task)
        };

        info!(
            "agent {} produced {} chars (trace: {})",
            agent.name,
            content.len(),
            reasoning_trace.is_some()
        );

        let mut result = AgentResult::new(content, request.output_mode);
        result.reasoning_trace = reasoning_trace;
        result.suggested_filename = suggested_filename;
        result.metadata.insert("agent".to_string(), agent.name.to_string());
        if let Some(folder) = request.context_folder {
            result
                .metadata
                .insert("context_folder".to_string(), folder.to_string());
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::AgentRegistry;
    use std::sync::Mutex;

    struct CannedTransport {
        payload: &'static str,
        tool_events: Vec<(&'static str, Option<&'static str>)>,
    }

    #[async_trait]
    impl ModelTransport for CannedTransport {
        async fn query(
            &self,
            _prompt: &str,
            _options: &QueryOptions,
            mut on_event: Box<dyn FnMut(StreamEvent) + Send>,
        ) -> Result<String, AiError> {
            for (tool, path) in &self.tool_events {
                on_event(StreamEvent::ToolUse {
                    tool: tool.to_string(),
                    file_path: path.map(String::from),
                });
            }
            Ok(self.payload.to_string())
        }
    }

    struct HangingTransport;

    #[async_trait]
    impl ModelTransport for HangingTransport {
        async fn query(
            &self,
            _prompt: &str,
            _options: &QueryOptions,
            _on_event: Box<dyn FnMut(StreamEvent) + Send>,
        ) -> Result<String, AiError> {
            std::future::pending().await
        }
    }

    fn request(task: &str) -> InvocationRequest<'_> {
        InvocationRequest {
            task,
            context_folder: Some("/proj"),
            focus_file: None,
            image_path: None,
            output_mode: OutputMode::Auto,
            verbose: false,
        }
    }

    #[tokio::test]
    async fn splits_reasoning_and_records_metadata() {
        let invoker = AgentInvoker::new(Arc::new(CannedTransport {
            payload: "the fix\n---\nchecked the stack trace first",
            tool_events: vec![],
        }));
        let agent = AgentRegistry::by_name("Diagnostics Agent").unwrap();

        let result = invoker
            .invoke(agent, request("why does this panic"), &CancellationToken::new(), |_| {})
            .await
            .unwrap();

        assert_eq!(result.content, "the fix");
        assert_eq!(
            result.reasoning_trace.as_deref(),
            Some("checked the stack trace first")
        );
        assert_eq!(result.context_folder(), Some("/proj"));
        assert_eq!(result.metadata.get("agent").unwrap(), "Diagnostics Agent");
    }

    #[tokio::test]
    async fn planning_agent_gets_a_specs_slug() {
        let invoker = AgentInvoker::new(Arc::new(CannedTransport {
            payload: "# Feature: dark mode\n...",
            tool_events: vec![],
        }));
        let agent = AgentRegistry::by_name("Feature Planner").unwrap();

        let result = invoker
            .invoke(
                agent,
                request("Add dark mode toggle for the settings panel"),
                &CancellationToken::new(),
                |_| {},
            )
            .await
            .unwrap();

        assert_eq!(
            result.suggested_filename.as_deref(),
            Some("specs/dark_mode_toggle_settings.md")
        );
    }

    #[tokio::test]
    async fn non_planning_agent_uses_keyword_heuristic() {
        let invoker = AgentInvoker::new(Arc::new(CannedTransport {
            payload: "print('hi')",
            tool_events: vec![],
        }));
        let agent = AgentRegistry::by_name("Implementation Agent").unwrap();

        let result = invoker
            .invoke(agent, request("write a python scraper"), &CancellationToken::new(), |_| {})
            .await
            .unwrap();

        assert_eq!(result.suggested_filename.as_deref(), Some("script.py"));
    }

    #[tokio::test]
    async fn empty_payload_is_an_error() {
        let invoker = AgentInvoker::new(Arc::new(CannedTransport {
            payload: "  \n ",
            tool_events: vec![],
        }));
        let agent = AgentRegistry::by_name("Prompt Assistant").unwrap();

        let err = invoker
            .invoke(agent, request("do nothing"), &CancellationToken::new(), |_| {})
            .await
            .unwrap_err();
        assert!(matches!(err, AiError::EmptyResult));
    }

    #[tokio::test]
    async fn cancellation_aborts_the_call() {
        let invoker = AgentInvoker::new(Arc::new(HangingTransport));
        let agent = AgentRegistry::by_name("Prompt Assistant").unwrap();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = invoker
            .invoke(agent, request("anything"), &cancel, |_| {})
            .await
            .unwrap_err();
        assert!(matches!(err, AiError::Cancelled));
    }

    #[tokio::test]
    async fn tool_events_reach_the_progress_sink_only_when_verbose() {
        let transport = Arc::new(CannedTransport {
            payload: "done",
            tool_events: vec![("Read", Some("/proj/main.rs")), ("Grep", None)],
        });
        let agent = AgentRegistry::by_name("Implementation Agent").unwrap();

        let lines: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = lines.clone();
        let mut req = request("change something");
        req.verbose = true;

        AgentInvoker::new(transport.clone())
            .invoke(agent, req, &CancellationToken::new(), move |line| {
                sink.lock().unwrap().push(line);
            })
            .await
            .unwrap();
        assert_eq!(
            *lines.lock().unwrap(),
            vec!["using Read: /proj/main.rs".to_string(), "using Grep".to_string()]
        );

        let quiet: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = quiet.clone();
        AgentInvoker::new(transport)
            .invoke(agent, request("change something"), &CancellationToken::new(), move |line| {
                sink.lock().unwrap().push(line);
            })
            .await
            .unwrap();
        assert!(quiet.lock().unwrap().is_empty());
    }
}
