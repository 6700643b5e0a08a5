//! System coordinator: owns every component and drives the trigger loop.
//!
//! All components arrive through the constructor; nothing here reaches
//! for globals. Triggers are processed one at a time on this task, so at
//! most one agent invocation is in flight.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::broadcast;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use agentkey_ai::{AgentInvoker, AgentRegistry, AgentSpec, InvocationRequest};
use agentkey_common::{AiError, Event, EventBus, LogLevel, Notice, NoticeQueue};
use agentkey_config::SettingsStore;
use agentkey_input::{InputContent, InputCoordinator, InputKind, Trigger};
use agentkey_output::review::PendingReview;
use agentkey_output::{OutputRouter, ReviewDecision};

pub struct System {
    registry: AgentRegistry,
    settings: SettingsStore,
    coordinator: InputCoordinator,
    invoker: AgentInvoker,
    router: OutputRouter,
    bus: Arc<EventBus>,
    cancel: CancellationToken,
    notices: NoticeQueue,
}

impl System {
    pub fn new(
        settings: SettingsStore,
        coordinator: InputCoordinator,
        invoker: AgentInvoker,
        router: OutputRouter,
        bus: Arc<EventBus>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            registry: AgentRegistry::new(),
            settings,
            coordinator,
            invoker,
            router,
            bus,
            cancel,
            notices: NoticeQueue::default(),
        }
    }

    /// Transient notices a shell would surface as tray bubbles; expired
    /// entries are dropped on read.
    pub fn visible_notices(&mut self) -> Vec<&Notice> {
        self.notices.visible()
    }

    /// Remove stale temp artifacts left by earlier runs.
    pub fn cleanup_temp_artifacts(&mut self, max_age_hours: u64) {
        for (kind, count) in self.coordinator.cleanup_temp_files(max_age_hours) {
            if count > 0 {
                info!("removed {count} stale {} artifacts", kind.as_str());
            }
        }
    }

    /// Consume triggers until shutdown. Runs the full capture → invoke →
    /// route pipeline inline, so triggers queue while one is processing.
    pub async fn run(&mut self, mut triggers: UnboundedReceiver<Trigger>) {
        self.log_startup();
        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => break,
                trigger = triggers.recv() => {
                    let Some(trigger) = trigger else { break };
                    match trigger {
                        Trigger::Activate => self.on_activate().await,
                        Trigger::SwitchAgent => self.on_switch(),
                        Trigger::CaptureScreenshot => self.on_screenshot().await,
                    }
                }
            }
        }
        self.bus.publish(Event::Shutdown);
        info!("trigger loop stopped");
    }

    fn log_startup(&mut self) {
        let agent = self.registry.current();
        info!("current agent: {} {}", agent.icon, agent.name);
        info!("press Pause to activate, Ctrl+Pause to switch agents, Ctrl+Shift+Pause for a screenshot");
        info!("{}", self.coordinator.status_summary());
    }

    async fn on_activate(&mut self) {
        let agent = self.registry.current();
        info!("activating agent: {}", agent.name);

        let allowed = self.settings.allowed_inputs(agent.name);
        let Some(content) = self.coordinator.capture(None, true, Some(&allowed)) else {
            warn!("no input available");
            self.notices.push(Notice::warning("No input available"));
            self.bus.publish(Event::InputUnavailable);
            return;
        };
        self.process(agent, content).await;
    }

    fn on_switch(&mut self) {
        let agent = self.registry.next();
        self.notices
            .push(Notice::info(format!("{} {}", agent.icon, agent.name)));
        self.bus.publish(Event::AgentSwitched {
            name: agent.name.to_string(),
            icon: agent.icon.to_string(),
        });
    }

    async fn on_screenshot(&mut self) {
        let agent = self.registry.current();
        if !self.preflight(agent, InputKind::Screenshot) {
            return;
        }
        let Some(content) = self.coordinator.take_screenshot(None) else {
            error!("failed to capture screenshot");
            self.bus.log(LogLevel::Error, "Failed to capture screenshot");
            return;
        };
        if let Some(path) = &content.image_path {
            self.bus.publish(Event::ScreenshotCaptured {
                path: path.display().to_string(),
            });
        }
        self.process(agent, content).await;
    }

    /// Entry point for a file dropped on the shell: configure the upload
    /// strategy and process immediately.
    pub async fn on_file_dropped(&mut self, path: PathBuf) {
        info!("file dropped: {}", path.display());
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.coordinator.set_file_upload(path);
        self.bus.publish(Event::FileLoaded { name });

        let agent = self.registry.current();
        if !self.preflight(agent, InputKind::FileUpload) {
            return;
        }
        let allowed = self.settings.allowed_inputs(agent.name);
        let Some(content) = self
            .coordinator
            .capture(Some(InputKind::FileUpload), false, Some(&allowed))
        else {
            warn!("dropped file could not be captured");
            self.bus.publish(Event::InputUnavailable);
            return;
        };
        self.process(agent, content).await;
    }

    /// Explicit input kinds need the agent's allow-list to include them;
    /// a mismatch is a configuration problem the user can fix, so the
    /// message spells out what to enable.
    fn preflight(&mut self, agent: &'static AgentSpec, kind: InputKind) -> bool {
        let allowed = self.settings.allowed_inputs(agent.name);
        if allowed.iter().any(|k| k == kind.as_str()) {
            return true;
        }
        let friendly = kind.display_name();
        let message = format!(
            "Input type '{friendly}' is not selected for agent '{}'. Enable '{friendly}' in the agent configuration.",
            agent.name
        );
        warn!("{message}");
        self.notices.push(Notice::warning(message.clone()));
        self.bus.log(LogLevel::Warning, message);
        false
    }

    async fn process(&mut self, agent: &'static AgentSpec, content: InputContent) {
        let context_folder = self.settings.context_folder(agent.name);
        let focus_file = self.settings.focus_file(agent.name);
        let output_mode = self.settings.output_mode(agent.name);
        let verbose = self.settings.verbose_logging(agent.name);

        let task = content.prompt_text();
        info!(
            "processing with {} (input: {}, mode: {})",
            agent.name,
            content.kind.as_str(),
            output_mode.as_str()
        );

        let request = InvocationRequest {
            task: &task,
            context_folder: context_folder.as_deref(),
            focus_file: focus_file.as_deref(),
            image_path: content.image_path.as_deref(),
            output_mode,
            verbose,
        };

        let progress_bus = self.bus.clone();
        let result = self
            .invoker
            .invoke(agent, request, &self.cancel, move |line| {
                progress_bus.log(LogLevel::Info, line);
            })
            .await;

        match result {
            Ok(result) => {
                if self.router.handle(&result, context_folder.as_deref()) {
                    self.notices.push(Notice::info("Result delivered"));
                    self.bus.publish(Event::DeliverySucceeded {
                        mode: result.output_mode,
                    });
                    self.bus.log(LogLevel::Success, "Result delivered");
                } else {
                    self.notices.push(Notice::error("Output handling failed"));
                    self.bus.publish(Event::DeliveryFailed {
                        reason: "output handling failed".to_string(),
                    });
                }
            }
            Err(AiError::Cancelled) => info!("processing cancelled"),
            Err(e) => {
                error!("agent invocation failed: {e}");
                self.notices.push(Notice::error(format!("Error processing: {e}")));
                self.bus.log(LogLevel::Error, format!("Error processing: {e}"));
                self.bus.publish(Event::DeliveryFailed {
                    reason: e.to_string(),
                });
            }
        }
    }
}

/// Mirror bus events into the process log. This consumer stands in for a
/// windowed shell's log pane.
pub fn spawn_event_logger(bus: &EventBus) -> tokio::task::JoinHandle<()> {
    let mut rx = bus.subscribe();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(Event::Shutdown) => break,
                Ok(event) => log_event(&event),
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    warn!("event logger lagged by {n} events");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}

fn log_event(event: &Event) {
    match event {
        Event::AgentSwitched { name, icon } => info!("switched to {icon} {name}"),
        Event::Log { level, message } => match level {
            LogLevel::Error => error!("{message}"),
            LogLevel::Warning => warn!("{message}"),
            LogLevel::Info | LogLevel::Success => info!("{message}"),
        },
        Event::InputUnavailable => warn!("no input available"),
        Event::FileLoaded { name } => info!("file loaded: {name}"),
        Event::ScreenshotCaptured { path } => info!("screenshot captured: {path}"),
        Event::DeliverySucceeded { mode } => info!("delivered via {}", mode.as_str()),
        Event::DeliveryFailed { reason } => error!("delivery failed: {reason}"),
        Event::Shutdown | Event::Unknown => {}
    }
}

/// Render a pending result for the console review. The reasoning trace is
/// shown read-only; only the content is up for delivery.
fn render_review(request: &agentkey_output::ReviewRequest) -> String {
    let mut out = String::from("--- pending result ---\n");
    out.push_str(&request.content);
    out.push_str("\n----------------------\n");
    if let Some(trace) = &request.reasoning_trace {
        out.push_str("reasoning (not delivered):\n");
        out.push_str(trace);
        out.push_str("\n----------------------\n");
    }
    if let Some(name) = &request.suggested_filename {
        out.push_str(&format!("suggested file: {name}\n"));
    }
    out.push_str("deliver? [y] clipboard / [f] file / [n] cancel");
    out
}

/// Terminal-based review surface: pending results are printed and the
/// decision read from stdin on a dedicated thread.
pub fn spawn_console_review(
    mut rx: tokio::sync::mpsc::UnboundedReceiver<PendingReview>,
) -> std::io::Result<std::thread::JoinHandle<()>> {
    std::thread::Builder::new()
        .name("agentkey-review".into())
        .spawn(move || {
            while let Some((request, reply)) = rx.blocking_recv() {
                println!("{}", render_review(&request));

                let mut line = String::new();
                let decision = match std::io::stdin().read_line(&mut line) {
                    Ok(_) => match line.trim() {
                        "" | "y" | "Y" => ReviewDecision::Clipboard(request.content.clone()),
                        "f" | "F" => ReviewDecision::File {
                            content: request.content.clone(),
                            filename: request.suggested_filename.clone(),
                        },
                        _ => ReviewDecision::Cancel,
                    },
                    Err(_) => ReviewDecision::Cancel,
                };
                let _ = reply.send(decision);
            }
        })
}
