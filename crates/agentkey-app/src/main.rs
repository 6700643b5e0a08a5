mod cli;
mod system;

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use agentkey_ai::{AgentInvoker, AgentRegistry, GatewayConfig, HttpTransport};
use agentkey_common::EventBus;
use agentkey_config::SettingsStore;
use agentkey_input::{listener, HotkeyStateMachine, InputCoordinator};
use agentkey_output::{ChannelReview, OutputRouter};

const TEMP_ARTIFACT_MAX_AGE_HOURS: u64 = 24;

/// Load environment variables from a .env file (KEY=VALUE lines).
fn load_dotenv() {
    let manifest_dir = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let candidates = [
        manifest_dir.join("..").join("..").join(".env"),
        std::path::PathBuf::from(".env"),
    ];

    for path in &candidates {
        if let Ok(contents) = std::fs::read_to_string(path) {
            for line in contents.lines() {
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }
                if let Some((key, value)) = line.split_once('=') {
                    let key = key.trim();
                    let value = value.trim().trim_matches('"').trim_matches('\'');
                    if std::env::var(key).is_err() {
                        std::env::set_var(key, value);
                    }
                }
            }
            return;
        }
    }
}

#[tokio::main]
async fn main() {
    load_dotenv();
    let args = cli::parse();

    let log_directive = args.log_level.as_deref().unwrap_or("agentkey=info");
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(
                log_directive
                    .parse()
                    .unwrap_or_else(|_| "agentkey=info".parse().unwrap()),
            ),
        )
        .init();

    tracing::info!("AgentKey v{} starting...", env!("CARGO_PKG_VERSION"));

    if args.list_agents {
        for agent in AgentRegistry::all() {
            println!("{} {} - {}", agent.icon, agent.name, agent.description);
        }
        return;
    }

    let settings_path = args
        .config
        .as_ref()
        .map(std::path::PathBuf::from)
        .unwrap_or_else(SettingsStore::default_path);
    tracing::info!("settings file: {}", settings_path.display());
    let settings = SettingsStore::load(settings_path);

    let bus = Arc::new(EventBus::new(64));
    let cancel = CancellationToken::new();

    // Gateway transport for agent invocations.
    let transport = HttpTransport::new(GatewayConfig::from_env());
    let invoker = AgentInvoker::new(Arc::new(transport));

    // Review requests cross to a console thread; answers come back inline.
    let (review_tx, review_rx) = tokio::sync::mpsc::unbounded_channel();
    let router = OutputRouter::new(Some(Box::new(ChannelReview::new(review_tx))));
    let review_thread = match system::spawn_console_review(review_rx) {
        Ok(handle) => Some(handle),
        Err(e) => {
            tracing::warn!("review console unavailable: {e}");
            None
        }
    };

    // Global keyboard hook feeds decoded triggers into the system loop.
    let machine = Arc::new(HotkeyStateMachine::new());
    let (trigger_tx, trigger_rx) = tokio::sync::mpsc::unbounded_channel();
    let hook_thread = match listener::spawn_hook(machine, trigger_tx) {
        Ok(handle) => Some(handle),
        Err(e) => {
            tracing::error!("could not start the keyboard hook, hotkeys disabled: {e}");
            None
        }
    };

    let event_logger = system::spawn_event_logger(&bus);

    let mut system = system::System::new(
        settings,
        InputCoordinator::new(),
        invoker,
        router,
        bus.clone(),
        cancel.clone(),
    );
    system.cleanup_temp_artifacts(TEMP_ARTIFACT_MAX_AGE_HOURS);

    // Ctrl+C requests an orderly shutdown.
    let shutdown = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("shutdown requested");
            shutdown.cancel();
        }
    });

    system.run(trigger_rx).await;

    let _ = event_logger.await;
    drop(system);
    drop(review_thread);
    // The hook thread blocks inside the OS listener; it ends with the
    // process rather than being joined.
    drop(hook_thread);
    tracing::info!("Shutdown complete");
}
