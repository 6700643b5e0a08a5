use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use agentkey_common::{ConfigError, OutputMode};

use crate::schema::AgentSettings;

/// JSON-backed settings store, keyed by agent display name.
///
/// Constructed once at startup and handed to the components that need it;
/// there is no global instance. Writes are whole-record replace followed by
/// a full rewrite of the file; last writer wins, which is fine because
/// settings edits only ever originate from one shell at a time.
pub struct SettingsStore {
    path: PathBuf,
    agents: BTreeMap<String, AgentSettings>,
}

impl SettingsStore {
    /// Default location under the user's config directory.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("agentkey")
            .join("agents.json")
    }

    /// Load the store, starting fresh when the file is missing.
    ///
    /// A corrupt file is logged and treated as empty rather than failing
    /// startup; the broken file is overwritten on the next save.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let agents = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(map) => map,
                Err(e) => {
                    tracing::warn!("settings file unreadable, starting fresh: {e}");
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("no settings file at {}, starting fresh", path.display());
                BTreeMap::new()
            }
            Err(e) => {
                tracing::warn!("settings file unreadable, starting fresh: {e}");
                BTreeMap::new()
            }
        };
        tracing::info!("loaded settings for {} agents", agents.len());
        Self { path, agents }
    }

    fn save(&self) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError(e.to_string()))?;
        }
        let json = serde_json::to_string_pretty(&self.agents)
            .map_err(|e| ConfigError::WriteError(e.to_string()))?;
        fs::write(&self.path, json).map_err(|e| ConfigError::WriteError(e.to_string()))?;
        Ok(())
    }

    /// Settings for an agent, materializing defaults on first access.
    pub fn settings(&mut self, agent: &str) -> &AgentSettings {
        self.agents.entry(agent.to_string()).or_default()
    }

    /// Replace an agent's settings wholesale and persist.
    pub fn update(&mut self, agent: &str, settings: AgentSettings) -> Result<(), ConfigError> {
        self.agents.insert(agent.to_string(), settings);
        self.save()
    }

    pub fn context_folder(&mut self, agent: &str) -> Option<String> {
        self.settings(agent).context_folder.clone()
    }

    pub fn set_context_folder(
        &mut self,
        agent: &str,
        folder: Option<&Path>,
    ) -> Result<(), ConfigError> {
        let mut s = self.settings(agent).clone();
        s.context_folder = folder.map(|p| p.to_string_lossy().into_owned());
        self.update(agent, s)
    }

    pub fn focus_file(&mut self, agent: &str) -> Option<String> {
        self.settings(agent).focus_file.clone()
    }

    pub fn set_focus_file(&mut self, agent: &str, file: Option<&Path>) -> Result<(), ConfigError> {
        let mut s = self.settings(agent).clone();
        s.focus_file = file.map(|p| p.to_string_lossy().into_owned());
        self.update(agent, s)
    }

    pub fn output_mode(&mut self, agent: &str) -> OutputMode {
        self.settings(agent).output_mode
    }

    pub fn set_output_mode(&mut self, agent: &str, mode: OutputMode) -> Result<(), ConfigError> {
        let mut s = self.settings(agent).clone();
        s.output_mode = mode;
        self.update(agent, s)
    }

    pub fn allowed_inputs(&mut self, agent: &str) -> Vec<String> {
        self.settings(agent).allowed_inputs.clone()
    }

    pub fn verbose_logging(&mut self, agent: &str) -> bool {
        self.settings(agent).verbose_logging
    }

    pub fn set_verbose_logging(&mut self, agent: &str, enabled: bool) -> Result<(), ConfigError> {
        let mut s = self.settings(agent).clone();
        s.verbose_logging = enabled;
        self.update(agent, s)
    }

    pub fn toggle_input(&mut self, agent: &str, kind: &str) -> Result<bool, ConfigError> {
        let mut s = self.settings(agent).clone();
        let now_allowed = s.toggle_input(kind);
        self.update(agent, s)?;
        Ok(now_allowed)
    }
}
