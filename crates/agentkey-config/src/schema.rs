use serde::{Deserialize, Serialize};

use agentkey_common::OutputMode;

/// Every capture kind, in the identifier form stored in the settings file.
///
/// The input layer owns the real enum; settings keep plain strings so an
/// older file with an unknown identifier still loads.
pub fn default_allowed_inputs() -> Vec<String> {
    [
        "text_selection",
        "selected_text",
        "editor_active_file",
        "file_upload",
        "clipboard_image",
        "screenshot",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Settings for one agent. Missing fields take defaults on load, so the
/// file can be edited by hand or written by an older version.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentSettings {
    #[serde(default)]
    pub context_folder: Option<String>,

    #[serde(default)]
    pub focus_file: Option<String>,

    #[serde(default)]
    pub output_mode: OutputMode,

    #[serde(default = "default_allowed_inputs")]
    pub allowed_inputs: Vec<String>,

    #[serde(default)]
    pub verbose_logging: bool,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            context_folder: None,
            focus_file: None,
            output_mode: OutputMode::Auto,
            allowed_inputs: default_allowed_inputs(),
            verbose_logging: false,
        }
    }
}

impl AgentSettings {
    pub fn is_input_allowed(&self, kind: &str) -> bool {
        self.allowed_inputs.iter().any(|k| k == kind)
    }

    /// Enable or disable one input kind, returning whether it is now allowed.
    pub fn toggle_input(&mut self, kind: &str) -> bool {
        if let Some(pos) = self.allowed_inputs.iter().position(|k| k == kind) {
            self.allowed_inputs.remove(pos);
            false
        } else {
            self.allowed_inputs.push(kind.to_string());
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_allow_all_six_kinds() {
        let settings = AgentSettings::default();
        assert_eq!(settings.allowed_inputs.len(), 6);
        assert_eq!(settings.output_mode, OutputMode::Auto);
        assert!(!settings.verbose_logging);
        assert!(settings.is_input_allowed("screenshot"));
    }

    #[test]
    fn missing_keys_default_on_load() {
        let json = r#"{"context_folder": "/proj"}"#;
        let settings: AgentSettings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.context_folder.as_deref(), Some("/proj"));
        assert_eq!(settings.output_mode, OutputMode::Auto);
        assert_eq!(settings.allowed_inputs, default_allowed_inputs());
    }

    #[test]
    fn toggle_input_flips_membership() {
        let mut settings = AgentSettings::default();
        assert!(!settings.toggle_input("screenshot"));
        assert!(!settings.is_input_allowed("screenshot"));
        assert!(settings.toggle_input("screenshot"));
        assert!(settings.is_input_allowed("screenshot"));
    }
}
