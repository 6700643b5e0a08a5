use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("settings file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("settings parse error: {0}")]
    ParseError(String),

    #[error("settings write error: {0}")]
    WriteError(String),

    #[error("invalid output mode: {0}")]
    InvalidOutputMode(String),

    #[error("invalid input kind: {0}")]
    InvalidInputKind(String),
}

#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("clipboard error: {0}")]
    ClipboardError(String),

    #[error("key synthesis error: {0}")]
    KeySynthError(String),

    #[error("screen capture error: {0}")]
    ScreenCaptureError(String),

    #[error("window query error: {0}")]
    WindowError(String),

    #[error("image encode error: {0}")]
    ImageError(String),

    #[error("path error: {0}")]
    PathError(String),

    #[error("keyboard hook error: {0}")]
    HookError(String),
}

#[derive(Debug, thiserror::Error)]
pub enum AiError {
    #[error("API error: {0}")]
    ApiError(String),

    #[error("network error: {0}")]
    NetworkError(String),

    #[error("parse error: {0}")]
    ParseError(String),

    #[error("agent returned empty result")]
    EmptyResult,

    #[error("cancelled")]
    Cancelled,
}

#[derive(Debug, thiserror::Error)]
pub enum AgentKeyError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error(transparent)]
    Ai(#[from] AiError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let err = ConfigError::FileNotFound(PathBuf::from("/tmp/missing.json"));
        assert_eq!(err.to_string(), "settings file not found: /tmp/missing.json");

        let err = ConfigError::InvalidOutputMode("SHOUT".into());
        assert_eq!(err.to_string(), "invalid output mode: SHOUT");
    }

    #[test]
    fn platform_error_display() {
        let err = PlatformError::ClipboardError("access denied".into());
        assert_eq!(err.to_string(), "clipboard error: access denied");

        let err = PlatformError::HookError("hook install rejected".into());
        assert_eq!(err.to_string(), "keyboard hook error: hook install rejected");
    }

    #[test]
    fn umbrella_error_from_layers() {
        let err: AgentKeyError = ConfigError::ParseError("bad json".into()).into();
        assert!(matches!(err, AgentKeyError::Config(_)));
        assert!(err.to_string().contains("bad json"));

        let err: AgentKeyError = AiError::NetworkError("connection reset".into()).into();
        assert!(matches!(err, AgentKeyError::Ai(_)));

        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: AgentKeyError = io.into();
        assert!(matches!(err, AgentKeyError::Io(_)));
    }
}
