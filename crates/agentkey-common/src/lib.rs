pub mod errors;
pub mod events;
pub mod notifications;
pub mod types;

pub use errors::{AgentKeyError, AiError, ConfigError, PlatformError};
pub use events::{Event, EventBus, LogLevel};
pub use notifications::{Notice, NoticeLevel, NoticeQueue};
pub use types::OutputMode;

pub type Result<T> = std::result::Result<T, AgentKeyError>;
