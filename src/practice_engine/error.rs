use thiserror::Error;

/// Precondition violations raised by [`SessionEngine`](crate::SessionEngine).
///
/// These are programmer errors in the calling layer: the engine was driven
/// out of order. They are deterministic given the same call sequence.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("session has not started")]
    NotStarted,

    #[error("session was already started")]
    AlreadyStarted,

    #[error("no active task; the session is not active")]
    NoActiveTask,

    #[error("cannot finish session before all tasks are answered ({completed}/{total})")]
    SessionIncomplete { completed: usize, total: usize },

    #[error("session result was already produced")]
    AlreadyFinished,
}

/// Failures writing progress. Reads never fail; they fall back to empty progress.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Text that does not name a known skill, locale, mode or hint level.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown skill '{0}'")]
    UnknownSkill(String),

    #[error("unknown locale '{0}'")]
    UnknownLocale(String),

    #[error("hint level out of range: {0}")]
    HintLevel(u8),
}

pub type Result<T> = std::result::Result<T, EngineError>;
