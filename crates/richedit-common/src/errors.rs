use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),

    /// Reading, creating or locating the config file failed for a reason
    /// other than the file being absent.
    #[error("config io error: {0}")]
    Io(String),
}

/// Failures local to one bridge session or one call.
///
/// `MalformedMessage` and `UnknownTag` describe dropped inbound envelopes;
/// they are reported for logging and tests but never surfaced to API callers.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BridgeError {
    #[error("malformed message: {0}")]
    MalformedMessage(String),

    #[error("unknown message tag: {0}")]
    UnknownTag(String),

    #[error("request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    #[error("request superseded by a newer request")]
    Superseded,

    #[error("session disposed")]
    Disposed,

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl BridgeError {
    /// True for the kinds that are dropped silently by the dispatcher.
    pub fn is_ignorable(&self) -> bool {
        matches!(self, Self::MalformedMessage(_) | Self::UnknownTag(_))
    }
}
