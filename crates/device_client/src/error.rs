use shared::error::CommandError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("animation modes mutually exclusive")]
    AnimationConflict,
    #[error(transparent)]
    InvalidCommand(CommandError),
    #[error("invalid device endpoint '{0}', expected host[:port]")]
    InvalidEndpoint(String),
    #[error("request to {url} timed out")]
    Timeout {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("device at {url} unreachable: {source}")]
    Unreachable {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl From<CommandError> for DeviceError {
    fn from(value: CommandError) -> Self {
        match value {
            CommandError::AnimationConflict => DeviceError::AnimationConflict,
            other => DeviceError::InvalidCommand(other),
        }
    }
}

impl DeviceError {
    pub(crate) fn transport(url: String, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            DeviceError::Timeout { url, source }
        } else {
            DeviceError::Unreachable { url, source }
        }
    }
}
