//! Errors returned by the Join notifier
//!
use thiserror::Error;

/// Error when creating a Join client
#[derive(Debug, Error)]
pub enum ClientCreationError {
    #[allow(missing_docs)]
    #[error("Invalid Join endpoint url")]
    InvalidUrl(#[source] reqwest::Error),
    #[allow(missing_docs)]
    #[error("Build Client Error")]
    ClientBuild(#[source] reqwest::Error),
}

/// A Join configuration that breaks one of the configuration rules.
///
/// These are always fixable by the user, retrying without changing the configuration will fail again.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Unrecognized field or a field with the wrong type
    #[error("Invalid Join configuration: {0}")]
    Malformed(#[from] serde_json::Error),
    #[allow(missing_docs)]
    #[error("Either a `device` to notify, or an `api_key` must be specified, and not both")]
    AmbiguousTarget,
    #[allow(missing_docs)]
    #[error("Either a `device` to notify, or an `api_key` must be specified")]
    MissingTarget,
    #[allow(missing_docs)]
    #[error("`api_key` is required to use Join `group` notifications")]
    GroupWithoutApiKey,
    #[allow(missing_docs)]
    #[error(
        "Unknown Join group `{0}`, expected one of all, android, chrome, windows10, phone, tablet, pc"
    )]
    UnknownGroup(String),
    #[allow(missing_docs)]
    #[error("Join priority must be between -2 and 2, got {0}")]
    PriorityOutOfRange(i64),
    #[allow(missing_docs)]
    #[error("`device` must list at least one device id")]
    EmptyDeviceList,
}

/// Kind of a [`NotifyError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotifyErrorKind {
    /// The configuration was rejected before any request was made
    InvalidConfig,
    /// The HTTP request itself failed
    Transport,
    /// Join answered but reported an error
    ApiRejected,
}

/// Warning raised when a notification could not be delivered.
///
/// A failed notification never affects other notifications, the caller decides whether to retry.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[allow(missing_docs)]
    #[error(transparent)]
    InvalidConfig(#[from] ValidationError),
    /// Error making the http request to Join
    #[error("{0}")]
    Transport(#[from] reqwest::Error),
    /// `errorMessage` returned by Join
    #[error("{0}")]
    ApiRejected(String),
}

impl NotifyError {
    /// The kind of failure
    pub fn kind(&self) -> NotifyErrorKind {
        match self {
            Self::InvalidConfig(_) => NotifyErrorKind::InvalidConfig,
            Self::Transport(_) => NotifyErrorKind::Transport,
            Self::ApiRejected(_) => NotifyErrorKind::ApiRejected,
        }
    }
}

/// Error dispatching through a [`NotifierRegistry`](crate::registry::NotifierRegistry)
#[derive(Debug, Error)]
pub enum RegistryError {
    #[allow(missing_docs)]
    #[error("No notifier registered under `{0}`")]
    UnknownNotifier(String),
    #[allow(missing_docs)]
    #[error(transparent)]
    Notify(#[from] NotifyError),
}
