#![warn(missing_docs)]
//! A crate for sending push notifications with Join.
//! See <https://joaoapps.com/join/api/>
//!
//! Note that you will have to manually depend on a `reqwest` TLS feature if the default-tls feature is disabled.
use std::{sync::Arc, time::Duration};

use reqwest::{IntoUrl, Url};

pub use config::{Device, Group, JoinConfig, Priority, Target};
pub use error::{NotifyError, NotifyErrorKind, ValidationError};
pub use payload::{NotificationPayload, SendPushResponse};
pub use registry::{Notifier, NotifierRegistry};
pub use session::RequestSession;

pub mod config;
pub mod error;
mod payload;
pub mod registry;
pub mod session;

/// Default URL used to send Join pushes
pub const JOIN_URL: &str = "https://joinjoaomgcd.appspot.com/_ah/api/messaging/v1/sendPush";

/// Domain hosting the Join API, requests to it are rate limited
pub const JOIN_RATE_LIMITED_DOMAIN: &str = "appspot.com";

/// Minimum delay between two requests to [`JOIN_RATE_LIMITED_DOMAIN`]
pub const JOIN_RATE_LIMIT: Duration = Duration::from_secs(5);

/// Client to send Join notifications
#[derive(Debug, Clone)]
pub struct JoinClient {
    url: Url,
    session: Arc<RequestSession>,
}

impl JoinClient {
    /// Name the client is registered under as a [`Notifier`]
    pub const NAME: &'static str = "join";

    /// Creates a new `JoinClient` with the default url and a session limited to one request
    /// every [`JOIN_RATE_LIMIT`]
    pub fn new() -> Result<Self, error::ClientCreationError> {
        Self::with_url(JOIN_URL)
    }

    /// Creates a new `JoinClient` with the given url and a rate limited session
    pub fn with_url(url: impl IntoUrl) -> Result<Self, error::ClientCreationError> {
        let session = RequestSession::builder()
            .domain_limiter(JOIN_RATE_LIMITED_DOMAIN, JOIN_RATE_LIMIT)
            .build()
            .map_err(error::ClientCreationError::ClientBuild)?;
        Self::with_session(Arc::new(session), url)
    }

    /// Creates a new `JoinClient` with the given session and url. The session may be shared with
    /// other clients, its rate limits then apply to all of them.
    pub fn with_session(
        session: Arc<RequestSession>,
        url: impl IntoUrl,
    ) -> Result<Self, error::ClientCreationError> {
        Ok(Self {
            url: url
                .into_url()
                .map_err(error::ClientCreationError::InvalidUrl)?,
            session,
        })
    }

    /// Url the pushes are sent to
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Send `title` and `message` to the devices named by `config`
    pub async fn notify(
        &self,
        title: &str,
        message: &str,
        config: &JoinConfig,
    ) -> Result<(), NotifyError> {
        let payload = NotificationPayload::build(title, message, config);
        self.send(&payload).await
    }

    /// Send an already built payload
    pub async fn send(&self, payload: &NotificationPayload) -> Result<(), NotifyError> {
        log::debug!("Sending Join push {:?}", payload.title);
        let response = self.session.get(self.url.clone(), payload).await?;
        let response = response.json::<SendPushResponse>().await?;

        match response.error() {
            Some(message) => {
                log::warn!("Join rejected push: {message}");
                Err(NotifyError::ApiRejected(message.to_owned()))
            }
            None => Ok(()),
        }
    }
}
