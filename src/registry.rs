//! Lookup of notifiers by name
//!
//! The host application registers its notifiers once at startup and then dispatches
//! notifications by name with the untyped configuration the user wrote.
use std::{collections::HashMap, fmt::Debug, sync::Arc};

use async_trait::async_trait;

use crate::{
    JoinClient, JoinConfig,
    error::{NotifyError, RegistryError},
};

/// Delivers a title and message to an external notification channel
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Name used to look the notifier up
    fn name(&self) -> &str;

    /// Validate `config` and deliver the notification.
    ///
    /// An invalid configuration fails with [`NotifyError::InvalidConfig`] before anything is sent.
    async fn notify(
        &self,
        title: &str,
        message: &str,
        config: &serde_json::Value,
    ) -> Result<(), NotifyError>;
}

impl Debug for dyn Notifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier")
            .field("name", &self.name())
            .finish()
    }
}

#[async_trait]
impl Notifier for JoinClient {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn notify(
        &self,
        title: &str,
        message: &str,
        config: &serde_json::Value,
    ) -> Result<(), NotifyError> {
        let config = JoinConfig::from_value(config)?;
        JoinClient::notify(self, title, message, &config).await
    }
}

/// Notifiers available to the application
#[derive(Debug, Default, Clone)]
pub struct NotifierRegistry {
    notifiers: HashMap<String, Arc<dyn Notifier>>,
}

impl NotifierRegistry {
    #[allow(missing_docs)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a notifier under its name, replacing any notifier with the same name
    pub fn register(&mut self, notifier: impl Notifier + 'static) -> &mut Self {
        let notifier: Arc<dyn Notifier> = Arc::new(notifier);
        if let Some(previous) = self
            .notifiers
            .insert(notifier.name().to_owned(), notifier)
        {
            log::warn!("Replaced notifier {}", previous.name());
        }
        self
    }

    #[allow(missing_docs)]
    pub fn get(&self, name: &str) -> Option<Arc<dyn Notifier>> {
        self.notifiers.get(name).cloned()
    }

    /// Names of the registered notifiers, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.notifiers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Send a notification through the notifier registered as `name`
    pub async fn notify(
        &self,
        name: &str,
        title: &str,
        message: &str,
        config: &serde_json::Value,
    ) -> Result<(), RegistryError> {
        let notifier = self
            .get(name)
            .ok_or_else(|| RegistryError::UnknownNotifier(name.to_owned()))?;
        Ok(notifier.notify(title, message, config).await?)
    }
}
