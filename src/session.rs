//! HTTP session with bounded retries and per domain rate limiting
use std::time::Duration;

use reqwest::{Client as HttpClient, Response, Url};
use serde::Serialize;
use tokio::{
    sync::Mutex,
    time::{Instant, sleep},
};

/// Retries used when none are configured
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Timeout of a single attempt when none is configured
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Enforces a minimum delay between requests sent to a domain and its subdomains
#[derive(Debug)]
pub struct DomainLimiter {
    domain: String,
    interval: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl DomainLimiter {
    /// Create a limiter for `domain`, e.g. `appspot.com`
    pub fn new(domain: impl Into<String>, interval: Duration) -> Self {
        Self {
            domain: domain.into().to_ascii_lowercase(),
            interval,
            last_request: Mutex::new(None),
        }
    }

    /// Whether requests to `url` go through this limiter
    pub fn matches(&self, url: &Url) -> bool {
        let Some(host) = url.host_str() else {
            return false;
        };
        let host = host.to_ascii_lowercase();
        host == self.domain
            || host
                .strip_suffix(&self.domain)
                .is_some_and(|prefix| prefix.ends_with('.'))
    }

    /// Wait until the domain may be contacted again.
    ///
    /// The lock is held while sleeping, so concurrent callers go out one interval apart.
    pub async fn wait(&self) {
        let mut last_request = self.last_request.lock().await;
        if let Some(last) = *last_request {
            let ready_at = last + self.interval;
            let now = Instant::now();
            if ready_at > now {
                log::debug!(
                    "Delaying request to {} for {:?}",
                    self.domain,
                    ready_at - now
                );
                sleep(ready_at - now).await;
            }
        }
        *last_request = Some(Instant::now());
    }
}

/// HTTP session shared by notifiers
#[derive(Debug)]
pub struct RequestSession {
    client: HttpClient,
    max_retries: u32,
    retry_backoff: Duration,
    limiters: Vec<DomainLimiter>,
}

impl RequestSession {
    /// Session with a default client, [`DEFAULT_MAX_RETRIES`], [`DEFAULT_TIMEOUT`] and no limiters
    pub fn new() -> Result<Self, reqwest::Error> {
        Self::builder().build()
    }

    #[allow(missing_docs)]
    pub fn builder() -> RequestSessionBuilder {
        RequestSessionBuilder::default()
    }

    /// Send a GET request with `query` as query parameters.
    ///
    /// Connection errors and timeouts are retried up to the configured number of times,
    /// responses with an error status are returned as errors without retrying.
    pub async fn get<Q: Serialize + ?Sized>(
        &self,
        url: Url,
        query: &Q,
    ) -> Result<Response, reqwest::Error> {
        if let Some(limiter) = self.limiters.iter().find(|l| l.matches(&url)) {
            limiter.wait().await;
        }

        let mut attempt = 0;
        loop {
            let result = self.client.get(url.clone()).query(query).send().await;
            match result {
                Ok(response) => return response.error_for_status(),
                Err(e) if attempt < self.max_retries && (e.is_connect() || e.is_timeout()) => {
                    attempt += 1;
                    log::warn!(
                        "Request to {} failed ({e}), retry {attempt}/{}",
                        url.host_str().unwrap_or_default(),
                        self.max_retries
                    );
                    if !self.retry_backoff.is_zero() {
                        sleep(self.retry_backoff * attempt).await;
                    }
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Builder for [`RequestSession`]
#[derive(Debug)]
pub struct RequestSessionBuilder {
    client: Option<HttpClient>,
    timeout: Duration,
    max_retries: u32,
    retry_backoff: Duration,
    limiters: Vec<DomainLimiter>,
}

impl Default for RequestSessionBuilder {
    fn default() -> Self {
        Self {
            client: None,
            timeout: DEFAULT_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_backoff: Duration::ZERO,
            limiters: Vec::new(),
        }
    }
}

impl RequestSessionBuilder {
    /// Use an existing client instead of building one. Its own timeout applies
    pub fn client(mut self, client: HttpClient) -> Self {
        self.client = Some(client);
        self
    }

    /// Timeout of each attempt, from connecting until the body is read
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Extra attempts after a connection error or timeout
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Delay before a retry, multiplied by the retry number
    pub fn retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }

    /// Space requests to `domain` at least `interval` apart
    pub fn domain_limiter(mut self, domain: impl Into<String>, interval: Duration) -> Self {
        self.limiters.push(DomainLimiter::new(domain, interval));
        self
    }

    #[allow(missing_docs)]
    pub fn build(self) -> Result<RequestSession, reqwest::Error> {
        let client = match self.client {
            Some(client) => client,
            None => HttpClient::builder().timeout(self.timeout).build()?,
        };
        Ok(RequestSession {
            client,
            max_retries: self.max_retries,
            retry_backoff: self.retry_backoff,
            limiters: self.limiters,
        })
    }
}
