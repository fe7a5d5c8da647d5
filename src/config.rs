//! Configuration options for the planner client

use std::time::Duration;
use url::Url;

use crate::error::{Error, Result};
use crate::notify::DEFAULT_NOTICE_TTL;
use nutrition_planner_api::NutritionClient;

/// Base URL used when `NUTRITION_API_URL` is not set
pub const DEFAULT_API_URL: &str = "http://localhost:5000";

/// Configuration options for the planner client
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// The request timeout
    pub request_timeout: Option<Duration>,

    /// How long a notice stays visible before it is dismissed
    pub notice_ttl: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            request_timeout: Some(Duration::from_secs(30)),
            notice_ttl: DEFAULT_NOTICE_TTL,
        }
    }
}

impl ClientOptions {
    /// Set the request timeout
    pub fn with_request_timeout(mut self, value: Option<Duration>) -> Self {
        self.request_timeout = value;
        self
    }

    /// Set the notice lifetime
    pub fn with_notice_ttl(mut self, value: Duration) -> Self {
        self.notice_ttl = value;
        self
    }
}

/// Where the API lives and how to talk to it.
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    pub api_url: Url,
    pub options: ClientOptions,
}

impl PlannerConfig {
    /// Creates a new configuration, validating the URL.
    pub fn new(url_str: &str, options: ClientOptions) -> Result<Self> {
        let api_url = Url::parse(url_str)?;
        if !matches!(api_url.scheme(), "http" | "https") {
            return Err(Error::config(format!(
                "NUTRITION_API_URL must be http or https, got {}",
                api_url.scheme()
            )));
        }
        Ok(Self { api_url, options })
    }

    /// Reads `NUTRITION_API_URL`, `NUTRITION_API_TIMEOUT_SECS` and
    /// `NUTRITION_NOTICE_TTL_SECS` from the environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`PlannerConfig::from_env`] with an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = lookup("NUTRITION_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let mut options = ClientOptions::default();
        if let Some(secs) = parse_secs(&lookup, "NUTRITION_API_TIMEOUT_SECS")? {
            // zero disables the timeout
            let timeout = (secs > 0).then(|| Duration::from_secs(secs));
            options = options.with_request_timeout(timeout);
        }
        if let Some(secs) = parse_secs(&lookup, "NUTRITION_NOTICE_TTL_SECS")? {
            options = options.with_notice_ttl(Duration::from_secs(secs));
        }

        Self::new(&url, options)
    }

    /// Build the underlying HTTP client
    pub fn http_client(&self) -> Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.options.request_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(builder.build()?)
    }

    /// Build an API client for this configuration
    pub fn api_client(&self) -> Result<NutritionClient> {
        Ok(NutritionClient::new(self.api_url.as_str(), self.http_client()?)?)
    }
}

fn parse_secs<F>(lookup: &F, key: &str) -> Result<Option<u64>>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|_| Error::config(format!("{} must be a whole number of seconds, got {:?}", key, raw))),
    }
}
