//! Request builder shared by every endpoint of the client

use crate::models::ErrorBody;
use crate::{ApiError, Result};
use log::debug;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use url::Url;

/// Helper for building and executing HTTP requests
pub struct FetchBuilder<'a> {
    client: &'a Client,
    url: Url,
    method: Method,
    body: Option<Vec<u8>>,
}

impl<'a> FetchBuilder<'a> {
    /// Create a new FetchBuilder
    pub fn new(client: &'a Client, url: Url, method: Method) -> Self {
        Self {
            client,
            url,
            method,
            body: None,
        }
    }

    /// Add a JSON body to the request
    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self> {
        self.body = Some(serde_json::to_vec(body)?);
        Ok(self)
    }

    fn build(&self) -> RequestBuilder {
        let mut req = self
            .client
            .request(self.method.clone(), self.url.clone())
            .header("Accept", "application/json");

        if let Some(body) = &self.body {
            req = req
                .header("Content-Type", "application/json")
                .body(body.clone());
        }

        req
    }

    async fn send(&self) -> Result<Response> {
        debug!("{} {}", self.method, self.url.path());
        let response = self.build().send().await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(error_from_body(status, &text));
        }

        Ok(response)
    }

    /// Execute the request and parse the response as JSON
    pub async fn execute<T: DeserializeOwned>(&self) -> Result<T> {
        let response = self.send().await?;
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| ApiError::Deserialization(e.to_string()))
    }

    /// Execute the request, discarding any response body
    pub async fn execute_empty(&self) -> Result<()> {
        self.send().await.map(|_| ())
    }
}

/// Map a failed response to the server's `{error}` message, or to the bare
/// status when the body carries none.
pub(crate) fn error_from_body(status: StatusCode, body: &str) -> ApiError {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            error: Some(message),
        }) => ApiError::Api { status, message },
        _ => ApiError::Http { status },
    }
}

/// Helper for creating HTTP requests
pub struct Fetch;

impl Fetch {
    /// Create a GET request
    pub fn get(client: &Client, url: Url) -> FetchBuilder<'_> {
        FetchBuilder::new(client, url, Method::GET)
    }

    /// Create a POST request
    pub fn post(client: &Client, url: Url) -> FetchBuilder<'_> {
        FetchBuilder::new(client, url, Method::POST)
    }

    /// Create a DELETE request
    pub fn delete(client: &Client, url: Url) -> FetchBuilder<'_> {
        FetchBuilder::new(client, url, Method::DELETE)
    }
}
