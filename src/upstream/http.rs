//! A `reqwest` backed implementation of the [`Upstream`][super::Upstream] trait.
use crate::config::Config;
use crate::error::Error;
use crate::upstream::{Upstream, UpstreamResponse};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use tracing::{debug, warn};

/// Talks to the provider over HTTPS. Every request carries the configured bearer token and a
/// JSON content type.
#[derive(Debug, Clone)]
#[allow(clippy::module_name_repetitions)]
pub struct HttpUpstream {
    client: Client,
    base_url: String,
}

impl HttpUpstream {
    /// Build a client from the token, base URL and timeout in `config`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if the token can't be used as a header value, or
    /// [`Error::Upstream`] if the TLS backend fails to initialise.
    pub fn new(config: &Config) -> Result<Self, Error> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.api_token)).map_err(
            |_| Error::InvalidConfig {
                name: "CF_API_TOKEN",
                value: "<redacted>".to_string(),
            },
        )?;
        auth.set_sensitive(true);

        let mut default_headers = HeaderMap::new();
        default_headers.insert(AUTHORIZATION, auth);
        default_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(default_headers)
            .timeout(config.api_timeout)
            .use_rustls_tls()
            .build()?;

        Ok(Self {
            client,
            base_url: config.upstream_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(
        &self,
        method: &str,
        path: &str,
        request: RequestBuilder,
    ) -> Result<UpstreamResponse, Error> {
        let res = request.send().await.map_err(|err| {
            warn!("{method} {path} failed before the provider answered: {err}");
            Error::from(err)
        })?;

        let status = res.status();
        let text = res.text().await.map_err(|err| {
            warn!("{method} {path} -> {status}, but reading the body failed: {err}");
            Error::Upstream {
                status: Some(status.as_u16()),
                body: None,
                message: format!("{method} {path} returned {status} with an unreadable body"),
            }
        })?;
        // Error replies are usually, but not always, JSON documents.
        let body: Option<Value> = if text.trim().is_empty() {
            None
        } else {
            serde_json::from_str(&text).ok()
        };

        if status.is_success() {
            debug!("{method} {path} -> {status}");
            return Ok(UpstreamResponse {
                status: status.as_u16(),
                body: body.unwrap_or(Value::Null),
            });
        }

        warn!("{method} {path} -> {status}");
        let message = match &body {
            Some(_) => format!("{method} {path} returned {status}"),
            None if text.trim().is_empty() => format!("{method} {path} returned {status}"),
            None => text,
        };
        Err(Error::Upstream {
            status: Some(status.as_u16()),
            body,
            message,
        })
    }
}

#[async_trait::async_trait]
impl Upstream for HttpUpstream {
    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<UpstreamResponse, Error> {
        let request = self.client.get(self.url(path)).query(query);
        self.send("GET", path, request).await
    }

    async fn post(&self, path: &str, body: Option<&Value>) -> Result<UpstreamResponse, Error> {
        let mut request = self.client.post(self.url(path));
        if let Some(body) = body {
            request = request.json(body);
        }
        self.send("POST", path, request).await
    }

    async fn put(&self, path: &str, body: &Value) -> Result<UpstreamResponse, Error> {
        let request = self.client.put(self.url(path)).json(body);
        self.send("PUT", path, request).await
    }

    async fn delete(&self, path: &str) -> Result<UpstreamResponse, Error> {
        let request = self.client.delete(self.url(path));
        self.send("DELETE", path, request).await
    }
}
