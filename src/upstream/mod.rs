//! Access to the email routing provider's REST API.
//!
//! Handlers never talk HTTP to the provider directly. They go through the [`Upstream`] trait so
//! the provider can be swapped for a scripted double in tests. [`http::HttpUpstream`] is the
//! production implementation, a bearer-token authenticated `reqwest` client bound to the
//! provider's base URL.
//!
//! Collection endpoints are paginated by the provider; [`paginate::fetch_all_pages`] walks every
//! page and folds the results into one list.

use crate::error::Error;
use serde_json::Value;
use std::sync::Arc;

pub mod http;
#[cfg(test)]
pub(crate) mod mock;
pub mod paginate;

pub use http::HttpUpstream;
pub use paginate::{fetch_all_pages, PageSet};

/// `DynUpstream` is the shared handle to the process-wide [`Upstream`] client. It is built once
/// at start-up and never mutated afterwards.
#[allow(clippy::module_name_repetitions)]
pub type DynUpstream = Arc<dyn Upstream>;

/// A successful reply from the provider.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamResponse {
    pub status: u16,
    /// The decoded JSON body, or [`Value::Null`] when the provider sent no body.
    pub body: Value,
}

impl UpstreamResponse {
    #[must_use]
    pub fn ok(body: Value) -> Self {
        Self { status: 200, body }
    }
}

/// An async trait describing the four verbs the adapter needs from the provider.
///
/// Paths are relative to the provider's API root and must already be percent-encoded. Any
/// non-2xx reply is returned as [`Error::Upstream`] carrying the status and, when the provider
/// sent one, its JSON error document.
#[async_trait::async_trait]
pub trait Upstream: Send + Sync {
    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<UpstreamResponse, Error>;

    async fn post(&self, path: &str, body: Option<&Value>) -> Result<UpstreamResponse, Error>;

    async fn put(&self, path: &str, body: &Value) -> Result<UpstreamResponse, Error>;

    async fn delete(&self, path: &str) -> Result<UpstreamResponse, Error>;
}
