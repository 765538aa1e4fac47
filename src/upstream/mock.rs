//! A scripted [`Upstream`] double that records every call it receives.
use crate::error::Error;
use crate::upstream::{Upstream, UpstreamResponse};
use serde_json::Value;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    Get {
        path: String,
        query: Vec<(String, String)>,
    },
    Post {
        path: String,
        body: Option<Value>,
    },
    Put {
        path: String,
        body: Value,
    },
    Delete {
        path: String,
    },
}

impl Call {
    pub fn path(&self) -> &str {
        match self {
            Call::Get { path, .. }
            | Call::Post { path, .. }
            | Call::Put { path, .. }
            | Call::Delete { path } => path,
        }
    }

    pub fn query_param(&self, name: &str) -> Option<&str> {
        match self {
            Call::Get { query, .. } => query
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.as_str()),
            _ => None,
        }
    }
}

type Reply = Box<dyn Fn(&Call, &[Call]) -> Result<UpstreamResponse, Error> + Send + Sync>;

/// The reply closure receives the current call and every call made so far (including the
/// current one).
pub(crate) struct MockUpstream {
    calls: Mutex<Vec<Call>>,
    reply: Reply,
}

impl MockUpstream {
    pub fn new<F>(reply: F) -> Self
    where
        F: Fn(&Call, &[Call]) -> Result<UpstreamResponse, Error> + Send + Sync + 'static,
    {
        Self {
            calls: Mutex::new(Vec::new()),
            reply: Box::new(reply),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn gets(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, Call::Get { .. }))
            .collect()
    }

    pub fn puts(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, Call::Put { .. }))
            .collect()
    }

    fn record(&self, call: Call) -> Result<UpstreamResponse, Error> {
        let history = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(call.clone());
            calls.clone()
        };
        (self.reply)(&call, &history)
    }
}

pub(crate) fn status_error(status: u16, body: Option<Value>) -> Error {
    Error::Upstream {
        status: Some(status),
        body,
        message: format!("scripted {status}"),
    }
}

#[async_trait::async_trait]
impl Upstream for MockUpstream {
    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<UpstreamResponse, Error> {
        self.record(Call::Get {
            path: path.to_string(),
            query: query
                .iter()
                .map(|(k, v)| ((*k).to_string(), v.clone()))
                .collect(),
        })
    }

    async fn post(&self, path: &str, body: Option<&Value>) -> Result<UpstreamResponse, Error> {
        self.record(Call::Post {
            path: path.to_string(),
            body: body.cloned(),
        })
    }

    async fn put(&self, path: &str, body: &Value) -> Result<UpstreamResponse, Error> {
        self.record(Call::Put {
            path: path.to_string(),
            body: body.clone(),
        })
    }

    async fn delete(&self, path: &str) -> Result<UpstreamResponse, Error> {
        self.record(Call::Delete {
            path: path.to_string(),
        })
    }
}
