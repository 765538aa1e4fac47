#![allow(dead_code)]

use aliascrab::{api, Config, DynUpstream, HttpUpstream};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

pub const RULES_PATH: &str = "/zones/zone/email/routing/rules";
pub const ADDRESSES_PATH: &str = "/accounts/account/email/routing/addresses";

pub fn config(base_url: &str) -> Config {
    let base_url = base_url.to_string();
    Config::from_lookup(move |key| {
        let value = match key {
            "CF_API_TOKEN" => "token",
            "CF_ACCOUNT_ID" => "account",
            "CF_ZONE_ID" => "zone",
            "DOMAIN" => "example.com",
            "CF_API_BASE_URL" => base_url.as_str(),
            _ => return None,
        };
        Some(value.to_string())
    })
    .unwrap()
}

/// The API router, talking to a provider at `base_url`.
pub fn app(base_url: &str) -> Router {
    let config = config(base_url);
    let upstream: DynUpstream = Arc::new(HttpUpstream::new(&config).unwrap());
    api::router(Arc::new(config), upstream)
}

pub struct Reply {
    pub status: StatusCode,
    pub text: String,
}

impl Reply {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.text).unwrap()
    }
}

pub async fn send(app: Router, method: &str, uri: &str, body: Option<Value>) -> Reply {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
    Reply {
        status,
        text: String::from_utf8(bytes.to_vec()).unwrap(),
    }
}
