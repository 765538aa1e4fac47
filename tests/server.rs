mod common;

use aliascrab::{DynUpstream, HttpUpstream};
use std::sync::Arc;

#[tokio::test]
async fn server_returns_once_shutdown_resolves() {
    let mut config = common::config("http://127.0.0.1:1");
    config.api_bind_addr = "127.0.0.1:0".parse().unwrap();
    let upstream: DynUpstream = Arc::new(HttpUpstream::new(&config).unwrap());

    let served = aliascrab::new_http(Arc::new(config), upstream, async {}).await;

    assert!(served.is_ok());
}
