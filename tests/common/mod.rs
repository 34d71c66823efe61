//! Shared utilities for integration testing.

use std::net::SocketAddr;

use meta_relay::config::RelayConfig;
use meta_relay::http::AppState;
use meta_relay::{HttpServer, Shutdown};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

/// A relay running on an ephemeral local port.
#[allow(dead_code)]
pub struct TestRelay {
    pub addr: SocketAddr,
    pub state: AppState,
    pub config_tx: mpsc::UnboundedSender<RelayConfig>,
    pub shutdown: Shutdown,
}

impl TestRelay {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestRelay {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start a relay with `config`, ignoring its bind address.
///
/// The listener is bound before the server task is spawned, so connections
/// are accepted as soon as this returns.
pub async fn start_relay(config: RelayConfig) -> TestRelay {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = HttpServer::new(config);
    let state = server.state().clone();
    let shutdown = Shutdown::new();
    let (config_tx, config_updates) = mpsc::unbounded_channel();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, config_updates, server_shutdown).await;
    });

    TestRelay {
        addr,
        state,
        config_tx,
        shutdown,
    }
}

/// Client that never goes through a system proxy.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
