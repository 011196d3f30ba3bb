use std::net::SocketAddr;
use std::time::Duration;

use floorwatch_poller::{FloorClient, FloorPoller, FloorPollerConfig};
use floorwatch_server::build_app;
use floorwatch_server::config::{FloorConfig, ServerConfig};

/// Mock floor service running on an ephemeral port.
pub struct TestServer {
    pub addr: SocketAddr,
    _shutdown: tokio::task::JoinHandle<()>,
}

impl TestServer {
    pub async fn new() -> Self {
        Self::from_config(ServerConfig::default()).await
    }

    /// Server whose floor endpoint always answers 500.
    pub async fn failing_floor() -> Self {
        let config = ServerConfig {
            floor: FloorConfig {
                failure_rate: 1.0,
                ..FloorConfig::default()
            },
            ..ServerConfig::default()
        };
        Self::from_config(config).await
    }

    pub async fn from_config(config: ServerConfig) -> Self {
        let (app, _state) = build_app(config);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Give the server a moment to start accepting
        tokio::time::sleep(Duration::from_millis(20)).await;

        Self {
            addr,
            _shutdown: handle,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

/// Config pointing at `base_url` with auto-refresh off.
pub fn manual_config(base_url: &str) -> FloorPollerConfig {
    FloorPollerConfig {
        base_url: base_url.to_string(),
        auto_refresh: false,
        request_timeout_ms: Some(2000),
        ..FloorPollerConfig::default()
    }
}

pub fn poller_for(config: &FloorPollerConfig) -> FloorPoller<FloorClient> {
    let client = FloorClient::new(config).unwrap();
    FloorPoller::new(client, config)
}

/// An address nothing is listening on.
pub async fn closed_port_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}
