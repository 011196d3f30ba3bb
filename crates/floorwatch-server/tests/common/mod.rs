use std::net::SocketAddr;
use std::time::Duration;

use floorwatch_server::config::{FloorConfig, ServerConfig};
use floorwatch_server::state::AppState;
use floorwatch_server::{build_app, router};

pub struct TestServer {
    pub addr: SocketAddr,
    _shutdown: tokio::task::JoinHandle<()>,
}

impl TestServer {
    /// Start a test server with the default floor.
    pub async fn new() -> Self {
        Self::from_config(ServerConfig::default()).await
    }

    /// Start a test server whose floor endpoint always fails.
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
        Self::serve(app).await
    }

    pub async fn from_state(state: AppState) -> Self {
        Self::serve(router(state)).await
    }

    async fn serve(app: axum::Router) -> Self {
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

    pub fn floor_url(&self) -> String {
        format!("{}/api/manager/floor", self.base_url())
    }

    pub fn agents_url(&self) -> String {
        format!("{}/api/manager/agents", self.base_url())
    }
}
