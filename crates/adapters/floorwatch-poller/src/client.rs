use serde::de::DeserializeOwned;

use floorwatch_core::floor::{Agent, Call, FloorResponse, RosterResponse};

use crate::config::FloorPollerConfig;
use crate::error::{Endpoint, FetchError};

/// Where a poll cycle gets its calls and roster from.
pub trait FloorSource: Send + Sync + 'static {
    /// Calls in progress at the moment of the fetch, in no particular order.
    fn fetch_calls(&self) -> impl Future<Output = Result<Vec<Call>, FetchError>> + Send;

    /// Every known agent, in display order.
    fn fetch_roster(&self) -> impl Future<Output = Result<Vec<Agent>, FetchError>> + Send;
}

/// HTTP client for the manager floor and roster endpoints.
#[derive(Debug, Clone)]
pub struct FloorClient {
    base_url: String,
    client: reqwest::Client,
}

impl FloorClient {
    pub fn new(config: &FloorPollerConfig) -> reqwest::Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent("floorwatch-poller/0.1");
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        Ok(Self::with_client(&config.base_url, builder.build()?))
    }

    /// Wrap an existing client. A trailing slash on `base_url` is ignored.
    pub fn with_client(base_url: &str, client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: Endpoint) -> Result<T, FetchError> {
        let url = format!("{}{}", self.base_url, endpoint.path());

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::Transport {
                endpoint,
                message: e.to_string(),
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                endpoint,
                status: status.as_u16(),
            });
        }

        resp.json::<T>().await.map_err(|e| FetchError::Decode {
            endpoint,
            message: e.to_string(),
        })
    }
}

impl FloorSource for FloorClient {
    async fn fetch_calls(&self) -> Result<Vec<Call>, FetchError> {
        let body: FloorResponse = self.get_json(Endpoint::Floor).await?;
        Ok(body.calls)
    }

    async fn fetch_roster(&self) -> Result<Vec<Agent>, FetchError> {
        let body: RosterResponse = self.get_json(Endpoint::Agents).await?;
        Ok(body.agents.into_iter().map(Agent::from).collect())
    }
}
