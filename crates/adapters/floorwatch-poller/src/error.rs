use std::fmt;

/// The two collaborator endpoints a cycle reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Floor,
    Agents,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Self::Floor => "/api/manager/floor",
            Self::Agents => "/api/manager/agents",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Why a fetch failed. Any variant fails the whole cycle.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("{endpoint} returned HTTP {status}")]
    Status { endpoint: Endpoint, status: u16 },
    #[error("request to {endpoint} failed: {message}")]
    Transport { endpoint: Endpoint, message: String },
    #[error("could not decode {endpoint} response: {message}")]
    Decode { endpoint: Endpoint, message: String },
}

impl FetchError {
    pub fn endpoint(&self) -> Endpoint {
        match self {
            Self::Status { endpoint, .. }
            | Self::Transport { endpoint, .. }
            | Self::Decode { endpoint, .. } => *endpoint,
        }
    }

    /// HTTP status, when the server answered with a failure code.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_message_names_endpoint() {
        let err = FetchError::Status {
            endpoint: Endpoint::Floor,
            status: 500,
        };
        assert_eq!(err.to_string(), "/api/manager/floor returned HTTP 500");
        assert_eq!(err.status(), Some(500));
        assert_eq!(err.endpoint(), Endpoint::Floor);
    }

    #[test]
    fn transport_error_has_no_status() {
        let err = FetchError::Transport {
            endpoint: Endpoint::Agents,
            message: "connection refused".to_string(),
        };
        assert!(err.status().is_none());
        assert!(err.to_string().contains("connection refused"));
    }
}
