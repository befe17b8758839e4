//! Up/down probes of the downstream services

use crate::error::DispatchError;
use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceStatus {
    Online,
    Offline(String),
}

impl ServiceStatus {
    pub fn is_online(&self) -> bool {
        matches!(self, ServiceStatus::Online)
    }
}

impl fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceStatus::Online => f.write_str("ONLINE"),
            ServiceStatus::Offline(reason) => write!(f, "OFFLINE ({})", reason),
        }
    }
}

/// Bounded-timeout `GET /health` checks
#[derive(Debug, Clone)]
pub struct HealthProbe {
    client: reqwest::Client,
}

impl HealthProbe {
    pub fn new(timeout: Duration) -> Result<Self, DispatchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(DispatchError::Client)?;
        Ok(Self { client })
    }

    /// Probe `{base_url}/health`
    pub async fn check(&self, base_url: &str) -> ServiceStatus {
        let url = format!("{}/health", base_url.trim_end_matches('/'));

        match self.client.get(&url).send().await {
            Ok(response) if response.status().is_success() => ServiceStatus::Online,
            Ok(response) => ServiceStatus::Offline(format!("status {}", response.status().as_u16())),
            Err(err) => ServiceStatus::Offline(DispatchError::from(err).to_string()),
        }
    }
}
