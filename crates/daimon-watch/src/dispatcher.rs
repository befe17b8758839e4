//! Fire-and-forget delivery of session events to NOESIS

use crate::error::DispatchError;
use daimon_core::OutboundEvent;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Route on the NOESIS service that receives session events
pub const EVENT_PATH: &str = "/api/daimon/claude/event";

/// Body NOESIS answers with
#[derive(Debug, Deserialize)]
struct EventAck {
    status: String,
    #[serde(default)]
    stored: bool,
}

/// Posts outbound events with a hard per-request timeout
///
/// Cheap to clone; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct EventDispatcher {
    client: reqwest::Client,
    endpoint: String,
}

impl EventDispatcher {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, DispatchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(DispatchError::Client)?;

        Ok(Self {
            client,
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), EVENT_PATH),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send one event and wait for the acknowledgement
    pub async fn dispatch(&self, event: &OutboundEvent) -> Result<(), DispatchError> {
        let response = self.client.post(&self.endpoint).json(event).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DispatchError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        let ack: EventAck = serde_json::from_slice(&body)
            .map_err(|e| DispatchError::MalformedResponse(e.to_string()))?;

        debug!(status = %ack.status, stored = ack.stored, "event acknowledged");
        Ok(())
    }

    /// Send one event, discarding any failure
    ///
    /// Returns whether the event was delivered. A lost event is an accepted
    /// outcome; nothing is retried or queued.
    pub async fn deliver(&self, event: &OutboundEvent) -> bool {
        match self.dispatch(event).await {
            Ok(()) => true,
            Err(err) => {
                debug!(
                    endpoint = %self.endpoint,
                    event_type = %event.event_type,
                    error = %err,
                    "failed to send event"
                );
                false
            }
        }
    }
}
