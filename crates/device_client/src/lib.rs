use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, Client, StatusCode};
use shared::domain::{Color, Command, Ring};
use tracing::{error, info, warn};

mod endpoint;
pub mod error;

pub use endpoint::DeviceEndpoint;
pub use error::DeviceError;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[async_trait]
pub trait IndicatorDevice: Send + Sync {
    async fn initialize(&self) -> Result<(), DeviceError>;
    async fn apply(&self, command: &Command) -> Result<(), DeviceError>;
}

/// Any completed HTTP exchange counts as success, including non-2xx statuses.
/// Transport failures are never retried.
#[derive(Debug, Clone)]
pub struct UfoClient {
    http: Client,
    endpoint: DeviceEndpoint,
}

impl UfoClient {
    pub fn new(endpoint: DeviceEndpoint, timeout: Duration) -> Result<Self, DeviceError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(DeviceError::Client)?;
        Ok(Self { http, endpoint })
    }

    pub async fn init(&self) -> Result<StatusCode, DeviceError> {
        info!(endpoint = %self.endpoint, "initializing UFO");
        self.get(self.endpoint.init_url()).await
    }

    pub async fn send(&self, command: &Command) -> Result<StatusCode, DeviceError> {
        info!(
            endpoint = %self.endpoint,
            ring = %command.ring,
            color = %command.color,
            animation = ?command.animation,
            "setting UFO ring"
        );
        self.get(self.endpoint.command_url(command)).await
    }

    /// Raw-flag entry point. Both flags set is refused before any request.
    pub async fn send_flags(
        &self,
        ring: Ring,
        color: Color,
        morph: bool,
        whirl: bool,
    ) -> Result<StatusCode, DeviceError> {
        let command = Command::from_flags(ring, color, morph, whirl).map_err(|err| {
            error!(%ring, %color, "UFO does not support morphing and whirling at the same time");
            DeviceError::from(err)
        })?;
        self.send(&command).await
    }

    async fn get(&self, url: String) -> Result<StatusCode, DeviceError> {
        let response = self
            .http
            .get(&url)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|source| DeviceError::transport(url.clone(), source))?;

        let status = response.status();
        if status.is_success() {
            info!(%url, %status, "UFO responded");
        } else {
            warn!(%url, %status, "UFO responded with non-success status");
        }
        drop(response);
        Ok(status)
    }
}

#[async_trait]
impl IndicatorDevice for UfoClient {
    async fn initialize(&self) -> Result<(), DeviceError> {
        self.init().await.map(|_| ())
    }

    async fn apply(&self, command: &Command) -> Result<(), DeviceError> {
        self.send(command).await.map(|_| ())
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
