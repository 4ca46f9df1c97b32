//! Device transport
//!
//! One idempotent GET per command against the configured device address,
//! expecting a JSON `{"status": ...}` reply.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, instrument};
use url::Url;

use chairlink_core::{ControllerConfig, DeviceStatus, DriveCommand, TransportError};

/// One attempt to deliver a command to the device.
///
/// Implementations must be cheap to share behind an `Arc`; the controller
/// issues one call per user action with no queueing or cancellation.
#[async_trait]
pub trait DeviceTransport: Send + Sync {
    /// Deliver `command` and return the device's status reply.
    async fn send(&self, command: DriveCommand) -> Result<DeviceStatus, TransportError>;
}

/// HTTP transport to the device.
///
/// The device address is resolved once at construction and reused for every
/// request; a command becomes `GET {device_url}/{wire_name}`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    device_url: Url,
}

impl HttpTransport {
    /// Create a transport for `device_url` with default timeouts.
    pub fn new(device_url: &str) -> Result<Self, TransportError> {
        Self::from_config(&ControllerConfig::new(device_url))
    }

    /// Create a transport from controller configuration.
    pub fn from_config(config: &ControllerConfig) -> Result<Self, TransportError> {
        Self::with_timeouts(
            &config.device_url,
            config.request_timeout,
            config.connect_timeout,
        )
    }

    /// Create a transport with explicit timeouts.
    pub fn with_timeouts(
        device_url: &str,
        request_timeout: Duration,
        connect_timeout: Duration,
    ) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(request_timeout)
            .connect_timeout(connect_timeout)
            .build()
            .map_err(into_transport_error)?;

        let device_url =
            Url::parse(device_url).map_err(|e| TransportError::InvalidUrl(e.to_string()))?;

        Ok(Self { client, device_url })
    }

    /// The configured device base URL.
    pub fn device_url(&self) -> &Url {
        &self.device_url
    }

    /// Check whether the device answers at all. Any HTTP response counts as
    /// reachable; only delivery failures surface as errors.
    #[instrument(skip(self))]
    pub async fn probe(&self) -> Result<(), TransportError> {
        self.client
            .get(self.device_url.clone())
            .send()
            .await
            .map_err(into_transport_error)?;
        Ok(())
    }

    fn command_url(&self, command: DriveCommand) -> Result<Url, TransportError> {
        self.device_url
            .join(command.wire_name())
            .map_err(|e| TransportError::InvalidUrl(e.to_string()))
    }
}

#[async_trait]
impl DeviceTransport for HttpTransport {
    #[instrument(skip(self))]
    async fn send(&self, command: DriveCommand) -> Result<DeviceStatus, TransportError> {
        let url = self.command_url(command)?;
        debug!(%url, "sending command");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(into_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }

        response.json::<DeviceStatus>().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout
            } else {
                TransportError::MalformedReply(e.to_string())
            }
        })
    }
}

/// Map a reqwest delivery error into the transport taxonomy.
fn into_transport_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Request(err.to_string())
    }
}
