//! Client builder for C12.18 connections
//!
//! # Usage Example
//!
//! ```rust,no_run
//! use c1218_client::ClientBuilder;
//! use std::time::Duration;
//!
//! # fn example() -> c1218_core::C1218Result<()> {
//! let client = ClientBuilder::new()
//!     .serial("/dev/ttyUSB0", 9600)
//!     .timeout(Duration::from_secs(3))
//!     .invert(true)
//!     .negotiation(true)
//!     .build()?;
//! # Ok(())
//! # }
//! ```

use super::C1218Client;
use c1218_core::config::{C1218Config, LinkConfig, RetryConfig};
use c1218_core::error::{C1218Error, C1218Result};
use c1218_transport::{SerialSettings, SerialTransport, TransportLayer};
use std::time::Duration;

/// Default serial read timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Fluent builder for [`C1218Client`]
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    serial: Option<(String, u32)>,
    timeout: Option<Duration>,
    invert: bool,
    config: C1218Config,
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self {
            serial: None,
            timeout: Some(DEFAULT_TIMEOUT),
            invert: false,
            config: C1218Config::default(),
        }
    }

    /// Configure the serial port (e.g. "/dev/ttyUSB0" or "COM1")
    pub fn serial(mut self, port_name: &str, baud_rate: u32) -> Self {
        self.serial = Some((port_name.to_string(), baud_rate));
        self
    }

    /// Per-read timeout; `None` blocks indefinitely
    pub fn timeout(mut self, timeout: impl Into<Option<Duration>>) -> Self {
        self.timeout = timeout.into();
        self
    }

    /// Drive the probe with inverted RTS
    pub fn invert(mut self, invert: bool) -> Self {
        self.invert = invert;
        self
    }

    /// Replace the whole protocol configuration
    pub fn config(mut self, config: C1218Config) -> Self {
        self.config = config;
        self
    }

    pub fn link(mut self, link: LinkConfig) -> Self {
        self.config.link = link;
        self
    }

    pub fn retry(mut self, retry: RetryConfig) -> Self {
        self.config.retry = retry;
        self
    }

    /// Negotiate during `login_setup`
    pub fn negotiation(mut self, enabled: bool) -> Self {
        self.config.negotiation_enabled = enabled;
        self
    }

    /// Hex-dump every packet at debug level
    pub fn debug(mut self, enabled: bool) -> Self {
        self.config.debug = enabled;
        self
    }

    /// Build a client over a serial port
    ///
    /// # Errors
    /// Returns `Config` if no serial port was configured.
    pub fn build(self) -> C1218Result<C1218Client<SerialTransport>> {
        let Some((port_name, baud_rate)) = self.serial else {
            return Err(C1218Error::Config(
                "Serial port must be configured".to_string(),
            ));
        };
        let settings = SerialSettings {
            timeout: self.timeout,
            invert: self.invert,
            ..SerialSettings::new(port_name, baud_rate)
        };
        Ok(C1218Client::new(SerialTransport::new(settings), self.config))
    }

    /// Build a client over an already constructed transport
    pub fn build_with<T: TransportLayer>(self, transport: T) -> C1218Client<T> {
        C1218Client::new(transport, self.config)
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use c1218_transport::IoTransport;

    #[test]
    fn test_build_requires_port() {
        assert!(matches!(
            ClientBuilder::new().build(),
            Err(C1218Error::Config(_))
        ));
    }

    #[test]
    fn test_build_serial() {
        let mut client = ClientBuilder::new()
            .serial("/dev/ttyUSB0", 9600)
            .timeout(Duration::from_secs(2))
            .invert(true)
            .negotiation(true)
            .build()
            .unwrap();

        let settings = client.transport_mut().settings().clone();
        assert_eq!(settings.port_name, "/dev/ttyUSB0");
        assert_eq!(settings.baud_rate, 9600);
        assert_eq!(settings.timeout, Some(Duration::from_secs(2)));
        assert!(settings.invert);
        assert!(client.config().negotiation_enabled);
        assert!(client.session().negotiation_enabled());
    }

    #[tokio::test]
    async fn test_build_with_transport() {
        let (stream, _peer) = tokio::io::duplex(16);
        let client = ClientBuilder::new()
            .debug(true)
            .retry(RetryConfig {
                max_attempts: 5,
                delay_ms: 10,
            })
            .build_with(IoTransport::new(stream, None));
        assert!(client.session().debug_enabled());
        assert_eq!(client.config().retry.max_attempts, 5);
    }
}
