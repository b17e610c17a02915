//! Serial port transport implementation (ANSI Type-2 optical probe)

use crate::error::{C1218Error, C1218Result, not_connected};
use crate::stream::{StreamAccessor, TransportLayer};
use async_trait::async_trait;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio_serial::{SerialPort, SerialStream};

/// Wrapper for SerialStream that implements Debug
struct DebugSerialStream(SerialStream);

impl fmt::Debug for DebugSerialStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerialStream").finish()
    }
}

impl Deref for DebugSerialStream {
    type Target = SerialStream;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for DebugSerialStream {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

/// Serial port transport layer settings
///
/// Defaults follow the optical port: 9600 baud, 8 data bits, no parity,
/// one stop bit, no flow control.
#[derive(Debug, Clone)]
pub struct SerialSettings {
    pub port_name: String,
    pub baud_rate: u32,
    pub data_bits: tokio_serial::DataBits,
    pub stop_bits: tokio_serial::StopBits,
    pub parity: tokio_serial::Parity,
    pub flow_control: tokio_serial::FlowControl,
    pub timeout: Option<Duration>,
    /// Drive RTS low after opening (probes with inverted transmit logic)
    pub invert: bool,
}

impl SerialSettings {
    /// Create new serial settings with default parameters
    pub fn new(port_name: String, baud_rate: u32) -> Self {
        Self {
            port_name,
            baud_rate,
            data_bits: tokio_serial::DataBits::Eight,
            stop_bits: tokio_serial::StopBits::One,
            parity: tokio_serial::Parity::None,
            flow_control: tokio_serial::FlowControl::None,
            timeout: Some(Duration::from_secs(5)),
            invert: false,
        }
    }

    /// Create serial settings with timeout
    pub fn with_timeout(port_name: String, baud_rate: u32, timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
            ..Self::new(port_name, baud_rate)
        }
    }
}

/// Serial port transport layer implementation
#[derive(Debug)]
pub struct SerialTransport {
    stream: Option<DebugSerialStream>,
    settings: SerialSettings,
    closed: bool,
}

impl SerialTransport {
    /// Create a new serial transport layer
    pub fn new(settings: SerialSettings) -> Self {
        Self {
            stream: None,
            settings,
            closed: true,
        }
    }

    pub fn settings(&self) -> &SerialSettings {
        &self.settings
    }

    fn apply_line_state(stream: &mut SerialStream, invert: bool) -> C1218Result<()> {
        // RTS low inverts the probe, DTR low keeps the send LED off
        stream
            .write_request_to_send(!invert)
            .map_err(|e| C1218Error::Io(e.into()))?;
        stream
            .write_data_terminal_ready(false)
            .map_err(|e| C1218Error::Io(e.into()))?;
        Ok(())
    }
}

#[async_trait]
impl TransportLayer for SerialTransport {
    async fn open(&mut self) -> C1218Result<()> {
        if !self.closed {
            return Err(C1218Error::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Connection has already been opened",
            )));
        }

        let builder = tokio_serial::new(&self.settings.port_name, self.settings.baud_rate)
            .data_bits(self.settings.data_bits)
            .stop_bits(self.settings.stop_bits)
            .parity(self.settings.parity)
            .flow_control(self.settings.flow_control);

        let mut stream = SerialStream::open(&builder).map_err(|e| {
            C1218Error::Io(std::io::Error::other(format!(
                "Failed to open serial port {}: {}",
                self.settings.port_name, e
            )))
        })?;
        Self::apply_line_state(&mut stream, self.settings.invert)?;

        log::info!(
            "Opened {} at {} baud (invert: {})",
            self.settings.port_name,
            self.settings.baud_rate,
            self.settings.invert
        );
        self.stream = Some(DebugSerialStream(stream));
        self.closed = false;
        Ok(())
    }

    async fn set_invert(&mut self, invert: bool) -> C1218Result<()> {
        self.settings.invert = invert;
        if let Some(stream) = self.stream.as_mut() {
            Self::apply_line_state(stream, invert)?;
        }
        Ok(())
    }

    fn is_inverted(&self) -> bool {
        self.settings.invert
    }
}

#[async_trait]
impl StreamAccessor for SerialTransport {
    async fn set_timeout(&mut self, timeout: Option<Duration>) -> C1218Result<()> {
        self.settings.timeout = timeout;
        Ok(())
    }

    fn timeout(&self) -> Option<Duration> {
        self.settings.timeout
    }

    async fn read(&mut self, buf: &mut [u8]) -> C1218Result<usize> {
        let stream = self
            .stream
            .as_mut()
            .ok_or_else(|| not_connected("Serial stream"))?;

        let result = if let Some(timeout) = self.settings.timeout {
            tokio::time::timeout(timeout, stream.read(buf))
                .await
                .map_err(|_| C1218Error::Timeout)?
                .map_err(C1218Error::Io)
        } else {
            stream.read(buf).await.map_err(C1218Error::Io)
        };

        match result {
            Ok(0) => {
                self.closed = true;
                Ok(0)
            }
            Ok(n) => Ok(n),
            Err(e) => {
                self.closed = true;
                Err(e)
            }
        }
    }

    async fn write(&mut self, buf: &[u8]) -> C1218Result<usize> {
        let stream = self
            .stream
            .as_mut()
            .ok_or_else(|| not_connected("Serial stream"))?;

        if let Some(timeout) = self.settings.timeout {
            tokio::time::timeout(timeout, stream.write(buf))
                .await
                .map_err(|_| C1218Error::Timeout)?
                .map_err(C1218Error::Io)
        } else {
            stream.write(buf).await.map_err(C1218Error::Io)
        }
    }

    async fn flush(&mut self) -> C1218Result<()> {
        let stream = self
            .stream
            .as_mut()
            .ok_or_else(|| not_connected("Serial stream"))?;

        stream.flush().await.map_err(C1218Error::Io)
    }

    fn is_closed(&self) -> bool {
        self.closed
    }

    async fn close(&mut self) -> C1218Result<()> {
        if let Some(mut stream) = self.stream.take() {
            let _ = stream.flush().await;
            log::info!("Closed {}", self.settings.port_name);
        }
        self.closed = true;
        Ok(())
    }
}
