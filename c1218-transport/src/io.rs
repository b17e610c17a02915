//! Transport over any async byte stream
//!
//! Used for probes exposed through a bridge (TCP-to-serial servers, pipes)
//! and for driving the link layer against in-memory peers.

use crate::error::{C1218Error, C1218Result, not_connected};
use crate::stream::{StreamAccessor, TransportLayer};
use async_trait::async_trait;
use std::fmt;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Transport wrapping an already-connected `AsyncRead + AsyncWrite` stream
pub struct IoTransport<S> {
    stream: Option<S>,
    timeout: Option<Duration>,
    closed: bool,
}

impl<S> fmt::Debug for IoTransport<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IoTransport")
            .field("timeout", &self.timeout)
            .field("closed", &self.closed)
            .finish()
    }
}

impl<S> IoTransport<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    /// Wrap a connected stream
    ///
    /// # Arguments
    /// * `stream` - The connected stream
    /// * `timeout` - Optional read/write timeout
    pub fn new(stream: S, timeout: Option<Duration>) -> Self {
        Self {
            stream: Some(stream),
            timeout,
            closed: false,
        }
    }

    /// Give the stream back, if it has not been closed
    pub fn into_inner(self) -> Option<S> {
        self.stream
    }
}

#[async_trait]
impl<S> TransportLayer for IoTransport<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    async fn open(&mut self) -> C1218Result<()> {
        if self.stream.is_none() {
            return Err(not_connected("Stream"));
        }
        self.closed = false;
        Ok(())
    }
}

#[async_trait]
impl<S> StreamAccessor for IoTransport<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    async fn set_timeout(&mut self, timeout: Option<Duration>) -> C1218Result<()> {
        self.timeout = timeout;
        Ok(())
    }

    fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    async fn read(&mut self, buf: &mut [u8]) -> C1218Result<usize> {
        let stream = self.stream.as_mut().ok_or_else(|| not_connected("Stream"))?;

        let result = if let Some(timeout) = self.timeout {
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
        let stream = self.stream.as_mut().ok_or_else(|| not_connected("Stream"))?;

        if let Some(timeout) = self.timeout {
            tokio::time::timeout(timeout, stream.write(buf))
                .await
                .map_err(|_| C1218Error::Timeout)?
                .map_err(C1218Error::Io)
        } else {
            stream.write(buf).await.map_err(C1218Error::Io)
        }
    }

    async fn flush(&mut self) -> C1218Result<()> {
        let stream = self.stream.as_mut().ok_or_else(|| not_connected("Stream"))?;
        stream.flush().await.map_err(C1218Error::Io)
    }

    fn is_closed(&self) -> bool {
        self.closed
    }

    async fn close(&mut self) -> C1218Result<()> {
        if let Some(mut stream) = self.stream.take() {
            let _ = stream.shutdown().await;
        }
        self.closed = true;
        Ok(())
    }
}
