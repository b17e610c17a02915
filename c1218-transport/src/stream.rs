//! Byte-level access to the probe line

use crate::error::{C1218Error, C1218Result};
use async_trait::async_trait;
use std::time::Duration;

/// One half-duplex byte stream to a meter
///
/// A single owner drives both directions, so every operation takes
/// `&mut self` and implementations do no locking of their own.
#[async_trait]
pub trait StreamAccessor: Send {
    /// Replace the per-operation timeout (`None` waits forever)
    async fn set_timeout(&mut self, timeout: Option<Duration>) -> C1218Result<()>;

    fn timeout(&self) -> Option<Duration>;

    /// Read whatever is available, at most `buf.len()` bytes
    ///
    /// Returns 0 at end of stream. A read that outlives the timeout fails
    /// with `C1218Error::Timeout`.
    async fn read(&mut self, buf: &mut [u8]) -> C1218Result<usize>;

    /// Fill `buf` completely; end of stream part way through is an I/O error
    async fn read_exact(&mut self, buf: &mut [u8]) -> C1218Result<()> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.read(&mut buf[filled..]).await? {
                0 => {
                    return Err(C1218Error::Io(std::io::Error::new(
                        std::io::ErrorKind::UnexpectedEof,
                        format!("line closed after {} of {} bytes", filled, buf.len()),
                    )));
                }
                n => filled += n,
            }
        }
        Ok(())
    }

    /// Next byte off the line (ACK/NAK polling)
    async fn read_byte(&mut self) -> C1218Result<u8> {
        let mut byte = [0u8; 1];
        self.read_exact(&mut byte).await?;
        Ok(byte[0])
    }

    async fn write(&mut self, buf: &[u8]) -> C1218Result<usize>;

    async fn write_all(&mut self, buf: &[u8]) -> C1218Result<()> {
        let mut written = 0;
        while written < buf.len() {
            match self.write(&buf[written..]).await? {
                0 => {
                    return Err(C1218Error::Io(std::io::Error::new(
                        std::io::ErrorKind::WriteZero,
                        format!("line accepted {} of {} bytes", written, buf.len()),
                    )));
                }
                n => written += n,
            }
        }
        Ok(())
    }

    async fn flush(&mut self) -> C1218Result<()>;

    /// Put a whole frame or control byte on the line and flush it
    async fn send(&mut self, bytes: &[u8]) -> C1218Result<()> {
        self.write_all(bytes).await?;
        self.flush().await
    }

    fn is_closed(&self) -> bool;

    async fn close(&mut self) -> C1218Result<()>;
}

/// A stream that can be (re)opened and whose line polarity can be set
#[async_trait]
pub trait TransportLayer: StreamAccessor {
    async fn open(&mut self) -> C1218Result<()>;

    /// Invert the line polarity (optical probes that drive the LED with RTS)
    ///
    /// Transports without control lines accept and ignore the setting.
    async fn set_invert(&mut self, _invert: bool) -> C1218Result<()> {
        Ok(())
    }

    fn is_inverted(&self) -> bool {
        false
    }
}
