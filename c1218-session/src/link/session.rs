//! Link session: one request/response exchange with a meter
//!
//! The master writes a request packet, waits for the meter's ACK, then reads
//! response packets, acknowledging each, until the last fragment arrives.
//! The session never resends a request on its own; a failed exchange is
//! reported to the caller, which decides whether to retry.

use crate::error::{C1218Error, C1218Result};
use crate::link::crc::{crc16, verify_crc};
use crate::link::packet::{ACK, CRC_LENGTH, HEADER_LENGTH, NAK, Packet, PacketHeader};
use crate::link::state::LinkState;
use crate::link::statistics::LinkStatistics;
use c1218_core::config::LinkConfig;
use c1218_core::utils::to_hex_string;
use c1218_transport::StreamAccessor;

/// Link session over a byte transport
///
/// The session owns its transport; callers reach the port through
/// [`transport_mut`](Self::transport_mut) when they need to open, close or
/// reconfigure it.
#[derive(Debug)]
pub struct LinkSession<T: StreamAccessor> {
    transport: T,
    config: LinkConfig,
    state: LinkState,
    statistics: LinkStatistics,
    debug: bool,
}

impl<T: StreamAccessor> LinkSession<T> {
    pub fn new(transport: T, config: LinkConfig) -> Self {
        Self {
            transport,
            config,
            state: LinkState::Idle,
            statistics: LinkStatistics::new(),
            debug: false,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Consume the session and return the transport
    pub fn into_inner(self) -> T {
        self.transport
    }

    pub fn config(&self) -> &LinkConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: LinkConfig) {
        self.config = config;
    }

    /// Current link state
    pub fn state(&self) -> LinkState {
        self.state
    }

    pub fn statistics(&self) -> &LinkStatistics {
        &self.statistics
    }

    pub fn clear_statistics(&mut self) {
        self.statistics.clear();
    }

    /// Enable hex dumps of every packet sent and received
    pub fn set_debug(&mut self, debug: bool) {
        self.debug = debug;
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    /// Send one encoded request and return the reassembled response data
    ///
    /// The returned bytes are the concatenated data fields of every response
    /// packet, starting with the response status byte. Every response packet
    /// is acknowledged before this returns.
    ///
    /// # Errors
    /// - `NoAck` if the meter answers NAK or never ACKs despite NAK prompts
    /// - `BadFraming` if a response packet does not start with STP
    /// - `CrcMismatch` if a response packet fails its CRC check
    /// - `Timeout` if the transport read deadline expires
    pub async fn exchange(&mut self, request: &[u8]) -> C1218Result<Vec<u8>> {
        if !self.state.is_finished() {
            log::warn!(
                "Previous exchange abandoned in state {:?}, starting over",
                self.state
            );
            self.state = LinkState::Error;
        }

        let result = self.run_exchange(request).await;
        match &result {
            Ok(_) => {
                self.statistics.exchanges_completed += 1;
            }
            Err(e) => {
                self.record_error(e);
                self.statistics.exchanges_failed += 1;
                self.state = LinkState::Error;
                log::trace!("Link state -> Error ({})", e);
            }
        }
        result
    }

    async fn run_exchange(&mut self, request: &[u8]) -> C1218Result<Vec<u8>> {
        self.send_request(request).await?;
        self.transition(LinkState::AwaitAck)?;
        self.await_ack().await?;

        let mut response = Vec::new();
        loop {
            self.transition(LinkState::ReadHeader)?;
            let packet = self.read_packet().await?;
            let more = packet.has_more_fragments(self.config.fragment_signal);
            response.extend_from_slice(packet.data());

            self.send_ack().await?;
            if !more {
                self.transition(LinkState::Done)?;
                return Ok(response);
            }
            log::trace!(
                "More fragments follow (ctrl=0x{:02X}, seq={})",
                packet.control(),
                packet.sequence()
            );
        }
    }

    async fn send_request(&mut self, request: &[u8]) -> C1218Result<()> {
        if self.debug {
            log::debug!("Sending: {}", to_hex_string(request));
        }
        self.transport.send(request).await?;
        self.statistics.packets_sent += 1;
        Ok(())
    }

    /// Wait for the meter to accept the request
    ///
    /// Stray bytes are skipped. Once more than `max_discard_bytes` have been
    /// skipped a NAK is sent to prompt a retransmission and the count starts
    /// over; after `max_nak_prompts` such prompts the exchange fails.
    async fn await_ack(&mut self) -> C1218Result<()> {
        let mut discarded: usize = 0;
        let mut prompts: u8 = 0;

        loop {
            let byte = self.transport.read_byte().await?;
            match byte {
                ACK => {
                    log::trace!("ACK received");
                    return Ok(());
                }
                NAK => {
                    self.statistics.naks_received += 1;
                    log::warn!("Meter rejected the request with NAK");
                    return Err(C1218Error::NoAck("NAK received".to_string()));
                }
                other => {
                    self.statistics.bytes_discarded += 1;
                    discarded += 1;
                    log::warn!("Discarding unexpected byte 0x{:02X} while waiting for ACK", other);

                    if discarded > usize::from(self.config.max_discard_bytes) {
                        if prompts >= self.config.max_nak_prompts {
                            return Err(C1218Error::NoAck(format!(
                                "no ACK after {} NAK prompts",
                                prompts
                            )));
                        }
                        self.send_nak().await?;
                        prompts += 1;
                        discarded = 0;
                    }
                }
            }
        }
    }

    async fn read_packet(&mut self) -> C1218Result<Packet> {
        let mut header_bytes = [0u8; HEADER_LENGTH];
        self.transport.read_exact(&mut header_bytes).await?;
        let header = PacketHeader::parse(&header_bytes)?;

        self.transition(LinkState::ReadBody)?;
        let mut data = vec![0u8; header.length() as usize];
        self.transport.read_exact(&mut data).await?;
        let mut crc = [0u8; CRC_LENGTH];
        self.transport.read_exact(&mut crc).await?;

        self.transition(LinkState::ValidateCrc)?;
        let mut frame = Vec::with_capacity(HEADER_LENGTH + data.len());
        frame.extend_from_slice(&header_bytes);
        frame.extend_from_slice(&data);

        if self.debug {
            log::debug!("Received: {} {}", to_hex_string(&frame), to_hex_string(&crc));
        }

        if !verify_crc(&frame, &crc) {
            let expected = crc16(&frame);
            let received = u16::from_le_bytes(crc);
            log::warn!(
                "CRC check failed: expected 0x{:04X}, received 0x{:04X}",
                expected,
                received
            );
            return Err(C1218Error::CrcMismatch { expected, received });
        }

        self.statistics.packets_received += 1;
        Ok(Packet::from_parts(header, data))
    }

    async fn send_ack(&mut self) -> C1218Result<()> {
        let delay = self.config.ack_delay();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.transport.send(&[ACK]).await?;
        self.statistics.acks_sent += 1;
        log::trace!("ACK sent");
        Ok(())
    }

    async fn send_nak(&mut self) -> C1218Result<()> {
        self.transport.send(&[NAK]).await?;
        self.statistics.naks_sent += 1;
        log::warn!("Sent NAK to prompt retransmission");
        Ok(())
    }

    fn transition(&mut self, new_state: LinkState) -> C1218Result<()> {
        self.state.validate_transition(new_state)?;
        log::trace!("Link state {:?} -> {:?}", self.state, new_state);
        self.state = new_state;
        Ok(())
    }

    fn record_error(&mut self, error: &C1218Error) {
        match error {
            C1218Error::Timeout => {
                self.statistics.timeouts += 1;
                log::warn!(
                    "No response within {:?} in state {:?}",
                    self.transport.timeout(),
                    self.state
                );
            }
            C1218Error::CrcMismatch { .. } => self.statistics.crc_errors += 1,
            C1218Error::BadFraming(_) => self.statistics.framing_errors += 1,
            _ => {}
        }
    }
}
