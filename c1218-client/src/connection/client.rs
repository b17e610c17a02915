//! C12.18 client: the service layer
//!
//! Every operation follows the same template: build the request, frame it
//! with the session's current control bit, run it through the link session
//! (with bounded retries), flip the control bit once the exchange completes
//! and decode the status byte.
//!
//! A nonzero status is not an error at this level. Operations return a
//! [`ServiceResponse`] and the caller inspects `is_success()`, or converts
//! with [`ServiceResponse::into_result`].
//!
//! # Usage Example
//!
//! ```rust,no_run
//! use c1218_client::ClientBuilder;
//! use c1218_core::{SecurityCode, UserName};
//!
//! # async fn example() -> c1218_core::C1218Result<()> {
//! let mut client = ClientBuilder::new()
//!     .serial("/dev/ttyUSB0", 9600)
//!     .build()?;
//! client.open().await?;
//! client.login_setup().await?.into_result()?;
//! client
//!     .login_with_password(2, &UserName::default(), &SecurityCode::from("secret"))
//!     .await?
//!     .into_result()?;
//! let table = client.read_table(1).await?.into_result()?.table_data()?;
//! client.terminate().await?;
//! client.close().await?;
//! # Ok(())
//! # }
//! ```

use crate::service::{ServiceCode, ServiceRequest, ServiceResponse};
use crate::session::SessionState;
use crate::tables::{GeneralConfig, ManufacturerIdentification};
use c1218_core::catalog::{
    GENERAL_CONFIG_TABLE, MANUFACTURER_IDENT_TABLE, PROCEDURE_RESPONSE_TABLE, decade,
};
use c1218_core::config::C1218Config;
use c1218_core::credentials::{SecurityCode, UserName};
use c1218_core::error::{C1218Error, C1218Result};
use c1218_session::link::{LinkSession, LinkState, LinkStatistics};
use c1218_transport::TransportLayer;

/// Result of reading one table of a sweep
pub type TableReadEntry = (u16, C1218Result<ServiceResponse>);

/// C12.18 master talking to one meter
///
/// The client exclusively owns the link session, which exclusively owns the
/// transport; all operations take `&mut self`.
#[derive(Debug)]
pub struct C1218Client<T: TransportLayer> {
    link: LinkSession<T>,
    session: SessionState,
    config: C1218Config,
}

impl<T: TransportLayer> C1218Client<T> {
    pub fn new(transport: T, config: C1218Config) -> Self {
        let mut session = SessionState::new(&config);
        session.set_inverted(transport.is_inverted());
        let mut link = LinkSession::new(transport, config.link.clone());
        link.set_debug(config.debug);
        Self {
            link,
            session,
            config,
        }
    }

    /// Open the underlying transport and start a fresh session
    pub async fn open(&mut self) -> C1218Result<()> {
        self.link.transport_mut().open().await?;
        self.session.set_inverted(self.link.transport().is_inverted());
        log::info!("C12.18 client opened");
        Ok(())
    }

    pub async fn close(&mut self) -> C1218Result<()> {
        self.link.transport_mut().close().await?;
        log::info!("C12.18 client closed");
        Ok(())
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn config(&self) -> &C1218Config {
        &self.config
    }

    pub fn link_state(&self) -> LinkState {
        self.link.state()
    }

    pub fn link_statistics(&self) -> &LinkStatistics {
        self.link.statistics()
    }

    pub fn transport_mut(&mut self) -> &mut T {
        self.link.transport_mut()
    }

    /// Flip packet hex dumps on or off; returns the new setting
    pub fn toggle_debug(&mut self) -> bool {
        let enabled = !self.session.debug_enabled();
        self.session.set_debug_enabled(enabled);
        self.link.set_debug(enabled);
        enabled
    }

    /// Flip whether `login_setup` negotiates; returns the new setting
    pub fn toggle_negotiation(&mut self) -> bool {
        let enabled = !self.session.negotiation_enabled();
        self.session.set_negotiation_enabled(enabled);
        enabled
    }

    /// Flip the probe line inversion; returns the new setting
    pub async fn toggle_invert(&mut self) -> C1218Result<bool> {
        let inverted = !self.session.inverted();
        self.link.transport_mut().set_invert(inverted).await?;
        self.session.set_inverted(inverted);
        Ok(inverted)
    }

    pub fn reset_procedure_sequence(&mut self) {
        self.session.reset_procedure_sequence();
    }

    /// Run one service request
    ///
    /// The packet is built once; retries resend the identical bytes. The
    /// control bit flips exactly once, after the exchange completes and
    /// before the status is decoded.
    ///
    /// # Errors
    /// - `RetriesExhausted` when every attempt failed with a retryable error
    /// - any non-retryable link or transport error from the first attempt
    ///   that hit it
    /// - `InvalidData` when the meter returned no status byte
    pub async fn execute(&mut self, request: ServiceRequest) -> C1218Result<ServiceResponse> {
        let service = request.service_code();
        let frame = request.to_packet(self.session.control_bit())?;

        let data = self.exchange_with_retry(service, &frame).await?;
        self.session.toggle_control_bit();

        let response = ServiceResponse::decode(service, data)?;
        if !response.is_success() {
            log::warn!("{} rejected: {}", service, response.status());
        }
        Ok(response)
    }

    async fn exchange_with_retry(
        &mut self,
        service: ServiceCode,
        frame: &[u8],
    ) -> C1218Result<Vec<u8>> {
        let max_attempts = self.config.retry.max_attempts.max(1);
        let delay = self.config.retry.delay();
        let mut attempt = 0;

        loop {
            attempt += 1;
            match self.link.exchange(frame).await {
                Ok(data) => return Ok(data),
                Err(e) if !e.is_retryable() => return Err(e),
                Err(e) if attempt >= max_attempts => {
                    log::warn!("{} failed after {} attempts: {}", service, attempt, e);
                    return Err(C1218Error::RetriesExhausted {
                        attempts: attempt,
                        last: Box::new(e),
                    });
                }
                Err(e) => {
                    log::warn!(
                        "{} attempt {}/{} failed: {}, retrying",
                        service,
                        attempt,
                        max_attempts,
                        e
                    );
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }
    }

    pub async fn ident(&mut self) -> C1218Result<ServiceResponse> {
        self.execute(ServiceRequest::Ident).await
    }

    /// Negotiate with the configured parameters
    pub async fn negotiate(&mut self) -> C1218Result<ServiceResponse> {
        let params = self.config.negotiation;
        self.execute(ServiceRequest::Negotiate(params)).await
    }

    pub async fn logon(&mut self, user_id: u16, user: &UserName) -> C1218Result<ServiceResponse> {
        self.execute(ServiceRequest::Logon {
            user_id,
            user: *user,
        })
        .await
    }

    pub async fn security(&mut self, code: &SecurityCode) -> C1218Result<ServiceResponse> {
        self.execute(ServiceRequest::Security(*code)).await
    }

    pub async fn logoff(&mut self) -> C1218Result<ServiceResponse> {
        self.execute(ServiceRequest::Logoff).await
    }

    pub async fn terminate(&mut self) -> C1218Result<ServiceResponse> {
        self.execute(ServiceRequest::Terminate).await
    }

    /// Ident, then Negotiate when negotiation is enabled
    ///
    /// Returns the Ident response if it was rejected or negotiation is off,
    /// the Negotiate response otherwise.
    pub async fn login_setup(&mut self) -> C1218Result<ServiceResponse> {
        let ident = self.ident().await?;
        if !ident.is_success() || !self.session.negotiation_enabled() {
            return Ok(ident);
        }
        self.negotiate().await
    }

    /// Logon then Security, as two separate exchanges
    ///
    /// Stops after Logon if it was rejected.
    pub async fn login_with_password(
        &mut self,
        user_id: u16,
        user: &UserName,
        code: &SecurityCode,
    ) -> C1218Result<ServiceResponse> {
        let logon = self.logon(user_id, user).await?;
        if !logon.is_success() {
            return Ok(logon);
        }
        self.security(code).await
    }

    pub async fn read_table(&mut self, table: u16) -> C1218Result<ServiceResponse> {
        self.execute(ServiceRequest::FullRead { table }).await
    }

    pub async fn write_table(&mut self, table: u16, data: &[u8]) -> C1218Result<ServiceResponse> {
        self.execute(ServiceRequest::FullWrite {
            table,
            data: data.to_vec(),
        })
        .await
    }

    /// Write `data` at a 24-bit `offset` inside `table`
    pub async fn partial_write(
        &mut self,
        table: u16,
        offset: u32,
        data: &[u8],
    ) -> C1218Result<ServiceResponse> {
        self.execute(ServiceRequest::PartialWrite {
            table,
            offset,
            data: data.to_vec(),
        })
        .await
    }

    /// Invoke a procedure by writing it to the procedure table
    ///
    /// The procedure sequence number advances once per call, however many
    /// link attempts the write takes.
    pub async fn run_procedure(
        &mut self,
        procedure: u16,
        data: &[u8],
    ) -> C1218Result<ServiceResponse> {
        let sequence = self.session.next_procedure_sequence();
        log::debug!("Running procedure {} (sequence {})", procedure, sequence);
        self.execute(ServiceRequest::procedure(procedure, sequence, data))
            .await
    }

    /// Invoke a procedure and read its result from the procedure response table
    ///
    /// Returns the procedure write response if it was rejected.
    pub async fn run_procedure_and_read(
        &mut self,
        procedure: u16,
        data: &[u8],
    ) -> C1218Result<ServiceResponse> {
        let response = self.run_procedure(procedure, data).await?;
        if !response.is_success() {
            return Ok(response);
        }
        self.read_table(PROCEDURE_RESPONSE_TABLE).await
    }

    /// Read each table in turn
    ///
    /// A table that fails with a retryable link error or is rejected does not
    /// stop the sweep; a fatal error does.
    pub async fn read_tables<I>(&mut self, tables: I) -> C1218Result<Vec<TableReadEntry>>
    where
        I: IntoIterator<Item = u16>,
    {
        let mut entries = Vec::new();
        for table in tables {
            match self.read_table(table).await {
                Err(e) if !e.root_cause().is_retryable() => return Err(e),
                result => entries.push((table, result)),
            }
        }
        let readable = entries
            .iter()
            .filter(|(_, result)| matches!(result, Ok(r) if r.is_success()))
            .count();
        log::info!("Table sweep done: {} of {} readable", readable, entries.len());
        Ok(entries)
    }

    /// Read the ten tables starting at `first`
    pub async fn read_decade(&mut self, first: u16) -> C1218Result<Vec<TableReadEntry>> {
        self.read_tables(decade(first)).await
    }

    /// Log on once, then send each security code until one is accepted
    ///
    /// With `verify_table` set, an accepted code only counts once that table
    /// can also be read; some meters accept any code and only enforce access
    /// on restricted tables. The client pauses `logon_pause_ms` between
    /// candidates. The session is left logged on after a hit.
    ///
    /// # Errors
    /// - `Rejected` when the Logon itself is rejected
    /// - any link error that outlives the retry policy
    pub async fn try_security_codes<I>(
        &mut self,
        user_id: u16,
        user: &UserName,
        codes: I,
        verify_table: Option<u16>,
    ) -> C1218Result<Option<SecurityCode>>
    where
        I: IntoIterator<Item = SecurityCode>,
    {
        self.logon(user_id, user).await?.into_result()?;

        let pause = self.config.logon_pause();
        let mut tried = 0usize;
        for code in codes {
            if tried > 0 && !pause.is_zero() {
                tokio::time::sleep(pause).await;
            }
            tried += 1;

            let mut accepted = self.security(&code).await?.is_success();
            if let (true, Some(table)) = (accepted, verify_table) {
                accepted = self.read_table(table).await?.is_success();
            }
            if accepted {
                log::info!("Security code accepted on attempt {}", tried);
                return Ok(Some(code));
            }
            log::debug!("Security code {} rejected", tried);
        }

        log::info!("No security code accepted after {} attempts", tried);
        Ok(None)
    }

    /// Read and decode Table 00
    pub async fn read_general_config(&mut self) -> C1218Result<GeneralConfig> {
        let table = self
            .read_table(GENERAL_CONFIG_TABLE)
            .await?
            .into_result()?
            .table_data()?;
        GeneralConfig::parse(&table.data)
    }

    /// Read and decode Table 01
    pub async fn read_manufacturer_identification(
        &mut self,
    ) -> C1218Result<ManufacturerIdentification> {
        let table = self
            .read_table(MANUFACTURER_IDENT_TABLE)
            .await?
            .into_result()?
            .table_data()?;
        ManufacturerIdentification::parse(&table.data)
    }
}
