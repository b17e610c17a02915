//! Per-conversation session state
//!
//! Everything that changes from one exchange to the next lives here rather
//! than in process-wide variables: the alternating control bit, the rolling
//! procedure sequence number and the operator toggles.

use c1218_core::config::C1218Config;

/// Mutable state of one logical conversation with a meter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    control_bit: bool,
    procedure_sequence: u8,
    negotiation_enabled: bool,
    debug_enabled: bool,
    inverted: bool,
}

impl SessionState {
    /// Fresh session: control bit 0, procedure sequence 0
    pub fn new(config: &C1218Config) -> Self {
        Self {
            negotiation_enabled: config.negotiation_enabled,
            debug_enabled: config.debug,
            ..Self::default()
        }
    }

    /// Control bit to place in the next request
    pub fn control_bit(&self) -> bool {
        self.control_bit
    }

    /// Flip the control bit after a completed exchange
    pub fn toggle_control_bit(&mut self) {
        self.control_bit = !self.control_bit;
    }

    pub fn procedure_sequence(&self) -> u8 {
        self.procedure_sequence
    }

    /// Take the current procedure sequence number and advance it, wrapping at 256
    pub fn next_procedure_sequence(&mut self) -> u8 {
        let current = self.procedure_sequence;
        self.procedure_sequence = current.wrapping_add(1);
        current
    }

    pub fn reset_procedure_sequence(&mut self) {
        self.procedure_sequence = 0;
    }

    pub fn negotiation_enabled(&self) -> bool {
        self.negotiation_enabled
    }

    pub fn set_negotiation_enabled(&mut self, enabled: bool) {
        self.negotiation_enabled = enabled;
    }

    pub fn debug_enabled(&self) -> bool {
        self.debug_enabled
    }

    pub fn set_debug_enabled(&mut self, enabled: bool) {
        self.debug_enabled = enabled;
    }

    /// Whether the optical probe line levels are inverted
    pub fn inverted(&self) -> bool {
        self.inverted
    }

    pub fn set_inverted(&mut self, inverted: bool) {
        self.inverted = inverted;
    }
}
