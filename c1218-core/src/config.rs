//! Protocol configuration
//!
//! All structures derive serde traits and fall back to defaults for missing
//! fields, so a front-end can load them from whatever format it prefers.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How a response frame announces that more fragments follow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FragmentSignal {
    /// Low-order bit of the control byte is set
    #[default]
    ControlLowBit,
    /// Sequence-number byte is non-zero (packets remaining)
    SequenceNonZero,
}

/// Link layer parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    /// Stray bytes tolerated while waiting for ACK/NAK before prompting with a NAK
    pub max_discard_bytes: u8,
    /// NAK prompts sent without an ACK before giving up
    pub max_nak_prompts: u8,
    /// Pause before acknowledging a response fragment
    pub ack_delay_ms: u64,
    /// Multi-fragment detection rule
    pub fragment_signal: FragmentSignal,
}

impl LinkConfig {
    pub fn ack_delay(&self) -> Duration {
        Duration::from_millis(self.ack_delay_ms)
    }
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            max_discard_bytes: 2,
            max_nak_prompts: 3,
            ack_delay_ms: 150,
            fragment_signal: FragmentSignal::default(),
        }
    }
}

/// Bounded retry policy for service requests
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total attempts per request, including the first one
    pub max_attempts: u32,
    /// Pause between attempts
    pub delay_ms: u64,
}

impl RetryConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay_ms: 1000,
        }
    }
}

/// Parameters proposed by the Negotiate service
///
/// Encoded as `<packet-size:2><nbr-packets:1><baud-rate:1>`. The defaults
/// propose 256-byte packets, one packet per request and 9600 baud (code 6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NegotiationParameters {
    pub packet_size: u16,
    pub max_packets: u8,
    pub baud_code: u8,
}

impl NegotiationParameters {
    pub fn encode(&self) -> [u8; 4] {
        let size = self.packet_size.to_be_bytes();
        [size[0], size[1], self.max_packets, self.baud_code]
    }
}

impl Default for NegotiationParameters {
    fn default() -> Self {
        Self {
            packet_size: 256,
            max_packets: 1,
            baud_code: 6,
        }
    }
}

/// Complete client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct C1218Config {
    pub link: LinkConfig,
    pub retry: RetryConfig,
    pub negotiation: NegotiationParameters,
    /// Send the Negotiate service during login setup
    pub negotiation_enabled: bool,
    /// Dump frames to the debug log
    pub debug: bool,
    /// Pause between rejected security codes when trying a list of them
    pub logon_pause_ms: u64,
}

impl C1218Config {
    pub fn logon_pause(&self) -> Duration {
        Duration::from_millis(self.logon_pause_ms)
    }
}

impl Default for C1218Config {
    fn default() -> Self {
        Self {
            link: LinkConfig::default(),
            retry: RetryConfig::default(),
            negotiation: NegotiationParameters::default(),
            negotiation_enabled: false,
            debug: false,
            logon_pause_ms: 5000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negotiation_encoding() {
        assert_eq!(NegotiationParameters::default().encode(), [0x01, 0x00, 0x01, 0x06]);
    }

    #[test]
    fn test_defaults() {
        let config = C1218Config::default();
        assert_eq!(config.link.max_discard_bytes, 2);
        assert_eq!(config.link.ack_delay(), Duration::from_millis(150));
        assert_eq!(config.retry.max_attempts, 3);
        assert!(!config.negotiation_enabled);
        assert_eq!(config.link.fragment_signal, FragmentSignal::ControlLowBit);
        assert_eq!(config.logon_pause(), Duration::from_secs(5));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let json = r#"{ "negotiation_enabled": true, "link": { "fragment_signal": "sequence_non_zero" } }"#;
        let config: C1218Config = serde_json::from_str(json).unwrap();
        assert!(config.negotiation_enabled);
        assert_eq!(config.link.fragment_signal, FragmentSignal::SequenceNonZero);
        assert_eq!(config.link.max_nak_prompts, 3);
        assert_eq!(config.retry, RetryConfig::default());
        assert_eq!(config.logon_pause_ms, 5000);
    }
}
