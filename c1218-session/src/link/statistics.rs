//! Link statistics collection

/// Counters maintained by a [`LinkSession`](crate::link::LinkSession)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkStatistics {
    /// Request packets written
    pub packets_sent: u64,
    /// Response packets received with a valid CRC
    pub packets_received: u64,
    pub acks_sent: u64,
    /// NAK prompts sent while waiting for an ACK
    pub naks_sent: u64,
    pub naks_received: u64,
    /// Stray bytes skipped while waiting for an ACK
    pub bytes_discarded: u64,
    pub timeouts: u64,
    pub crc_errors: u64,
    pub framing_errors: u64,
    /// Exchanges that completed successfully
    pub exchanges_completed: u64,
    pub exchanges_failed: u64,
}

impl LinkStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset all counters to zero
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Percentage of exchanges that failed
    pub fn failure_rate(&self) -> f64 {
        let total = self.exchanges_completed + self.exchanges_failed;
        if total == 0 {
            0.0
        } else {
            (self.exchanges_failed as f64 / total as f64) * 100.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_rate() {
        let mut stats = LinkStatistics::new();
        assert_eq!(stats.failure_rate(), 0.0);
        stats.exchanges_completed = 3;
        stats.exchanges_failed = 1;
        assert_eq!(stats.failure_rate(), 25.0);
        stats.clear();
        assert_eq!(stats, LinkStatistics::default());
    }
}
