//! Computation budget of a transaction.

/// Intrinsic cost of every transaction.
pub const TX_BASE: u64 = 21_000;
/// Cost of reading a storage slot.
pub const SLOAD: u64 = 2_100;
/// Cost of writing a non-zero value to an empty slot.
pub const SSTORE_SET: u64 = 20_000;
/// Cost of any other storage write.
pub const SSTORE_RESET: u64 = 5_000;
/// Base cost of emitting a log.
pub const LOG: u64 = 375;
/// Cost per log topic.
pub const LOG_TOPIC: u64 = 375;
/// Cost per byte of log data.
pub const LOG_DATA_BYTE: u64 = 8;
/// Base cost of entering a call frame.
pub const CALL: u64 = 700;
/// Extra cost of a call that moves value.
pub const CALL_VALUE: u64 = 9_000;

/// Tracks gas spent against a fixed limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct GasMeter {
    limit: u64,
    used: u64,
}

impl GasMeter {
    pub(crate) fn new(limit: u64) -> Self {
        Self { limit, used: 0 }
    }

    /// Spends `amount` of gas.
    ///
    /// Returns `false` once the limit is hit; the whole limit counts as used
    /// from then on.
    pub(crate) fn charge(&mut self, amount: u64) -> bool {
        match self.used.checked_add(amount) {
            Some(used) if used <= self.limit => {
                self.used = used;
                true
            }
            _ => {
                self.used = self.limit;
                false
            }
        }
    }

    pub(crate) fn used(&self) -> u64 {
        self.used
    }

    pub(crate) fn remaining(&self) -> u64 {
        self.limit - self.used
    }
}

/// Cost of emitting a log with `topics` topics and `bytes` bytes of data.
pub(crate) fn log_cost(topics: usize, bytes: usize) -> u64 {
    let topics = u64::try_from(topics).unwrap_or(u64::MAX);
    let bytes = u64::try_from(bytes).unwrap_or(u64::MAX);
    LOG.saturating_add(LOG_TOPIC.saturating_mul(topics))
        .saturating_add(LOG_DATA_BYTE.saturating_mul(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn charges_until_limit() {
        let mut meter = GasMeter::new(10_000);
        assert!(meter.charge(SLOAD));
        assert_eq!(meter.used(), SLOAD);
        assert_eq!(meter.remaining(), 10_000 - SLOAD);
    }

    #[test]
    fn exhausting_consumes_whole_limit() {
        let mut meter = GasMeter::new(SLOAD);
        assert!(meter.charge(SLOAD));
        assert!(!meter.charge(1));
        assert_eq!(meter.used(), SLOAD);
        assert_eq!(meter.remaining(), 0);
    }

    #[test]
    fn overflowing_charge_fails() {
        let mut meter = GasMeter::new(u64::MAX);
        assert!(meter.charge(1));
        assert!(!meter.charge(u64::MAX));
    }

    #[test]
    fn log_cost_counts_topics_and_bytes() {
        assert_eq!(log_cost(0, 0), LOG);
        assert_eq!(log_cost(2, 32), LOG + 2 * LOG_TOPIC + 32 * LOG_DATA_BYTE);
    }
}
