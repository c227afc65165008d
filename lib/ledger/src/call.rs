//! Outcome of a call between accounts.
use alloy_primitives::U256;

/// Result of running contract code: return data on success, revert data on
/// failure.
pub type ArbResult = Result<Vec<u8>, Vec<u8>>;

/// Reasons a call frame can fail.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The callee reverted with the given data.
    #[error("execution reverted ({} bytes of revert data)", .0.len())]
    Revert(Vec<u8>),
    /// The transaction ran out of its computation budget.
    #[error("out of gas")]
    OutOfGas,
    /// Nesting calls went past the configured maximum depth.
    #[error("call depth limit of {0} exceeded")]
    CallDepthExceeded(usize),
    /// The sender cannot cover the value attached to the call.
    #[error("insufficient balance: have {balance}, need {needed}")]
    InsufficientBalance {
        /// Balance of the sender.
        balance: U256,
        /// Value the call tried to move.
        needed: U256,
    },
    /// The host could not set up a stack to run the call on.
    #[error("failed to set up the call stack: {0}")]
    CallStack(String),
}

impl Error {
    /// Returns the revert data carried by this error.
    ///
    /// Only [`Error::Revert`] carries data, every other failure reverts with
    /// empty data the way the EVM does.
    #[must_use]
    pub fn revert_data(&self) -> &[u8] {
        match self {
            Error::Revert(data) => data,
            _ => &[],
        }
    }

    /// Consumes the error and returns its revert data.
    #[must_use]
    pub fn encode(self) -> Vec<u8> {
        match self {
            Error::Revert(data) => data,
            _ => Vec::new(),
        }
    }
}

impl From<Error> for Vec<u8> {
    fn from(error: Error) -> Self {
        error.encode()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn revert_keeps_data() {
        let error = Error::Revert(vec![1, 2, 3]);
        assert_eq!(error.revert_data(), &[1, 2, 3]);
        assert_eq!(Vec::<u8>::from(error), vec![1, 2, 3]);
    }

    #[test]
    fn halts_encode_as_empty_revert() {
        assert!(Error::OutOfGas.encode().is_empty());
        assert!(Error::CallDepthExceeded(1024).encode().is_empty());
        assert!(Error::InsufficientBalance {
            balance: U256::ZERO,
            needed: U256::from(1),
        }
        .revert_data()
        .is_empty());
    }
}
