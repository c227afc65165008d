//! Chain-level parameters the ledger executes under.

/// Block Timestamp - Epoch timestamp: 1st January 2025 `00::00::00`.
pub const BLOCK_TIMESTAMP: u64 = 1_735_689_600;
/// Arbitrum's CHAIN ID.
pub const CHAIN_ID: u64 = 42161;
/// Number of the block every transaction is included in.
pub const BLOCK_NUMBER: u64 = 1;
/// Gas available to a transaction that does not set its own limit.
pub const BLOCK_GAS_LIMIT: u64 = 30_000_000;
/// Maximum number of nested call frames.
pub const MAX_CALL_DEPTH: usize = 1024;
/// Size in bytes of the native stack a transaction executes on.
pub const CALL_STACK_SIZE: usize = 256 * 1024 * 1024;

/// Chain-level parameters of a [`crate::Ledger`].
///
/// Defaults to the constants of this module. Use the `with_*` methods to
/// override single values:
///
/// ```rust
/// use ledger::Environment;
///
/// let env = Environment::default().with_chain_id(1).with_max_call_depth(16);
/// assert_eq!(env.chain_id(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Environment {
    block_timestamp: u64,
    block_number: u64,
    chain_id: u64,
    block_gas_limit: u64,
    max_call_depth: usize,
    call_stack_size: usize,
}

impl Default for Environment {
    fn default() -> Environment {
        Self {
            block_timestamp: BLOCK_TIMESTAMP,
            block_number: BLOCK_NUMBER,
            chain_id: CHAIN_ID,
            block_gas_limit: BLOCK_GAS_LIMIT,
            max_call_depth: MAX_CALL_DEPTH,
            call_stack_size: CALL_STACK_SIZE,
        }
    }
}

impl Environment {
    /// Sets the block timestamp.
    #[must_use]
    pub fn with_block_timestamp(mut self, block_timestamp: u64) -> Self {
        self.block_timestamp = block_timestamp;
        self
    }

    /// Sets the block number.
    #[must_use]
    pub fn with_block_number(mut self, block_number: u64) -> Self {
        self.block_number = block_number;
        self
    }

    /// Sets the chain id.
    #[must_use]
    pub fn with_chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = chain_id;
        self
    }

    /// Sets the default gas limit of a transaction.
    #[must_use]
    pub fn with_block_gas_limit(mut self, block_gas_limit: u64) -> Self {
        self.block_gas_limit = block_gas_limit;
        self
    }

    /// Sets the maximum number of nested call frames.
    #[must_use]
    pub fn with_max_call_depth(mut self, max_call_depth: usize) -> Self {
        self.max_call_depth = max_call_depth;
        self
    }

    /// Sets the size in bytes of the native stack transactions execute on.
    ///
    /// Must leave room for [`Environment::max_call_depth`] nested frames.
    #[must_use]
    pub fn with_call_stack_size(mut self, call_stack_size: usize) -> Self {
        self.call_stack_size = call_stack_size;
        self
    }

    /// Gets a bounded estimate of the Unix timestamp at which the Sequencer
    /// sequenced the transaction.
    #[must_use]
    pub fn block_timestamp(&self) -> u64 {
        self.block_timestamp
    }

    /// Gets the current block number.
    #[must_use]
    pub fn block_number(&self) -> u64 {
        self.block_number
    }

    /// Gets the chain ID of the current chain.
    #[must_use]
    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Gets the gas limit used when a transaction does not set one.
    #[must_use]
    pub fn block_gas_limit(&self) -> u64 {
        self.block_gas_limit
    }

    /// Gets the maximum number of nested call frames.
    #[must_use]
    pub fn max_call_depth(&self) -> usize {
        self.max_call_depth
    }

    /// Gets the size in bytes of the native stack transactions execute on.
    #[must_use]
    pub fn call_stack_size(&self) -> usize {
        self.call_stack_size
    }
}
