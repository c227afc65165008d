//! Execution context handed to contract code.
//!
//! A [`Context`] couples the world state with the [`Frame`] that is currently
//! executing. The frame separates *whose storage is acting* from *whose code
//! is running*: a regular call sets both to the callee, a delegate call keeps
//! the caller's storage, sender and value and only swaps the code.
use alloy_primitives::{Address, Log, U256};
use alloy_sol_types::SolEvent;

use crate::{
    call,
    gas::{self, log_cost},
    state::State,
};

/// Identity of a call frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    /// Account whose storage and balance the frame acts on.
    pub address: Address,
    /// Account the executing code was loaded from.
    pub code_address: Address,
    /// Caller observed by the executing code.
    pub sender: Address,
    /// Value attached to the call.
    pub value: U256,
}

/// How a new frame relates to the frame that opened it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CallKind {
    /// Storage, balance and code all belong to the callee. Moves value.
    Call,
    /// Only the code belongs to the callee. Never moves value.
    DelegateCall,
}

/// Access to the ledger from inside a running call frame.
pub struct Context<'a> {
    state: &'a mut State,
    frame: Frame,
}

impl<'a> Context<'a> {
    pub(crate) fn new(state: &'a mut State, frame: Frame) -> Self {
        Self { state, frame }
    }

    /// Gets the address whose storage the executing code acts on.
    ///
    /// Under delegation this is the delegating account, not the account the
    /// code was deployed at.
    #[must_use]
    pub fn address(&self) -> Address {
        self.frame.address
    }

    /// Gets the address the executing code was loaded from.
    #[must_use]
    pub fn code_address(&self) -> Address {
        self.frame.code_address
    }

    /// Returns `true` when the code runs on behalf of another account.
    #[must_use]
    pub fn is_delegated(&self) -> bool {
        self.frame.address != self.frame.code_address
    }

    /// Gets the address of the account that called the program.
    #[must_use]
    pub fn msg_sender(&self) -> Address {
        self.frame.sender
    }

    /// Gets the value attached to the call.
    #[must_use]
    pub fn msg_value(&self) -> U256 {
        self.frame.value
    }

    /// Gets the frame being executed.
    #[must_use]
    pub fn frame(&self) -> Frame {
        self.frame
    }

    /// Gets a bounded estimate of the Unix timestamp at which the Sequencer
    /// sequenced the transaction.
    #[must_use]
    pub fn block_timestamp(&self) -> u64 {
        self.state.env.block_timestamp()
    }

    /// Gets the current block number.
    #[must_use]
    pub fn block_number(&self) -> u64 {
        self.state.env.block_number()
    }

    /// Gets the chain ID of the current chain.
    #[must_use]
    pub fn chain_id(&self) -> u64 {
        self.state.env.chain_id()
    }

    /// Gets the gas left in the transaction.
    #[must_use]
    pub fn gas_left(&self) -> u64 {
        self.state.gas.remaining()
    }

    /// Gets the balance of `account`.
    #[must_use]
    pub fn balance(&self, account: Address) -> U256 {
        self.state.balance(account)
    }

    /// Returns `true` if `account` has code installed.
    #[must_use]
    pub fn has_code(&self, account: Address) -> bool {
        self.state.has_code(account)
    }

    /// Reads the word at `slot` of the acting account's storage.
    ///
    /// Reads return zero once the transaction has run out of gas.
    pub fn sload(&mut self, slot: U256) -> U256 {
        if !self.state.charge(gas::SLOAD) {
            return U256::ZERO;
        }
        self.state.sload(self.frame.address, slot)
    }

    /// Writes `value` at `slot` of the acting account's storage.
    ///
    /// Writes are dropped once the transaction has run out of gas.
    pub fn sstore(&mut self, slot: U256, value: U256) {
        let current = self.state.sload(self.frame.address, slot);
        let cost = if current.is_zero() && !value.is_zero() {
            gas::SSTORE_SET
        } else {
            gas::SSTORE_RESET
        };
        if !self.state.charge(cost) {
            return;
        }
        self.state.sstore(self.frame.address, slot, value);
    }

    /// Emits `event` from the acting account.
    pub fn log<E: SolEvent>(&mut self, event: E) {
        let data = event.encode_log_data();
        if !self.state.charge(log_cost(data.topics().len(), data.data.len())) {
            return;
        }
        self.state.push_log(Log { address: self.frame.address, data });
    }

    /// Calls `target` with `data`, attaching `value`.
    ///
    /// The callee runs with its own storage and sees the acting account as
    /// its caller.
    ///
    /// # Errors
    ///
    /// * [`call::Error::Revert`] - If the callee reverted.
    /// * [`call::Error::InsufficientBalance`] - If the acting account cannot
    ///   cover `value`.
    /// * [`call::Error::CallDepthExceeded`] - If the frame is nested too
    ///   deep.
    /// * [`call::Error::OutOfGas`] - If the transaction ran out of gas.
    pub fn call(
        &mut self,
        target: Address,
        value: U256,
        data: &[u8],
    ) -> Result<Vec<u8>, call::Error> {
        let frame = Frame {
            address: target,
            code_address: target,
            sender: self.frame.address,
            value,
        };
        execute(self.state, frame, data, CallKind::Call)
    }

    /// Runs the code of `target` against the acting account's storage.
    ///
    /// The callee observes the current sender and value and writes into the
    /// acting account's storage. The target's own storage is never touched.
    ///
    /// # Errors
    ///
    /// * [`call::Error::Revert`] - If the callee reverted.
    /// * [`call::Error::CallDepthExceeded`] - If the frame is nested too
    ///   deep.
    /// * [`call::Error::OutOfGas`] - If the transaction ran out of gas.
    pub fn delegate_call(
        &mut self,
        target: Address,
        data: &[u8],
    ) -> Result<Vec<u8>, call::Error> {
        let frame = Frame { code_address: target, ..self.frame };
        execute(self.state, frame, data, CallKind::DelegateCall)
    }
}

/// Opens `frame`, runs the code of `frame.code_address` and closes the frame.
///
/// Every change made inside the frame is reverted when it fails. Calling an
/// account without code succeeds with empty output.
pub(crate) fn execute(
    state: &mut State,
    frame: Frame,
    input: &[u8],
    kind: CallKind,
) -> Result<Vec<u8>, call::Error> {
    let max_depth = state.env.max_call_depth();
    if state.depth >= max_depth {
        tracing::debug!(depth = state.depth, "call depth limit reached");
        return Err(call::Error::CallDepthExceeded(max_depth));
    }

    let moves_value = kind == CallKind::Call && !frame.value.is_zero();
    let cost = if moves_value { gas::CALL + gas::CALL_VALUE } else { gas::CALL };
    if !state.charge(cost) {
        return Err(call::Error::OutOfGas);
    }

    let checkpoint = state.checkpoint();
    if moves_value {
        state.transfer(frame.sender, frame.address, frame.value)?;
    }

    let Some(code) = state.code(frame.code_address) else {
        return Ok(Vec::new());
    };

    tracing::trace!(
        address = %frame.address,
        code_address = %frame.code_address,
        sender = %frame.sender,
        depth = state.depth,
        ?kind,
        "entering frame"
    );

    state.depth += 1;
    let result = code.call(&mut Context::new(state, frame), input);
    state.depth -= 1;

    let result = if state.halted {
        Err(call::Error::OutOfGas)
    } else {
        result.map_err(call::Error::Revert)
    };

    if let Err(error) = &result {
        tracing::trace!(
            address = %frame.address,
            code_address = %frame.code_address,
            %error,
            "frame reverted"
        );
        state.revert_to(checkpoint);
    }

    result
}

/// Runs `task` on a thread whose stack holds `stack_size` bytes and waits for
/// it to finish.
///
/// Frames nest on the native stack, so a full-depth call chain needs more
/// room than the stack of the calling thread guarantees. A panic inside
/// `task` is resumed on the calling thread.
pub(crate) fn on_call_stack<T, F>(
    stack_size: usize,
    task: F,
) -> Result<T, call::Error>
where
    T: Send,
    F: FnOnce() -> T + Send,
{
    std::thread::scope(|scope| {
        let handle = std::thread::Builder::new()
            .name("ledger-call-stack".into())
            .stack_size(stack_size)
            .spawn_scoped(scope, task)
            .map_err(|error| {
                tracing::warn!(%error, stack_size, "failed to spawn call stack");
                call::Error::CallStack(error.to_string())
            })?;
        match handle.join() {
            Ok(output) => Ok(output),
            Err(payload) => std::panic::resume_unwind(payload),
        }
    })
}
