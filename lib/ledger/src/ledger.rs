//! Entry point for submitting transactions.
use std::sync::Arc;

use alloy_primitives::{Address, Log, U256};
use alloy_sol_types::SolCall;

use crate::{
    call,
    context::{execute, on_call_stack, CallKind, Context, Frame},
    contract::Contract,
    environment::Environment,
    gas,
    state::State,
};

/// An account-based ledger executing one transaction at a time.
///
/// Each transaction is atomic: either every state change made by it and its
/// nested frames is committed, or none is. The only exception is the sender's
/// nonce, which is consumed even by a failed transaction.
pub struct Ledger {
    state: State,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new(Environment::default())
    }
}

/// Data of a committed transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    /// Data returned by the called code.
    pub output: Vec<u8>,
    /// Logs emitted, in emission order.
    pub logs: Vec<Log>,
    /// Gas spent by the transaction.
    pub gas_used: u64,
}

impl Receipt {
    /// Decodes the output as the return value of `C`.
    ///
    /// # Errors
    ///
    /// * [`alloy_sol_types::Error`] - If the output is not a valid encoding
    ///   of the return type.
    pub fn decode<C: SolCall>(&self) -> Result<C::Return, alloy_sol_types::Error> {
        C::abi_decode_returns(&self.output)
    }
}

/// A transaction that did not commit.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("transaction reverted: {error}")]
pub struct Revert {
    /// Why the outermost frame failed.
    pub error: call::Error,
    /// Gas spent before failing.
    pub gas_used: u64,
}

impl Revert {
    /// Gets the revert data returned to the sender.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        self.error.revert_data()
    }
}

impl Ledger {
    /// Creates an empty ledger running under `env`.
    #[must_use]
    pub fn new(env: Environment) -> Self {
        Self { state: State::new(env) }
    }

    /// Gets the chain parameters.
    #[must_use]
    pub fn environment(&self) -> &Environment {
        &self.state.env
    }

    /// Gets the balance of `account`.
    #[must_use]
    pub fn balance(&self, account: Address) -> U256 {
        self.state.balance(account)
    }

    /// Overwrites the balance of `account` outside of any transaction.
    pub fn set_balance(&mut self, account: Address, balance: U256) {
        self.state.set_balance(account, balance);
        self.state.commit();
    }

    /// Gets the number of transactions sent by `account`.
    #[must_use]
    pub fn nonce(&self, account: Address) -> u64 {
        self.state.nonce(account)
    }

    /// Returns `true` if `account` has code installed.
    #[must_use]
    pub fn has_code(&self, account: Address) -> bool {
        self.state.has_code(account)
    }

    /// Reads a raw storage word of `account`.
    #[must_use]
    pub fn storage_at(&self, account: Address, slot: U256) -> U256 {
        self.state.sload(account, slot)
    }

    /// Installs `code` at the next contract address of `deployer`.
    pub fn deploy(
        &mut self,
        deployer: Address,
        code: impl Contract + 'static,
    ) -> Address {
        let nonce = self.state.increment_nonce(deployer);
        let address = deployer.create(nonce);
        self.state.set_code(address, Arc::new(code));
        self.state.commit();
        tracing::debug!(%deployer, %address, "deployed contract");
        address
    }

    /// Installs `code` at the next contract address of `deployer` and runs
    /// `constructor` against the new account.
    ///
    /// The constructor runs in a frame whose sender is `deployer`. If it
    /// fails, the account is removed again and every change is discarded.
    ///
    /// # Errors
    ///
    /// * [`Revert`] - If the constructor reverted or ran out of gas.
    pub fn deploy_with<C, F>(
        &mut self,
        deployer: Address,
        code: C,
        constructor: F,
    ) -> Result<(Address, Receipt), Revert>
    where
        C: Contract + 'static,
        F: FnOnce(&C, &mut Context<'_>) -> Result<(), Vec<u8>> + Send,
    {
        let gas_limit = self.state.env.block_gas_limit();
        self.state.begin(gas_limit);

        let nonce = self.state.increment_nonce(deployer);
        self.state.commit();
        let address = deployer.create(nonce);
        let checkpoint = self.state.checkpoint();

        let code = Arc::new(code);
        self.state.set_code(address, code.clone());

        let frame = Frame {
            address,
            code_address: address,
            sender: deployer,
            value: U256::ZERO,
        };
        let result = if self.state.charge(gas::TX_BASE) {
            let stack_size = self.state.env.call_stack_size();
            let state = &mut self.state;
            on_call_stack(stack_size, || {
                state.depth += 1;
                let result = constructor(&code, &mut Context::new(state, frame));
                state.depth -= 1;
                result
            })
            .and_then(|result| result.map_err(call::Error::Revert))
        } else {
            Err(call::Error::OutOfGas)
        };
        let result = if self.state.halted {
            Err(call::Error::OutOfGas)
        } else {
            result
        };

        match result {
            Ok(()) => {
                tracing::debug!(%deployer, %address, "deployed contract");
                Ok((address, self.finish(Vec::new())))
            }
            Err(error) => {
                tracing::debug!(%deployer, %error, "deployment reverted");
                self.state.revert_to(checkpoint);
                Err(self.fail(error))
            }
        }
    }

    /// Starts building a transaction sent by `account`.
    pub fn sender(&mut self, account: Address) -> Sender<'_> {
        Sender { ledger: self, from: account, value: U256::ZERO, gas_limit: None }
    }

    fn transact(
        &mut self,
        from: Address,
        to: Address,
        value: U256,
        data: &[u8],
        gas_limit: u64,
    ) -> Result<Receipt, Revert> {
        self.state.begin(gas_limit);
        self.state.increment_nonce(from);
        self.state.commit();

        tracing::debug!(%from, %to, %value, len = data.len(), "transaction");

        let result = self.run(from, to, value, data);
        match result {
            Ok(output) => Ok(self.finish(output)),
            Err(error) => {
                tracing::debug!(%from, %to, %error, "transaction reverted");
                Err(self.fail(error))
            }
        }
    }

    fn simulate(
        &mut self,
        from: Address,
        to: Address,
        value: U256,
        data: &[u8],
        gas_limit: u64,
    ) -> Result<Receipt, Revert> {
        self.state.begin(gas_limit);
        let checkpoint = self.state.checkpoint();

        let result = self.run(from, to, value, data);
        let outcome = match result {
            Ok(output) => Ok(Receipt {
                output,
                logs: self.state.logs.clone(),
                gas_used: self.state.gas.used(),
            }),
            Err(error) => {
                Err(Revert { error, gas_used: self.state.gas.used() })
            }
        };

        self.state.revert_to(checkpoint);
        self.state.commit();
        outcome
    }

    fn run(
        &mut self,
        from: Address,
        to: Address,
        value: U256,
        data: &[u8],
    ) -> Result<Vec<u8>, call::Error> {
        if !self.state.charge(gas::TX_BASE) {
            return Err(call::Error::OutOfGas);
        }
        let frame = Frame { address: to, code_address: to, sender: from, value };
        let stack_size = self.state.env.call_stack_size();
        let state = &mut self.state;
        on_call_stack(stack_size, || execute(state, frame, data, CallKind::Call))?
    }

    fn finish(&mut self, output: Vec<u8>) -> Receipt {
        self.state.commit();
        Receipt {
            output,
            logs: std::mem::take(&mut self.state.logs),
            gas_used: self.state.gas.used(),
        }
    }

    fn fail(&mut self, error: call::Error) -> Revert {
        self.state.commit();
        self.state.logs.clear();
        Revert { error, gas_used: self.state.gas.used() }
    }
}

/// Builder of a transaction sent by a single account.
pub struct Sender<'a> {
    ledger: &'a mut Ledger,
    from: Address,
    value: U256,
    gas_limit: Option<u64>,
}

impl Sender<'_> {
    /// Attaches `value` to the transaction.
    #[must_use]
    pub fn value(mut self, value: U256) -> Self {
        self.value = value;
        self
    }

    /// Limits the gas the transaction may spend.
    #[must_use]
    pub fn gas_limit(mut self, gas_limit: u64) -> Self {
        self.gas_limit = Some(gas_limit);
        self
    }

    /// Sends raw `data` to `to` and commits the result.
    ///
    /// # Errors
    ///
    /// * [`Revert`] - If execution failed. Nothing but the sender's nonce is
    ///   changed in that case.
    pub fn transact(self, to: Address, data: &[u8]) -> Result<Receipt, Revert> {
        let gas_limit = self.resolve_gas_limit();
        self.ledger.transact(self.from, to, self.value, data, gas_limit)
    }

    /// Sends the ABI-encoded `call` to `to` and commits the result.
    ///
    /// # Errors
    ///
    /// * [`Revert`] - If execution failed. Nothing but the sender's nonce is
    ///   changed in that case.
    pub fn send<C: SolCall>(self, to: Address, call: &C) -> Result<Receipt, Revert> {
        self.transact(to, &call.abi_encode())
    }

    /// Executes the ABI-encoded `call` against `to` without committing
    /// anything, not even the sender's nonce.
    ///
    /// # Errors
    ///
    /// * [`Revert`] - If execution failed.
    pub fn view<C: SolCall>(self, to: Address, call: &C) -> Result<Receipt, Revert> {
        let gas_limit = self.resolve_gas_limit();
        self.ledger.simulate(self.from, to, self.value, &call.abi_encode(), gas_limit)
    }

    fn resolve_gas_limit(&self) -> u64 {
        self.gas_limit
            .unwrap_or_else(|| self.ledger.state.env.block_gas_limit())
    }
}
