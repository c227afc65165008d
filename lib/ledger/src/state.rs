//! Accounts, their storage and the journal that makes frames revertible.
use std::{collections::HashMap, sync::Arc};

use alloy_primitives::{Address, Log, U256};

use crate::{
    call, contract::Contract, environment::Environment, gas::GasMeter,
};

/// A single account of the ledger.
#[derive(Default, Clone)]
pub(crate) struct Account {
    pub(crate) balance: U256,
    pub(crate) nonce: u64,
    pub(crate) code: Option<Arc<dyn Contract>>,
    /// Unset slots read as zero, zero writes remove the entry.
    pub(crate) storage: HashMap<U256, U256>,
}

/// Undo record of a single state change.
enum JournalEntry {
    AccountCreated { address: Address },
    BalanceChanged { address: Address, previous: U256 },
    NonceChanged { address: Address, previous: u64 },
    CodeChanged { address: Address, previous: Option<Arc<dyn Contract>> },
    StorageChanged { address: Address, slot: U256, previous: U256 },
}

/// Position in the journal and log list a frame can be reverted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Checkpoint {
    journal: usize,
    logs: usize,
}

/// Complete world state plus the per-transaction bookkeeping.
pub(crate) struct State {
    pub(crate) env: Environment,
    accounts: HashMap<Address, Account>,
    journal: Vec<JournalEntry>,
    pub(crate) logs: Vec<Log>,
    pub(crate) gas: GasMeter,
    /// Set once the gas limit is hit. Nothing executes after that.
    pub(crate) halted: bool,
    pub(crate) depth: usize,
}

impl State {
    pub(crate) fn new(env: Environment) -> Self {
        Self {
            env,
            accounts: HashMap::new(),
            journal: Vec::new(),
            logs: Vec::new(),
            gas: GasMeter::new(env.block_gas_limit()),
            halted: false,
            depth: 0,
        }
    }

    /// Resets the per-transaction bookkeeping.
    pub(crate) fn begin(&mut self, gas_limit: u64) {
        self.journal.clear();
        self.logs.clear();
        self.gas = GasMeter::new(gas_limit);
        self.halted = false;
        self.depth = 0;
    }

    /// Makes every journaled change permanent.
    pub(crate) fn commit(&mut self) {
        self.journal.clear();
    }

    pub(crate) fn checkpoint(&self) -> Checkpoint {
        Checkpoint { journal: self.journal.len(), logs: self.logs.len() }
    }

    /// Undoes every change recorded after `checkpoint`.
    pub(crate) fn revert_to(&mut self, checkpoint: Checkpoint) {
        while self.journal.len() > checkpoint.journal {
            let Some(entry) = self.journal.pop() else {
                break;
            };
            self.undo(entry);
        }
        self.logs.truncate(checkpoint.logs);
    }

    fn undo(&mut self, entry: JournalEntry) {
        match entry {
            JournalEntry::AccountCreated { address } => {
                self.accounts.remove(&address);
            }
            JournalEntry::BalanceChanged { address, previous } => {
                if let Some(account) = self.accounts.get_mut(&address) {
                    account.balance = previous;
                }
            }
            JournalEntry::NonceChanged { address, previous } => {
                if let Some(account) = self.accounts.get_mut(&address) {
                    account.nonce = previous;
                }
            }
            JournalEntry::CodeChanged { address, previous } => {
                if let Some(account) = self.accounts.get_mut(&address) {
                    account.code = previous;
                }
            }
            JournalEntry::StorageChanged { address, slot, previous } => {
                if let Some(account) = self.accounts.get_mut(&address) {
                    if previous.is_zero() {
                        account.storage.remove(&slot);
                    } else {
                        account.storage.insert(slot, previous);
                    }
                }
            }
        }
    }

    /// Spends gas, halting the transaction when the budget runs out.
    pub(crate) fn charge(&mut self, amount: u64) -> bool {
        if self.halted {
            return false;
        }
        if !self.gas.charge(amount) {
            tracing::debug!(amount, "transaction ran out of gas");
            self.halted = true;
            return false;
        }
        true
    }

    fn account_mut(&mut self, address: Address) -> &mut Account {
        if !self.accounts.contains_key(&address) {
            self.journal.push(JournalEntry::AccountCreated { address });
        }
        self.accounts.entry(address).or_default()
    }

    pub(crate) fn balance(&self, address: Address) -> U256 {
        self.accounts.get(&address).map_or(U256::ZERO, |a| a.balance)
    }

    pub(crate) fn set_balance(&mut self, address: Address, balance: U256) {
        let account = self.account_mut(address);
        let previous = account.balance;
        account.balance = balance;
        self.journal.push(JournalEntry::BalanceChanged { address, previous });
    }

    /// Moves `value` from `from` to `to`.
    pub(crate) fn transfer(
        &mut self,
        from: Address,
        to: Address,
        value: U256,
    ) -> Result<(), call::Error> {
        let balance = self.balance(from);
        if balance < value {
            return Err(call::Error::InsufficientBalance {
                balance,
                needed: value,
            });
        }
        self.set_balance(from, balance - value);
        let to_balance = self.balance(to);
        self.set_balance(to, to_balance.saturating_add(value));
        Ok(())
    }

    pub(crate) fn nonce(&self, address: Address) -> u64 {
        self.accounts.get(&address).map_or(0, |a| a.nonce)
    }

    pub(crate) fn increment_nonce(&mut self, address: Address) -> u64 {
        let account = self.account_mut(address);
        let previous = account.nonce;
        account.nonce = previous.saturating_add(1);
        self.journal.push(JournalEntry::NonceChanged { address, previous });
        previous
    }

    pub(crate) fn code(&self, address: Address) -> Option<Arc<dyn Contract>> {
        self.accounts.get(&address).and_then(|a| a.code.clone())
    }

    pub(crate) fn has_code(&self, address: Address) -> bool {
        self.accounts.get(&address).is_some_and(|a| a.code.is_some())
    }

    pub(crate) fn set_code(&mut self, address: Address, code: Arc<dyn Contract>) {
        let account = self.account_mut(address);
        let previous = account.code.replace(code);
        self.journal.push(JournalEntry::CodeChanged { address, previous });
    }

    pub(crate) fn sload(&self, address: Address, slot: U256) -> U256 {
        self.accounts
            .get(&address)
            .and_then(|a| a.storage.get(&slot).copied())
            .unwrap_or_default()
    }

    pub(crate) fn sstore(&mut self, address: Address, slot: U256, value: U256) {
        let account = self.account_mut(address);
        let previous = if value.is_zero() {
            account.storage.remove(&slot)
        } else {
            account.storage.insert(slot, value)
        };
        let previous = previous.unwrap_or_default();
        self.journal.push(JournalEntry::StorageChanged {
            address,
            slot,
            previous,
        });
    }

    pub(crate) fn push_log(&mut self, log: Log) {
        self.logs.push(log);
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{address, uint, Bytes, LogData};

    use super::*;

    const ALICE: Address = address!("0x00000000000000000000000000000000000A11CE");
    const BOB: Address = address!("0x0000000000000000000000000000000000000B0B");

    fn state() -> State {
        State::new(Environment::default())
    }

    #[test]
    fn unset_slot_reads_zero() {
        let state = state();
        assert_eq!(state.sload(ALICE, uint!(7_U256)), U256::ZERO);
    }

    #[test]
    fn revert_restores_storage_and_removes_new_accounts() {
        let mut state = state();
        state.sstore(ALICE, U256::ZERO, uint!(1_U256));
        state.commit();

        let checkpoint = state.checkpoint();
        state.sstore(ALICE, U256::ZERO, uint!(2_U256));
        state.sstore(BOB, U256::ZERO, uint!(3_U256));
        state.revert_to(checkpoint);

        assert_eq!(state.sload(ALICE, U256::ZERO), uint!(1_U256));
        assert_eq!(state.sload(BOB, U256::ZERO), U256::ZERO);
        assert!(!state.accounts.contains_key(&BOB));
    }

    #[test]
    fn zero_write_clears_slot_and_reverts_to_previous() {
        let mut state = state();
        state.sstore(ALICE, U256::ZERO, uint!(5_U256));
        state.commit();

        let checkpoint = state.checkpoint();
        state.sstore(ALICE, U256::ZERO, U256::ZERO);
        assert!(state.accounts[&ALICE].storage.is_empty());

        state.revert_to(checkpoint);
        assert_eq!(state.sload(ALICE, U256::ZERO), uint!(5_U256));
    }

    #[test]
    fn transfer_moves_value() {
        let mut state = state();
        state.set_balance(ALICE, uint!(10_U256));
        state.transfer(ALICE, BOB, uint!(4_U256)).expect("should transfer");

        assert_eq!(state.balance(ALICE), uint!(6_U256));
        assert_eq!(state.balance(BOB), uint!(4_U256));
    }

    #[test]
    fn transfer_rejects_insufficient_balance() {
        let mut state = state();
        state.set_balance(ALICE, uint!(1_U256));
        let err = state
            .transfer(ALICE, BOB, uint!(2_U256))
            .expect_err("should reject transfer");

        assert_eq!(
            err,
            call::Error::InsufficientBalance {
                balance: uint!(1_U256),
                needed: uint!(2_U256),
            }
        );
        assert_eq!(state.balance(ALICE), uint!(1_U256));
    }

    #[test]
    fn revert_truncates_logs() {
        let mut state = state();
        let checkpoint = state.checkpoint();
        state.push_log(Log {
            address: ALICE,
            data: LogData::new_unchecked(Vec::new(), Bytes::new()),
        });
        state.revert_to(checkpoint);
        assert!(state.logs.is_empty());
    }

    #[test]
    fn halts_once_out_of_gas() {
        let mut state = state();
        state.begin(100);
        assert!(state.charge(100));
        assert!(!state.charge(1));
        assert!(state.halted);
        assert!(!state.charge(0));
    }
}
