//! Second version of the counter, laid out to replace the first one behind
//! the same proxy.
//!
//! The first two slots are unchanged; the operation tally is appended:
//!
//! | Slot | Field             | Type      |
//! |------|-------------------|-----------|
//! | 0    | `value`           | `uint256` |
//! | 1    | `owner`           | `address` |
//! | 2    | `totalOperations` | `uint256` |
//!
//! After an upgrade, `totalOperations` reads zero until the first operation
//! is performed.
use alloy_primitives::{Address, U256};
use alloy_sol_types::{SolCall, SolError, SolValue};
use ledger::{
    call::ArbResult,
    storage::{StorageAddress, StorageType, StorageU256},
    Context, Contract,
};
pub use sol::*;
use upgradeable_proxy::utils::{Field, FieldKind, StorageLayout};

/// Version reported by [`CounterV2::version`].
pub const VERSION: u64 = 2;

#[cfg_attr(coverage_nightly, coverage(off))]
mod sol {
    use alloy_sol_macro::sol;

    sol! {
        /// Emitted when the counter is incremented.
        ///
        /// * `new_value` - Value after the increment.
        #[derive(Debug)]
        #[allow(missing_docs)]
        event CounterIncremented(uint256 new_value);

        /// Emitted when the counter is decremented.
        ///
        /// * `new_value` - Value after the decrement.
        #[derive(Debug)]
        #[allow(missing_docs)]
        event CounterDecremented(uint256 new_value);

        /// Emitted when the owner resets the counter.
        #[derive(Debug)]
        #[allow(missing_docs)]
        event CounterReset();

        /// Emitted alongside [`CounterIncremented`] by a batched operation.
        ///
        /// * `kind` - Name of the operation.
        /// * `amount` - Amount applied by the operation.
        #[derive(Debug)]
        #[allow(missing_docs)]
        event BatchOperation(string kind, uint256 amount);
    }

    sol! {
        /// The caller account is not authorized to perform an operation.
        ///
        /// * `account` - Account that was found to not be authorized.
        #[derive(Debug)]
        #[allow(missing_docs)]
        error CounterUnauthorizedAccount(address account);

        /// The owner is not a valid owner account. (eg. `Address::ZERO`)
        ///
        /// * `owner` - Account that's not allowed to become the owner.
        #[derive(Debug)]
        #[allow(missing_docs)]
        error CounterInvalidOwner(address owner);

        /// The counter has already been initialized.
        #[derive(Debug)]
        #[allow(missing_docs)]
        error CounterAlreadyInitialized();

        /// The counter is already at zero.
        #[derive(Debug)]
        #[allow(missing_docs)]
        error CounterUnderflow();

        /// The counter cannot hold the result.
        #[derive(Debug)]
        #[allow(missing_docs)]
        error CounterOverflow();

        /// A batched increment was requested with an unusable amount.
        ///
        /// * `amount` - The rejected amount.
        #[derive(Debug)]
        #[allow(missing_docs)]
        error CounterInvalidAmount(uint256 amount);
    }
}

/// Callable surface of [`CounterV2`].
pub mod abi {
    #![allow(missing_docs)]
    #![cfg_attr(coverage_nightly, coverage(off))]

    use alloy_sol_macro::sol;

    sol! {
        interface ICounterV2 {
            function initialize(address owner) external;
            function increment() external;
            function decrement() external;
            function incrementBy(uint256 amount) external;
            function reset() external;
            function getValue() external view returns (uint256);
            function owner() external view returns (address);
            function totalOperations() external view returns (uint256);
            function version() external pure returns (uint256);
        }
    }
}

use abi::ICounterV2;

/// An error that occurred in the implementation of a [`CounterV2`].
#[derive(Debug)]
pub enum Error {
    /// The caller account is not authorized to perform an operation.
    UnauthorizedAccount(CounterUnauthorizedAccount),
    /// The owner is not a valid owner account.
    InvalidOwner(CounterInvalidOwner),
    /// The counter has already been initialized.
    AlreadyInitialized(CounterAlreadyInitialized),
    /// The counter is already at zero.
    Underflow(CounterUnderflow),
    /// The counter cannot hold the result.
    Overflow(CounterOverflow),
    /// A batched increment was requested with an unusable amount.
    InvalidAmount(CounterInvalidAmount),
}

impl From<Error> for Vec<u8> {
    fn from(value: Error) -> Self {
        match value {
            Error::UnauthorizedAccount(e) => e.abi_encode(),
            Error::InvalidOwner(e) => e.abi_encode(),
            Error::AlreadyInitialized(e) => e.abi_encode(),
            Error::Underflow(e) => e.abi_encode(),
            Error::Overflow(e) => e.abi_encode(),
            Error::InvalidAmount(e) => e.abi_encode(),
        }
    }
}

struct Fields {
    value: StorageU256,
    owner: StorageAddress,
    total_operations: StorageU256,
}

impl Fields {
    fn new() -> Self {
        Self {
            value: StorageU256::new(U256::from(0)),
            owner: StorageAddress::new(U256::from(1)),
            total_operations: StorageU256::new(U256::from(2)),
        }
    }

    /// Stores `new_value` and counts one more operation.
    fn record(&self, ctx: &mut Context<'_>, new_value: U256) {
        self.value.set(ctx, new_value);
        let total = self.total_operations.get(ctx).saturating_add(U256::from(1));
        self.total_operations.set(ctx, total);
    }
}

/// A counter that also tallies the operations applied to it.
#[derive(Debug, Clone, Copy, Default)]
pub struct CounterV2;

impl StorageLayout for CounterV2 {
    const FIELDS: &'static [Field] = &[
        Field::new("value", FieldKind::Uint256),
        Field::new("owner", FieldKind::Address),
        Field::new("totalOperations", FieldKind::Uint256),
    ];
}

impl CounterV2 {
    /// Sets the owner of the counter. Can only be called once.
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidOwner`] - If `owner` is [`Address::ZERO`].
    /// * [`Error::AlreadyInitialized`] - If an owner is already set.
    pub fn initialize(
        &self,
        ctx: &mut Context<'_>,
        owner: Address,
    ) -> Result<(), Error> {
        let fields = Fields::new();
        if !fields.owner.get(ctx).is_zero() {
            return Err(Error::AlreadyInitialized(CounterAlreadyInitialized {}));
        }
        if owner.is_zero() {
            return Err(Error::InvalidOwner(CounterInvalidOwner { owner }));
        }
        fields.owner.set(ctx, owner);
        Ok(())
    }

    /// Adds one to the counter.
    ///
    /// # Errors
    ///
    /// * [`Error::Overflow`] - If the counter is at [`U256::MAX`].
    ///
    /// # Events
    ///
    /// * [`CounterIncremented`].
    pub fn increment(&self, ctx: &mut Context<'_>) -> Result<(), Error> {
        let fields = Fields::new();
        let new_value = fields
            .value
            .get(ctx)
            .checked_add(U256::from(1))
            .ok_or(Error::Overflow(CounterOverflow {}))?;
        fields.record(ctx, new_value);
        ctx.log(CounterIncremented { new_value });
        Ok(())
    }

    /// Subtracts one from the counter.
    ///
    /// # Errors
    ///
    /// * [`Error::Underflow`] - If the counter is zero.
    ///
    /// # Events
    ///
    /// * [`CounterDecremented`].
    pub fn decrement(&self, ctx: &mut Context<'_>) -> Result<(), Error> {
        let fields = Fields::new();
        let new_value = fields
            .value
            .get(ctx)
            .checked_sub(U256::from(1))
            .ok_or(Error::Underflow(CounterUnderflow {}))?;
        fields.record(ctx, new_value);
        ctx.log(CounterDecremented { new_value });
        Ok(())
    }

    /// Adds `amount` to the counter as a single operation.
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidAmount`] - If `amount` is zero.
    /// * [`Error::Overflow`] - If the sum exceeds [`U256::MAX`].
    ///
    /// # Events
    ///
    /// * [`BatchOperation`].
    /// * [`CounterIncremented`].
    pub fn increment_by(
        &self,
        ctx: &mut Context<'_>,
        amount: U256,
    ) -> Result<(), Error> {
        if amount.is_zero() {
            return Err(Error::InvalidAmount(CounterInvalidAmount { amount }));
        }
        let fields = Fields::new();
        let new_value = fields
            .value
            .get(ctx)
            .checked_add(amount)
            .ok_or(Error::Overflow(CounterOverflow {}))?;
        fields.record(ctx, new_value);
        ctx.log(BatchOperation { kind: "incrementBy".into(), amount });
        ctx.log(CounterIncremented { new_value });
        Ok(())
    }

    /// Sets the counter back to zero. Only the owner may reset.
    ///
    /// Resetting does not count as an operation.
    ///
    /// # Errors
    ///
    /// * [`Error::UnauthorizedAccount`] - If not called by the owner.
    ///
    /// # Events
    ///
    /// * [`CounterReset`].
    pub fn reset(&self, ctx: &mut Context<'_>) -> Result<(), Error> {
        let fields = Fields::new();
        let account = ctx.msg_sender();
        if account != fields.owner.get(ctx) {
            return Err(Error::UnauthorizedAccount(CounterUnauthorizedAccount {
                account,
            }));
        }
        fields.value.erase(ctx);
        ctx.log(CounterReset {});
        Ok(())
    }

    /// Returns the current value.
    pub fn get_value(&self, ctx: &mut Context<'_>) -> U256 {
        Fields::new().value.get(ctx)
    }

    /// Returns the owner, [`Address::ZERO`] before initialization.
    pub fn owner(&self, ctx: &mut Context<'_>) -> Address {
        Fields::new().owner.get(ctx)
    }

    /// Returns how many counting operations were applied since the upgrade.
    pub fn total_operations(&self, ctx: &mut Context<'_>) -> U256 {
        Fields::new().total_operations.get(ctx)
    }

    /// Returns [`VERSION`].
    #[must_use]
    pub fn version(&self) -> U256 {
        U256::from(VERSION)
    }
}

fn decode<C: SolCall>(calldata: &[u8]) -> Result<C, Vec<u8>> {
    C::abi_decode(calldata).map_err(|_| Vec::new())
}

impl Contract for CounterV2 {
    fn call(&self, ctx: &mut Context<'_>, calldata: &[u8]) -> ArbResult {
        let Some(selector) = calldata.get(..4) else {
            return Err(Vec::new());
        };

        if selector == ICounterV2::initializeCall::SELECTOR {
            let call = decode::<ICounterV2::initializeCall>(calldata)?;
            self.initialize(ctx, call.owner)?;
            Ok(Vec::new())
        } else if selector == ICounterV2::incrementCall::SELECTOR {
            self.increment(ctx)?;
            Ok(Vec::new())
        } else if selector == ICounterV2::decrementCall::SELECTOR {
            self.decrement(ctx)?;
            Ok(Vec::new())
        } else if selector == ICounterV2::incrementByCall::SELECTOR {
            let call = decode::<ICounterV2::incrementByCall>(calldata)?;
            self.increment_by(ctx, call.amount)?;
            Ok(Vec::new())
        } else if selector == ICounterV2::resetCall::SELECTOR {
            self.reset(ctx)?;
            Ok(Vec::new())
        } else if selector == ICounterV2::getValueCall::SELECTOR {
            Ok(self.get_value(ctx).abi_encode())
        } else if selector == ICounterV2::ownerCall::SELECTOR {
            Ok(self.owner(ctx).abi_encode())
        } else if selector == ICounterV2::totalOperationsCall::SELECTOR {
            Ok(self.total_operations(ctx).abi_encode())
        } else if selector == ICounterV2::versionCall::SELECTOR {
            Ok(self.version().abi_encode())
        } else {
            Err(Vec::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{address, uint};
    use ledger::prelude::*;

    use super::*;

    const ALICE: Address = address!("0x00000000000000000000000000000000000A11CE");
    const BOB: Address = address!("0x0000000000000000000000000000000000000B0B");

    fn deploy() -> (Ledger, Address) {
        let mut ledger = Ledger::default();
        let counter = ledger.deploy(ALICE, CounterV2);
        ledger
            .sender(ALICE)
            .send(counter, &ICounterV2::initializeCall { owner: ALICE })
            .expect("should initialize");
        (ledger, counter)
    }

    fn value(ledger: &mut Ledger, counter: Address) -> U256 {
        ledger
            .sender(BOB)
            .view(counter, &ICounterV2::getValueCall {})
            .expect("should read value")
            .decode::<ICounterV2::getValueCall>()
            .expect("should decode value")
    }

    fn total_operations(ledger: &mut Ledger, counter: Address) -> U256 {
        ledger
            .sender(BOB)
            .view(counter, &ICounterV2::totalOperationsCall {})
            .expect("should read total operations")
            .decode::<ICounterV2::totalOperationsCall>()
            .expect("should decode total operations")
    }

    #[test]
    fn reports_version() {
        let (mut ledger, counter) = deploy();
        let version = ledger
            .sender(BOB)
            .view(counter, &ICounterV2::versionCall {})
            .expect("should read version")
            .decode::<ICounterV2::versionCall>()
            .expect("should decode version");
        assert_eq!(version, uint!(2_U256));
    }

    #[test]
    fn increment_by_counts_one_operation() {
        let (mut ledger, counter) = deploy();

        let amount = uint!(5_U256);
        let receipt = ledger
            .sender(BOB)
            .send(counter, &ICounterV2::incrementByCall { amount })
            .expect("should increment by amount");
        assert!(receipt.emits(BatchOperation { kind: "incrementBy".into(), amount }));
        assert!(receipt.emits(CounterIncremented { new_value: amount }));

        assert_eq!(value(&mut ledger, counter), amount);
        assert_eq!(total_operations(&mut ledger, counter), uint!(1_U256));
    }

    #[test]
    fn increment_by_zero_is_rejected() {
        let (mut ledger, counter) = deploy();

        let err = ledger
            .sender(BOB)
            .send(counter, &ICounterV2::incrementByCall { amount: U256::ZERO })
            .expect_err("should reject zero amount");
        assert!(err.reverted_with(CounterInvalidAmount { amount: U256::ZERO }));
        assert_eq!(total_operations(&mut ledger, counter), U256::ZERO);
    }

    #[test]
    fn increment_by_overflow_is_rejected() {
        let (mut ledger, counter) = deploy();
        ledger
            .sender(BOB)
            .send(counter, &ICounterV2::incrementCall {})
            .expect("should increment");

        let err = ledger
            .sender(BOB)
            .send(counter, &ICounterV2::incrementByCall { amount: U256::MAX })
            .expect_err("should not overflow");
        assert!(err.reverted_with(CounterOverflow {}));
        assert_eq!(value(&mut ledger, counter), uint!(1_U256));
        assert_eq!(total_operations(&mut ledger, counter), uint!(1_U256));
    }

    #[test]
    fn operations_are_tallied_except_reset() {
        let (mut ledger, counter) = deploy();

        for _ in 0..3 {
            ledger
                .sender(BOB)
                .send(counter, &ICounterV2::incrementCall {})
                .expect("should increment");
        }
        ledger
            .sender(BOB)
            .send(counter, &ICounterV2::decrementCall {})
            .expect("should decrement");
        assert_eq!(total_operations(&mut ledger, counter), uint!(4_U256));

        ledger
            .sender(ALICE)
            .send(counter, &ICounterV2::resetCall {})
            .expect("owner should reset");
        assert_eq!(value(&mut ledger, counter), U256::ZERO);
        assert_eq!(total_operations(&mut ledger, counter), uint!(4_U256));
    }

    #[test]
    fn failed_decrement_is_not_tallied() {
        let (mut ledger, counter) = deploy();

        let err = ledger
            .sender(BOB)
            .send(counter, &ICounterV2::decrementCall {})
            .expect_err("should not go below zero");
        assert!(err.reverted_with(CounterUnderflow {}));
        assert_eq!(total_operations(&mut ledger, counter), U256::ZERO);
    }

    #[test]
    fn reset_is_owner_only() {
        let (mut ledger, counter) = deploy();

        let err = ledger
            .sender(BOB)
            .send(counter, &ICounterV2::resetCall {})
            .expect_err("only owner should reset");
        assert!(err.reverted_with(CounterUnauthorizedAccount { account: BOB }));
    }

    #[test]
    fn layout_appends_total_operations() {
        assert_eq!(CounterV2::FIELDS.len(), 3);
        assert_eq!(CounterV2::FIELDS[2].name, "totalOperations");
        assert_eq!(CounterV2::FIELDS[2].kind, FieldKind::Uint256);
    }
}
