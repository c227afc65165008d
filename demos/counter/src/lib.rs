//! First version of a counter meant to run behind an upgradeable proxy.
//!
//! The proxy never runs the implementation's constructor, so the owner is set
//! by a one-time [`Counter::initialize`] call made through the proxy.
//!
//! Storage layout, one field per slot:
//!
//! | Slot | Field   | Type      |
//! |------|---------|-----------|
//! | 0    | `value` | `uint256` |
//! | 1    | `owner` | `address` |
use alloy_primitives::{Address, U256};
use alloy_sol_types::{SolCall, SolError, SolValue};
use ledger::{
    call::ArbResult,
    storage::{StorageAddress, StorageType, StorageU256},
    Context, Contract,
};
pub use sol::*;
use upgradeable_proxy::utils::{Field, FieldKind, StorageLayout};

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

        /// The counter is already at its maximum.
        #[derive(Debug)]
        #[allow(missing_docs)]
        error CounterOverflow();
    }
}

/// Callable surface of [`Counter`].
pub mod abi {
    #![allow(missing_docs)]
    #![cfg_attr(coverage_nightly, coverage(off))]

    use alloy_sol_macro::sol;

    sol! {
        interface ICounter {
            function initialize(address owner) external;
            function increment() external;
            function decrement() external;
            function reset() external;
            function getValue() external view returns (uint256);
            function owner() external view returns (address);
        }
    }
}

use abi::ICounter;

/// An error that occurred in the implementation of a [`Counter`].
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
    /// The counter is already at its maximum.
    Overflow(CounterOverflow),
}

impl From<Error> for Vec<u8> {
    fn from(value: Error) -> Self {
        match value {
            Error::UnauthorizedAccount(e) => e.abi_encode(),
            Error::InvalidOwner(e) => e.abi_encode(),
            Error::AlreadyInitialized(e) => e.abi_encode(),
            Error::Underflow(e) => e.abi_encode(),
            Error::Overflow(e) => e.abi_encode(),
        }
    }
}

/// Storage handles of a [`Counter`].
struct Fields {
    value: StorageU256,
    owner: StorageAddress,
}

impl Fields {
    fn new() -> Self {
        Self {
            value: StorageU256::new(U256::from(0)),
            owner: StorageAddress::new(U256::from(1)),
        }
    }
}

/// A counter with an owner allowed to reset it.
#[derive(Debug, Clone, Copy, Default)]
pub struct Counter;

impl StorageLayout for Counter {
    const FIELDS: &'static [Field] = &[
        Field::new("value", FieldKind::Uint256),
        Field::new("owner", FieldKind::Address),
    ];
}

impl Counter {
    /// Sets the owner of the counter. Can only be called once.
    ///
    /// # Arguments
    ///
    /// * `&self` - The counter code.
    /// * `ctx` - Execution context.
    /// * `owner` - The owner of the counter.
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
        fields.value.set(ctx, new_value);
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
        fields.value.set(ctx, new_value);
        ctx.log(CounterDecremented { new_value });
        Ok(())
    }

    /// Sets the counter back to zero. Only the owner may reset.
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
}

fn decode<C: SolCall>(calldata: &[u8]) -> Result<C, Vec<u8>> {
    C::abi_decode(calldata).map_err(|_| Vec::new())
}

impl Contract for Counter {
    fn call(&self, ctx: &mut Context<'_>, calldata: &[u8]) -> ArbResult {
        let Some(selector) = calldata.get(..4) else {
            return Err(Vec::new());
        };

        if selector == ICounter::initializeCall::SELECTOR {
            let call = decode::<ICounter::initializeCall>(calldata)?;
            self.initialize(ctx, call.owner)?;
            Ok(Vec::new())
        } else if selector == ICounter::incrementCall::SELECTOR {
            self.increment(ctx)?;
            Ok(Vec::new())
        } else if selector == ICounter::decrementCall::SELECTOR {
            self.decrement(ctx)?;
            Ok(Vec::new())
        } else if selector == ICounter::resetCall::SELECTOR {
            self.reset(ctx)?;
            Ok(Vec::new())
        } else if selector == ICounter::getValueCall::SELECTOR {
            Ok(self.get_value(ctx).abi_encode())
        } else if selector == ICounter::ownerCall::SELECTOR {
            Ok(self.owner(ctx).abi_encode())
        } else {
            Err(Vec::new())
        }
    }
}
