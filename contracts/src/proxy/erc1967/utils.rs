//! This library provides getters and event emitting update functions for
//! [ERC-1967] slots.
//!
//! [ERC-1967]: https://eips.ethereum.org/EIPS/eip-1967

use alloy_primitives::{Address, B256};
use alloy_sol_types::SolError;
use ledger::{storage::StorageAddress, Context};
pub use sol::*;

use crate::{
    proxy::erc1967,
    utils::{
        address::{self, AddressEmptyCode, FailedCall, FailedCallWithReason},
        storage_slot::StorageSlot,
        AddressUtils,
    },
};

#[cfg_attr(coverage_nightly, coverage(off))]
mod sol {
    use alloy_sol_macro::sol;

    sol! {
        /// Indicates an error related to the fact that the `implementation`
        /// of the proxy is invalid.
        ///
        /// * `implementation` - Address of the invalid implementation.
        #[derive(Debug)]
        #[allow(missing_docs)]
        error ERC1967InvalidImplementation(address implementation);

        /// Indicates an error related to the fact that the `admin` of the
        /// proxy is invalid.
        ///
        /// * `admin` - Address of the invalid admin.
        #[derive(Debug)]
        #[allow(missing_docs)]
        error ERC1967InvalidAdmin(address admin);

        /// The caller account is not authorized to administer the proxy.
        ///
        /// * `account` - Account that was found to not be authorized.
        #[derive(Debug)]
        #[allow(missing_docs)]
        error ERC1967UnauthorizedAccount(address account);

        /// Indicates an error related to the fact that an administrative
        /// function sees a non-zero value that may be lost.
        #[derive(Debug)]
        #[allow(missing_docs)]
        error ERC1967NonPayable();
    }
}

/// An [`Erc1967Utils`] error.
#[derive(Debug)]
pub enum Error {
    /// Indicates an error related to the fact that the `implementation`
    /// of the proxy is invalid.
    InvalidImplementation(ERC1967InvalidImplementation),
    /// Indicates an error related to the fact that the `admin` of the
    /// proxy is invalid.
    InvalidAdmin(ERC1967InvalidAdmin),
    /// The caller account is not authorized to administer the proxy.
    UnauthorizedAccount(ERC1967UnauthorizedAccount),
    /// Indicates an error related to the fact that an administrative
    /// function sees a non-zero value that may be lost.
    NonPayable(ERC1967NonPayable),
    /// There's no code at `target` (it is not a contract).
    EmptyCode(AddressEmptyCode),
    /// A call to an address target failed. The target may have reverted
    /// without a revert reason.
    FailedCall(FailedCall),
    /// A call to an address target failed. The target may have reverted
    /// with a reason.
    FailedCallWithReason(FailedCallWithReason),
}

impl From<ERC1967InvalidImplementation> for Error {
    fn from(value: ERC1967InvalidImplementation) -> Self {
        Error::InvalidImplementation(value)
    }
}

impl From<ERC1967InvalidAdmin> for Error {
    fn from(value: ERC1967InvalidAdmin) -> Self {
        Error::InvalidAdmin(value)
    }
}

impl From<ERC1967UnauthorizedAccount> for Error {
    fn from(value: ERC1967UnauthorizedAccount) -> Self {
        Error::UnauthorizedAccount(value)
    }
}

impl From<ERC1967NonPayable> for Error {
    fn from(value: ERC1967NonPayable) -> Self {
        Error::NonPayable(value)
    }
}

impl From<address::Error> for Error {
    fn from(value: address::Error) -> Self {
        match value {
            address::Error::EmptyCode(e) => Error::EmptyCode(e),
            address::Error::FailedCall(e) => Error::FailedCall(e),
            address::Error::FailedCallWithReason(e) => {
                Error::FailedCallWithReason(e)
            }
        }
    }
}

impl From<Error> for Vec<u8> {
    fn from(value: Error) -> Self {
        match value {
            Error::InvalidImplementation(e) => e.abi_encode(),
            Error::InvalidAdmin(e) => e.abi_encode(),
            Error::UnauthorizedAccount(e) => e.abi_encode(),
            Error::NonPayable(e) => e.abi_encode(),
            Error::EmptyCode(e) => e.abi_encode(),
            Error::FailedCall(e) => e.abi_encode(),
            Error::FailedCallWithReason(e) => e.abi_encode(),
        }
    }
}

/// Storage slot with the address of the current implementation.
///
/// This is the keccak-256 hash of "proxy.implementation".
pub const IMPLEMENTATION_SLOT: B256 =
    StorageSlot::derive(b"proxy.implementation");

/// Storage slot with the admin of the contract.
///
/// This is the keccak-256 hash of "proxy.admin".
pub const ADMIN_SLOT: B256 = StorageSlot::derive(b"proxy.admin");

/// This library provides getters and event emitting update functions for
/// [ERC-1967] slots.
///
/// Every function acts on the storage of the frame `ctx` executes in.
///
/// [ERC-1967]: https://eips.ethereum.org/EIPS/eip-1967
pub struct Erc1967Utils;

/// Implementation of the [`Erc1967Utils`] library.
impl Erc1967Utils {
    /// Returns the current implementation address.
    ///
    /// # Arguments
    ///
    /// * `ctx` - Execution context of the proxy's frame.
    pub fn get_implementation(ctx: &mut Context<'_>) -> Address {
        StorageSlot::get_slot::<StorageAddress>(IMPLEMENTATION_SLOT).get(ctx)
    }

    /// Performs implementation upgrade with additional setup call if
    /// data is nonempty. This function is payable only if the setup call
    /// is performed, otherwise attached value is rejected to avoid stuck
    /// value in the contract.
    ///
    /// # Arguments
    ///
    /// * `ctx` - Execution context of the proxy's frame.
    /// * `new_implementation` - The new implementation address.
    /// * `data` - The data to pass to the setup call.
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidImplementation`] - If `new_implementation` is
    ///   [`Address::ZERO`].
    /// * [`Error::NonPayable`] - If `data` is empty and value is attached.
    /// * [`Error::EmptyCode`] - If `data` is not empty and
    ///   `new_implementation` has no code.
    /// * [`Error::FailedCall`] - If the setup call reverted without data.
    /// * [`Error::FailedCallWithReason`] - If the setup call reverted with
    ///   data.
    ///
    /// # Events
    ///
    /// * [`erc1967::Upgraded`].
    pub fn upgrade_to_and_call(
        ctx: &mut Context<'_>,
        new_implementation: Address,
        data: &[u8],
    ) -> Result<(), Error> {
        Erc1967Utils::_set_implementation(ctx, new_implementation)?;

        ctx.log(erc1967::Upgraded { implementation: new_implementation });
        tracing::debug!(
            proxy = %ctx.address(),
            implementation = %new_implementation,
            "upgraded"
        );

        if data.is_empty() {
            Erc1967Utils::check_non_payable(ctx)?;
        } else {
            AddressUtils::function_delegate_call(ctx, new_implementation, data)?;
        }

        Ok(())
    }

    /// Returns the current admin.
    ///
    /// # Arguments
    ///
    /// * `ctx` - Execution context of the proxy's frame.
    pub fn get_admin(ctx: &mut Context<'_>) -> Address {
        StorageSlot::get_slot::<StorageAddress>(ADMIN_SLOT).get(ctx)
    }

    /// Changes the admin of the proxy.
    ///
    /// # Arguments
    ///
    /// * `ctx` - Execution context of the proxy's frame.
    /// * `new_admin` - The new admin address.
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidAdmin`] - If `new_admin` is [`Address::ZERO`].
    ///
    /// # Events
    ///
    /// * [`erc1967::AdminChanged`].
    pub fn change_admin(
        ctx: &mut Context<'_>,
        new_admin: Address,
    ) -> Result<(), Error> {
        let previous_admin = Erc1967Utils::get_admin(ctx);
        Erc1967Utils::_set_admin(ctx, new_admin)?;

        ctx.log(erc1967::AdminChanged { previous_admin, new_admin });
        tracing::debug!(
            proxy = %ctx.address(),
            %previous_admin,
            %new_admin,
            "admin changed"
        );

        Ok(())
    }
}

impl Erc1967Utils {
    /// Checks that the caller is the current admin.
    ///
    /// The admin is read from storage on every check.
    ///
    /// # Arguments
    ///
    /// * `ctx` - Execution context of the proxy's frame.
    ///
    /// # Errors
    ///
    /// * [`Error::UnauthorizedAccount`] - If the caller is not the admin.
    pub fn only_admin(ctx: &mut Context<'_>) -> Result<(), Error> {
        let account = ctx.msg_sender();
        if account == Erc1967Utils::get_admin(ctx) {
            Ok(())
        } else {
            Err(ERC1967UnauthorizedAccount { account }.into())
        }
    }

    /// Reverts if the attached value is not zero. It can be used to avoid
    /// value stuck in the contract if an upgrade does not perform an
    /// initialization call.
    ///
    /// # Arguments
    ///
    /// * `ctx` - Execution context of the proxy's frame.
    ///
    /// # Errors
    ///
    /// * [`Error::NonPayable`] - If the attached value is not zero.
    pub fn check_non_payable(ctx: &Context<'_>) -> Result<(), Error> {
        if ctx.msg_value().is_zero() {
            Ok(())
        } else {
            Err(ERC1967NonPayable {}.into())
        }
    }

    /// Stores a new address in the implementation slot.
    ///
    /// Whether `new_implementation` holds compatible code is up to the
    /// admin.
    ///
    /// # Arguments
    ///
    /// * `ctx` - Execution context of the proxy's frame.
    /// * `new_implementation` - The new implementation address.
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidImplementation`] - If `new_implementation` is
    ///   [`Address::ZERO`].
    fn _set_implementation(
        ctx: &mut Context<'_>,
        new_implementation: Address,
    ) -> Result<(), Error> {
        if new_implementation.is_zero() {
            return Err(ERC1967InvalidImplementation {
                implementation: new_implementation,
            }
            .into());
        }

        StorageSlot::get_slot::<StorageAddress>(IMPLEMENTATION_SLOT)
            .set(ctx, new_implementation);

        Ok(())
    }

    /// Stores a new address in the admin slot.
    ///
    /// # Arguments
    ///
    /// * `ctx` - Execution context of the proxy's frame.
    /// * `new_admin` - The new admin address.
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidAdmin`] - If `new_admin` is [`Address::ZERO`].
    fn _set_admin(ctx: &mut Context<'_>, new_admin: Address) -> Result<(), Error> {
        if new_admin.is_zero() {
            return Err(ERC1967InvalidAdmin { admin: new_admin }.into());
        }

        StorageSlot::get_slot::<StorageAddress>(ADMIN_SLOT).set(ctx, new_admin);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{keccak256, U256};
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn slots_are_name_hashes() {
        assert_eq!(IMPLEMENTATION_SLOT, keccak256(b"proxy.implementation"));
        assert_eq!(ADMIN_SLOT, keccak256(b"proxy.admin"));
        assert_ne!(IMPLEMENTATION_SLOT, ADMIN_SLOT);
    }

    #[test]
    fn errors_encode_as_custom_errors() {
        let account = Address::repeat_byte(0x11);
        let encoded: Vec<u8> =
            Error::from(ERC1967UnauthorizedAccount { account }).into();
        assert_eq!(encoded, ERC1967UnauthorizedAccount { account }.abi_encode());

        let encoded: Vec<u8> = Error::from(address::Error::FailedCall(
            FailedCall {},
        ))
        .into();
        assert_eq!(encoded, FailedCall {}.abi_encode());
    }

    proptest! {
        #[test]
        fn slots_never_alias_sequential_fields(index in 0u64..1_000_000) {
            let field = U256::from(index);
            prop_assert_ne!(field, U256::from_be_bytes(IMPLEMENTATION_SLOT.0));
            prop_assert_ne!(field, U256::from_be_bytes(ADMIN_SLOT.0));
        }
    }
}
