//! Module with a contract that implement an upgradeable proxy.
//!
//! It is upgradeable because calls are delegated to an implementation address
//! that can be changed. This address is stored in storage in the location
//! specified by [ERC-1967], so that it doesn't conflict with the storage layout
//! of the implementation behind the proxy.
//!
//! [ERC-1967]: https://eips.ethereum.org/EIPS/eip-1967
use alloy_primitives::Address;
use alloy_sol_types::{SolCall, SolValue};
use ledger::{call::ArbResult, Context, Contract, Ledger, Receipt, Revert};

use crate::proxy::{
    abi::IErc1967Proxy,
    erc1967::utils::{Erc1967Utils, Error},
    IProxy,
};

/// Upgradeable proxy whose implementation and admin live in the
/// [ERC-1967]-style slots of [`Erc1967Utils`].
///
/// The contract holds no state of its own: every value is read from the
/// storage of the account it runs on.
///
/// [ERC-1967]: https://eips.ethereum.org/EIPS/eip-1967
#[derive(Debug, Clone, Copy, Default)]
pub struct Erc1967Proxy;

impl Erc1967Proxy {
    /// Initializes the upgradeable proxy with an initial implementation
    /// specified by `implementation` and `admin` as its admin.
    ///
    /// If `data` is nonempty, it's used as data in a delegate call to
    /// `implementation`. This will typically be an encoded function call,
    /// and allows initializing the storage of the proxy like a Solidity
    /// constructor.
    ///
    /// # Arguments
    ///
    /// * `&self` - The proxy code.
    /// * `ctx` - Execution context of the constructor frame.
    /// * `implementation` - Address of the implementation contract.
    /// * `admin` - Address allowed to administer the proxy.
    /// * `data` - Data to pass to the implementation contract.
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidAdmin`] - If `admin` is [`Address::ZERO`].
    /// * [`Error::InvalidImplementation`] - If `implementation` is
    ///   [`Address::ZERO`].
    /// * [`Error::EmptyCode`] - If `data` is not empty and `implementation`
    ///   has no code.
    /// * [`Error::FailedCall`] - If the initialization call reverted without
    ///   data.
    /// * [`Error::FailedCallWithReason`] - If the initialization call
    ///   reverted with data.
    ///
    /// # Events
    ///
    /// * [`crate::proxy::erc1967::AdminChanged`].
    /// * [`crate::proxy::erc1967::Upgraded`].
    pub fn constructor(
        &self,
        ctx: &mut Context<'_>,
        implementation: Address,
        admin: Address,
        data: &[u8],
    ) -> Result<(), Error> {
        Erc1967Utils::change_admin(ctx, admin)?;
        Erc1967Utils::upgrade_to_and_call(ctx, implementation, data)
    }

    /// Deploys a proxy from `deployer` and runs its constructor.
    ///
    /// # Arguments
    ///
    /// * `ledger` - Ledger to deploy on.
    /// * `deployer` - Account paying for the deployment.
    /// * `implementation` - Address of the implementation contract.
    /// * `admin` - Address allowed to administer the proxy.
    /// * `data` - Data to pass to the implementation contract.
    ///
    /// # Errors
    ///
    /// * [`Revert`] - If the constructor failed. The revert data is one of
    ///   the errors listed on [`Erc1967Proxy::constructor`].
    pub fn deploy(
        ledger: &mut Ledger,
        deployer: Address,
        implementation: Address,
        admin: Address,
        data: &[u8],
    ) -> Result<(Address, Receipt), Revert> {
        ledger.deploy_with(deployer, Erc1967Proxy, |proxy, ctx| {
            Ok(proxy.constructor(ctx, implementation, admin, data)?)
        })
    }

    /// Upgrades the implementation of the proxy to `new_implementation`.
    ///
    /// # Arguments
    ///
    /// * `&self` - The proxy code.
    /// * `ctx` - Execution context of the proxy's frame.
    /// * `new_implementation` - The new implementation address.
    ///
    /// # Errors
    ///
    /// * [`Error::NonPayable`] - If value is attached.
    /// * [`Error::UnauthorizedAccount`] - If the caller is not the admin.
    /// * [`Error::InvalidImplementation`] - If `new_implementation` is
    ///   [`Address::ZERO`].
    ///
    /// # Events
    ///
    /// * [`crate::proxy::erc1967::Upgraded`].
    pub fn upgrade(
        &self,
        ctx: &mut Context<'_>,
        new_implementation: Address,
    ) -> Result<(), Error> {
        Erc1967Utils::check_non_payable(ctx)?;
        Erc1967Utils::only_admin(ctx)?;
        Erc1967Utils::upgrade_to_and_call(ctx, new_implementation, &[])
    }

    /// Transfers the admin role to `new_admin`.
    ///
    /// # Arguments
    ///
    /// * `&self` - The proxy code.
    /// * `ctx` - Execution context of the proxy's frame.
    /// * `new_admin` - The new admin address.
    ///
    /// # Errors
    ///
    /// * [`Error::NonPayable`] - If value is attached.
    /// * [`Error::UnauthorizedAccount`] - If the caller is not the admin.
    /// * [`Error::InvalidAdmin`] - If `new_admin` is [`Address::ZERO`].
    ///
    /// # Events
    ///
    /// * [`crate::proxy::erc1967::AdminChanged`].
    pub fn change_admin(
        &self,
        ctx: &mut Context<'_>,
        new_admin: Address,
    ) -> Result<(), Error> {
        Erc1967Utils::check_non_payable(ctx)?;
        Erc1967Utils::only_admin(ctx)?;
        Erc1967Utils::change_admin(ctx, new_admin)
    }

    /// Returns the current implementation address.
    ///
    /// # Arguments
    ///
    /// * `&self` - The proxy code.
    /// * `ctx` - Execution context of the proxy's frame.
    pub fn get_implementation(&self, ctx: &mut Context<'_>) -> Address {
        Erc1967Utils::get_implementation(ctx)
    }

    /// Returns the current admin.
    ///
    /// # Arguments
    ///
    /// * `&self` - The proxy code.
    /// * `ctx` - Execution context of the proxy's frame.
    pub fn get_admin(&self, ctx: &mut Context<'_>) -> Address {
        Erc1967Utils::get_admin(ctx)
    }

    /// Forwards `calldata` to the implementation. An empty payload is a plain
    /// value transfer and is accepted without forwarding.
    ///
    /// # Arguments
    ///
    /// * `&self` - The proxy code.
    /// * `ctx` - Execution context of the proxy's frame.
    /// * `calldata` - The calldata to delegate to the implementation.
    ///
    /// # Errors
    ///
    /// Returns the implementation's revert data unchanged.
    pub fn fallback(&self, ctx: &mut Context<'_>, calldata: &[u8]) -> ArbResult {
        if calldata.is_empty() {
            return Ok(Vec::new());
        }
        self.do_fallback(ctx, calldata)
    }
}

impl IProxy for Erc1967Proxy {
    fn implementation(&self, ctx: &mut Context<'_>) -> Result<Address, Vec<u8>> {
        Ok(Erc1967Utils::get_implementation(ctx))
    }
}

impl Contract for Erc1967Proxy {
    fn call(&self, ctx: &mut Context<'_>, calldata: &[u8]) -> ArbResult {
        let Some(selector) = calldata.get(..4) else {
            return self.fallback(ctx, calldata);
        };

        if selector == IErc1967Proxy::upgradeCall::SELECTOR {
            let call = IErc1967Proxy::upgradeCall::abi_decode_validate(calldata)
                .map_err(|_| Vec::new())?;
            self.upgrade(ctx, call.newImplementation)?;
            Ok(Vec::new())
        } else if selector == IErc1967Proxy::changeAdminCall::SELECTOR {
            let call = IErc1967Proxy::changeAdminCall::abi_decode_validate(calldata)
                .map_err(|_| Vec::new())?;
            self.change_admin(ctx, call.newAdmin)?;
            Ok(Vec::new())
        } else if selector == IErc1967Proxy::getImplementationCall::SELECTOR {
            Erc1967Utils::check_non_payable(ctx)?;
            Ok(self.get_implementation(ctx).abi_encode())
        } else if selector == IErc1967Proxy::getAdminCall::SELECTOR {
            Erc1967Utils::check_non_payable(ctx)?;
            Ok(self.get_admin(ctx).abi_encode())
        } else {
            self.fallback(ctx, calldata)
        }
    }
}
