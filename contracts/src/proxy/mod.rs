//! This is a low-level set of contracts implementing a proxy pattern with
//! upgradeability.
use alloy_primitives::Address;
use ledger::{call, Context};

pub mod abi;
pub mod erc1967;

/// This trait provides a fallback function that delegates all calls to another
/// contract using delegation. We refer to the second contract as the
/// _implementation_ behind the proxy, and it has to be specified by overriding
/// the virtual [`IProxy::implementation`] function.
///
/// Additionally, delegation to the implementation can be triggered manually
/// through the [`IProxy::do_fallback`] function, or to a different contract
/// through the [`IProxy::delegate`] function.
///
/// The success and return data of the delegated call will be returned back
/// to the caller of the proxy.
pub trait IProxy {
    /// Delegates the current call to `implementation`.
    ///
    /// The implementation's code runs against the storage, balance, sender
    /// and value of the current frame. Its changes are discarded when it
    /// fails.
    ///
    /// # Arguments
    ///
    /// * `&self` - The proxy code.
    /// * `ctx` - Execution context of the proxy's frame.
    /// * `implementation` - The address of the implementation contract.
    /// * `calldata` - The calldata to delegate to the implementation contract.
    ///
    /// # Errors
    ///
    /// * [`call::Error`] - If the implementation failed. Revert data is kept
    ///   unchanged.
    fn delegate(
        &self,
        ctx: &mut Context<'_>,
        implementation: Address,
        calldata: &[u8],
    ) -> Result<Vec<u8>, call::Error> {
        ctx.delegate_call(implementation, calldata)
    }

    /// This is a virtual function that should be overridden so it
    /// returns the address to which the fallback function and
    /// [`IProxy::do_fallback`] should delegate.
    ///
    /// # Arguments
    ///
    /// * `&self` - The proxy code.
    /// * `ctx` - Execution context of the proxy's frame.
    ///
    /// # Errors
    ///
    /// Returns revert data if no implementation can be resolved.
    fn implementation(&self, ctx: &mut Context<'_>) -> Result<Address, Vec<u8>>;

    /// Fallback function that delegates calls to the address returned
    /// by [`IProxy::implementation`]. Will run if no other function in the
    /// contract matches the call data.
    ///
    /// # Arguments
    ///
    /// * `&self` - The proxy code.
    /// * `ctx` - Execution context of the proxy's frame.
    /// * `calldata` - The calldata to delegate to the implementation contract.
    ///
    /// # Errors
    ///
    /// Returns the implementation's revert data unchanged.
    fn do_fallback(
        &self,
        ctx: &mut Context<'_>,
        calldata: &[u8],
    ) -> Result<Vec<u8>, Vec<u8>> {
        let implementation = self.implementation(ctx)?;
        tracing::trace!(proxy = %ctx.address(), %implementation, "forwarding call");
        Ok(self.delegate(ctx, implementation, calldata)?)
    }
}
