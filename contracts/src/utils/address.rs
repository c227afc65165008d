//! A collection of utilities for working with [`Address`].
use alloy_primitives::Address;
use alloy_sol_types::SolError;
use ledger::{call, Context};
pub use sol::*;

#[cfg_attr(coverage_nightly, coverage(off))]
mod sol {
    use alloy_sol_macro::sol;

    sol! {
        /// There's no code at `target` (it is not a contract).
        ///
        /// * `target` - Address of the target contract.
        #[derive(Debug)]
        #[allow(missing_docs)]
        error AddressEmptyCode(address target);

        /// A call to an address target failed. The target may have reverted
        /// without a revert reason.
        #[derive(Debug)]
        #[allow(missing_docs)]
        error FailedCall();

        /// A call to an address target failed. The target may have reverted
        /// with a reason.
        ///
        /// * `reason` - The revert reason that was returned by the call.
        #[derive(Debug)]
        #[allow(missing_docs)]
        error FailedCallWithReason(bytes reason);
    }
}

/// An [`AddressUtils`] error.
#[derive(Debug)]
pub enum Error {
    /// There's no code at `target` (it is not a contract).
    EmptyCode(AddressEmptyCode),
    /// A call to an address target failed. The target may have reverted
    /// without a revert reason.
    FailedCall(FailedCall),
    /// A call to an address target failed. The target may have reverted
    /// with a reason.
    FailedCallWithReason(FailedCallWithReason),
}

impl From<AddressEmptyCode> for Error {
    fn from(value: AddressEmptyCode) -> Self {
        Error::EmptyCode(value)
    }
}

impl From<FailedCall> for Error {
    fn from(value: FailedCall) -> Self {
        Error::FailedCall(value)
    }
}

impl From<FailedCallWithReason> for Error {
    fn from(value: FailedCallWithReason) -> Self {
        Error::FailedCallWithReason(value)
    }
}

impl From<Error> for Vec<u8> {
    fn from(value: Error) -> Self {
        match value {
            Error::EmptyCode(e) => e.abi_encode(),
            Error::FailedCall(e) => e.abi_encode(),
            Error::FailedCallWithReason(e) => e.abi_encode(),
        }
    }
}

/// A collection of utilities for working with [`Address`].
pub struct AddressUtils;

impl AddressUtils {
    /// Performs a delegate call to `target` with the given `data`.
    ///
    /// # Arguments
    ///
    /// * `ctx` - Execution context of the delegating frame.
    /// * `target` - The address of the target contract.
    /// * `data` - The data to pass to the target contract.
    ///
    /// # Errors
    ///
    /// * [`Error::FailedCall`] - If the call to the target contract fails
    ///   without a revert reason.
    /// * [`Error::FailedCallWithReason`] - If the call to the target contract
    ///   fails with a revert reason.
    /// * [`Error::EmptyCode`] - If the target contract has no code.
    pub fn function_delegate_call(
        ctx: &mut Context<'_>,
        target: Address,
        data: &[u8],
    ) -> Result<Vec<u8>, Error> {
        let result = ctx.delegate_call(target, data);
        Self::verify_call_result_from_target(ctx, target, result)
    }

    /// Helper function to verify that a low level call to smart-contract was
    /// successful.
    ///
    /// Reverts if the target was not a contract or if the call fails for any
    /// other reason. Bubbles up the revert reason (falling back to
    /// [`Error::FailedCall`]) in case of an unsuccessful call.
    ///
    /// # Arguments
    ///
    /// * `ctx` - Execution context used to look up `target`'s code.
    /// * `target` - The address of the target contract.
    /// * `result` - The result of the call.
    ///
    /// # Errors
    ///
    /// * [`Error::EmptyCode`] - If the target contract has no code.
    /// * [`Error::FailedCallWithReason`] - If the call to the target contract
    ///   fails with a revert reason.
    /// * [`Error::FailedCall`] - If the call to the target contract fails
    ///   without a revert reason.
    pub fn verify_call_result_from_target<T: AsRef<[u8]>>(
        ctx: &Context<'_>,
        target: Address,
        result: Result<T, call::Error>,
    ) -> Result<T, Error> {
        match result {
            Ok(returndata) => {
                if returndata.as_ref().is_empty() && !ctx.has_code(target) {
                    return Err(AddressEmptyCode { target }.into());
                }
                Ok(returndata)
            }
            Err(e) => Err(Self::revert(e)),
        }
    }
}

impl AddressUtils {
    /// Reverts with `error` if revert reason exists. Otherwise reverts with
    /// [`Error::FailedCall`].
    ///
    /// This behavior is aligned with Solidity implementation of
    /// [Address.sol].
    ///
    /// [Address.sol]: https://github.com/OpenZeppelin/openzeppelin-contracts/blob/master/contracts/utils/Address.sol
    fn revert(error: call::Error) -> Error {
        if error.revert_data().is_empty() {
            FailedCall {}.into()
        } else {
            FailedCallWithReason { reason: error.encode().into() }.into()
        }
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::address;
    use ledger::prelude::*;

    use super::*;

    const ALICE: Address = address!("0x00000000000000000000000000000000000A11CE");

    #[test]
    fn revert_returns_failed_call() {
        let result = AddressUtils::revert(call::Error::Revert(vec![]));
        assert!(matches!(result, Error::FailedCall(FailedCall {})));

        let result = AddressUtils::revert(call::Error::OutOfGas);
        assert!(matches!(result, Error::FailedCall(FailedCall {})));
    }

    #[test]
    fn revert_returns_failed_call_with_reason() {
        let result = AddressUtils::revert(call::Error::Revert(vec![1, 2, 3]));
        let Error::FailedCallWithReason(FailedCallWithReason { reason }) =
            result
        else {
            panic!("should fail with reason");
        };
        assert_eq!(reason.to_vec(), vec![1, 2, 3]);
    }

    /// Checks the verification against the accounts it is deployed next to.
    ///
    /// Calldata `[0]` verifies empty output from a contract, `[1]` verifies
    /// empty output from an account without code, `[2]` verifies data from
    /// an account without code.
    struct Verifier;

    impl Contract for Verifier {
        fn call(&self, ctx: &mut Context<'_>, calldata: &[u8]) -> ArbResult {
            let (target, output) = match calldata {
                [0] => (ctx.address(), vec![]),
                [1] => (Address::ZERO, vec![]),
                [2] => (Address::ZERO, vec![1, 2, 3]),
                _ => return Err(vec![]),
            };
            let output = AddressUtils::verify_call_result_from_target(
                ctx,
                target,
                Ok(output),
            )?;
            Ok(output)
        }
    }

    #[test]
    fn verify_call_result_from_target_returns_empty_data_when_target_has_code()
    {
        let mut ledger = Ledger::default();
        let verifier = ledger.deploy(ALICE, Verifier);
        let receipt = ledger
            .sender(ALICE)
            .transact(verifier, &[0])
            .expect("should be able to verify call result");
        assert!(receipt.output.is_empty());
    }

    #[test]
    fn verify_call_result_from_target_returns_data_when_target_has_no_code() {
        let mut ledger = Ledger::default();
        let verifier = ledger.deploy(ALICE, Verifier);
        let receipt = ledger
            .sender(ALICE)
            .transact(verifier, &[2])
            .expect("should be able to verify call result");
        assert_eq!(receipt.output, vec![1, 2, 3]);
    }

    #[test]
    fn verify_call_result_from_target_returns_address_empty_code() {
        let mut ledger = Ledger::default();
        let verifier = ledger.deploy(ALICE, Verifier);
        let err = ledger
            .sender(ALICE)
            .transact(verifier, &[1])
            .expect_err("should reject empty code");
        assert!(err.reverted_with(AddressEmptyCode { target: Address::ZERO }));
    }

    #[test]
    fn function_delegate_call_reports_empty_code() {
        struct Delegating;

        impl Contract for Delegating {
            fn call(&self, ctx: &mut Context<'_>, data: &[u8]) -> ArbResult {
                Ok(AddressUtils::function_delegate_call(ctx, ALICE, data)?)
            }
        }

        let mut ledger = Ledger::default();
        let delegating = ledger.deploy(ALICE, Delegating);
        let err = ledger
            .sender(ALICE)
            .transact(delegating, &[1, 2])
            .expect_err("should reject delegation to account without code");
        assert!(err.reverted_with(AddressEmptyCode { target: ALICE }));
    }
}
