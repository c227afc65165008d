use alloy_sol_types::SolError;

use crate::{call, ledger::Revert};

/// Extension trait for asserting a call reverted with a typed error.
///
/// Implemented for [`call::Error`], [`Revert`] and raw revert data.
pub trait ErrorExt<E> {
    /// Checks that `Self` corresponds to the typed abi-encoded error
    /// `expected`.
    fn reverted_with(&self, expected: E) -> bool;
}

impl<E: SolError> ErrorExt<E> for call::Error {
    fn reverted_with(&self, expected: E) -> bool {
        self.revert_data() == expected.abi_encode().as_slice()
    }
}

impl<E: SolError> ErrorExt<E> for Revert {
    fn reverted_with(&self, expected: E) -> bool {
        self.error.reverted_with(expected)
    }
}

impl<E: SolError> ErrorExt<E> for Vec<u8> {
    fn reverted_with(&self, expected: E) -> bool {
        *self == expected.abi_encode()
    }
}
