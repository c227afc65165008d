//! Proxy Storage Slots and the events as defined in
//! the [ERC-1967].
//!
//! [ERC-1967]: <https://eips.ethereum.org/EIPS/eip-1967>

pub mod proxy;
pub mod utils;

pub use proxy::Erc1967Proxy;
pub use sol::*;
pub use utils::{Erc1967Utils, Error};

#[cfg_attr(coverage_nightly, coverage(off))]
mod sol {
    use alloy_sol_macro::sol;

    sol! {
        /// Emitted when the implementation is upgraded.
        ///
        /// * `implementation` - Address of the new implementation.
        #[derive(Debug)]
        #[allow(missing_docs)]
        event Upgraded(address indexed implementation);

        /// Emitted when the admin account has changed.
        ///
        /// * `previous_admin` - Address of the previous admin.
        /// * `new_admin` - Address of the new admin.
        #[derive(Debug)]
        #[allow(missing_docs)]
        event AdminChanged(address previous_admin, address new_admin);
    }
}
