//! Consolidated Solidity Interfaces for proxy contracts.
//!
//! These are ABI interfaces defined with `alloy_sol_macro::sol`, which enables
//! matching selectors and decoding or constructing function call data.

pub use interfaces::*;

#[cfg_attr(coverage_nightly, coverage(off))]
mod interfaces {
    #![allow(missing_docs)]

    use alloy_sol_macro::sol;

    sol! {
        /// Administrative surface of an upgradeable proxy.
        ///
        /// Calls matching none of these selectors are forwarded to the
        /// implementation.
        interface IErc1967Proxy {
            function upgrade(address newImplementation) external;
            function changeAdmin(address newAdmin) external;
            function getImplementation() external view returns (address);
            function getAdmin() external view returns (address);
        }
    }
}
