//! Common imports for code running on the ledger.
pub use crate::{
    call::{self, ArbResult},
    context::{Context, Frame},
    contract::Contract,
    environment::Environment,
    error::ErrorExt,
    event::EventExt,
    ledger::{Ledger, Receipt, Revert, Sender},
    storage::{StorageAddress, StorageBool, StorageType, StorageU256},
};
