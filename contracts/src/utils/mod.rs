//! Common Smart Contracts utilities.

pub mod address;
pub mod storage_layout;
pub mod storage_slot;

pub use address::AddressUtils;
pub use storage_layout::{
    check_layout_upgrade, Field, FieldKind, LayoutError, StorageLayout,
};
pub use storage_slot::StorageSlot;
